//! Domain models for prerequisite resolution.
//!
//! This module contains the core domain types including course codes, roster
//! terms, the allow-list of approved courses, and configuration.

/// Course code types and parsing.
pub mod course_code;
pub use course_code::{CourseCode, Error as CourseCodeError, Subject};

/// Roster (term) identifiers and their chronological ordering.
pub mod roster;
pub use roster::{Error as RosterError, Roster};

mod allow_list;
pub use allow_list::AllowList;

mod config;
pub use config::{Config, ConfigError};
