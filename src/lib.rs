//! Technical Elective Resolution
//!
//! A course counts as a technical elective when it, or a course somewhere in
//! its prerequisite chain, is on an approved list. Prerequisites are looked up
//! in an external course catalog one course at a time.

pub mod domain;
pub use domain::{AllowList, Config, CourseCode, Roster, Subject};

/// Clients for the external course catalog.
pub mod catalog;
pub use catalog::{CatalogClient, FetchError, HttpCatalog, InMemoryCatalog};

pub mod resolve;
pub use resolve::{Analytics, CheckResult, Checker, DEFAULT_MAX_DEPTH};

/// Loading course lists and writing results.
pub mod storage;
pub use storage::InputError;
