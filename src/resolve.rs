//! Prerequisite resolution.
//!
//! Raw prerequisite text is reduced to a [`PrerequisiteSet`] by [`extract`],
//! memoized per course and roster in a [`ResolutionCache`], and walked by a
//! [`Checker`] until an approved course is found or the depth bound is hit.
//! [`Analytics`] summarises which prerequisites a batch mentions.

mod analytics;
pub use analytics::Analytics;

mod batch;
pub use batch::{CheckResult, Metadata, Progress};

mod cache;
pub use cache::{CacheEntry, ResolutionCache};

mod checker;
pub use checker::{Checker, DEFAULT_MAX_DEPTH, FetchFailure, Trace, TraceStep, Visit};

mod extract;
pub use extract::{PrerequisiteSet, extract};
