//! Access to the external course catalog.
//!
//! A [`CatalogClient`] answers two questions: what is the raw prerequisite
//! description of a course in a given roster, and which courses does a
//! subject offer in that roster? The [`HttpCatalog`] asks the live catalog
//! API, pacing requests through a shared [`RateGate`]. The [`InMemoryCatalog`]
//! serves canned descriptions for offline use.

use crate::domain::{CourseCode, Roster, Subject};

mod http;
pub use http::HttpCatalog;

mod memory;
pub use memory::InMemoryCatalog;

mod rate_gate;
pub use rate_gate::RateGate;

/// A source of raw prerequisite descriptions.
pub trait CatalogClient {
    /// Fetch the free-text prerequisite description for a course.
    ///
    /// An empty string means the catalog lists the course without any
    /// prerequisites.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] if the catalog cannot be reached, does not
    /// know the course, or returns a response that cannot be understood.
    fn fetch(&mut self, code: &CourseCode, roster: &Roster) -> Result<String, FetchError>;

    /// List every course the catalog offers in a subject, sorted and without
    /// duplicates.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] if the catalog cannot be reached, does not
    /// know the subject, or returns a response that cannot be understood.
    fn list_subject(
        &mut self,
        subject: &Subject,
        roster: &Roster,
    ) -> Result<Vec<CourseCode>, FetchError>;
}

impl<C: CatalogClient + ?Sized> CatalogClient for Box<C> {
    fn fetch(&mut self, code: &CourseCode, roster: &Roster) -> Result<String, FetchError> {
        (**self).fetch(code, roster)
    }

    fn list_subject(
        &mut self,
        subject: &Subject,
        roster: &Roster,
    ) -> Result<Vec<CourseCode>, FetchError> {
        (**self).list_subject(subject, roster)
    }
}

/// Errors that can occur when fetching a course from the catalog.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum FetchError {
    /// The request could not be completed.
    #[error("network error: {0}")]
    Network(String),

    /// The catalog has no such course in the requested roster.
    #[error("{code} not found in roster {roster}")]
    NotFound {
        /// The course that was requested.
        code: CourseCode,
        /// The roster that was searched.
        roster: Roster,
    },

    /// The catalog offers no courses in the subject for the requested roster.
    #[error("subject {subject} not found in roster {roster}")]
    SubjectNotFound {
        /// The subject that was requested.
        subject: Subject,
        /// The roster that was searched.
        roster: Roster,
    },

    /// The response was malformed or lacked the expected field.
    #[error("malformed catalog response: {0}")]
    Parse(String),
}
