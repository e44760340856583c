use std::collections::HashMap;

use super::{CatalogClient, FetchError};
use crate::domain::{CourseCode, Roster, Subject};

type Key = (CourseCode, Roster);

/// An offline catalog serving canned prerequisite descriptions.
///
/// Courses that were never inserted are reported as
/// [`FetchError::NotFound`]. A subject lists every course inserted under it
/// for the roster, including those registered with an error. Every fetch is counted per key so callers can
/// observe how often the catalog was consulted.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    entries: HashMap<Key, Result<String, FetchError>>,
    calls: HashMap<Key, usize>,
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the prerequisite description of a course.
    pub fn insert(&mut self, code: CourseCode, roster: Roster, description: impl Into<String>) {
        self.entries
            .insert((code, roster), Ok(description.into()));
    }

    /// Make fetches of a course fail with the given error.
    pub fn insert_error(&mut self, code: CourseCode, roster: Roster, error: FetchError) {
        self.entries.insert((code, roster), Err(error));
    }

    /// Returns how many times the course was fetched in the roster.
    #[must_use]
    pub fn calls(&self, code: &CourseCode, roster: &Roster) -> usize {
        self.calls
            .get(&(code.clone(), roster.clone()))
            .copied()
            .unwrap_or_default()
    }

    /// Returns the total number of fetches served.
    #[must_use]
    pub fn total_calls(&self) -> usize {
        self.calls.values().sum()
    }
}

impl CatalogClient for InMemoryCatalog {
    fn fetch(&mut self, code: &CourseCode, roster: &Roster) -> Result<String, FetchError> {
        let key = (code.clone(), roster.clone());
        *self.calls.entry(key.clone()).or_default() += 1;
        self.entries
            .get(&key)
            .cloned()
            .unwrap_or_else(|| {
                Err(FetchError::NotFound {
                    code: key.0,
                    roster: key.1,
                })
            })
    }

    fn list_subject(
        &mut self,
        subject: &Subject,
        roster: &Roster,
    ) -> Result<Vec<CourseCode>, FetchError> {
        let mut codes: Vec<CourseCode> = self
            .entries
            .keys()
            .filter(|(code, listed)| listed == roster && code.subject() == subject.as_str())
            .map(|(code, _)| code.clone())
            .collect();

        if codes.is_empty() {
            return Err(FetchError::SubjectNotFound {
                subject: subject.clone(),
                roster: roster.clone(),
            });
        }
        codes.sort_unstable();
        Ok(codes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serves_inserted_descriptions_and_counts_calls() {
        let code: CourseCode = "CS 2110".parse().unwrap();
        let roster: Roster = "FA25".parse().unwrap();
        let mut catalog = InMemoryCatalog::new();
        catalog.insert(code.clone(), roster.clone(), "CS 1110 or equivalent");

        assert_eq!(
            catalog.fetch(&code, &roster).unwrap(),
            "CS 1110 or equivalent"
        );
        catalog.fetch(&code, &roster).unwrap();
        assert_eq!(catalog.calls(&code, &roster), 2);
    }

    #[test]
    fn unknown_course_is_not_found() {
        let code: CourseCode = "CS 9999".parse().unwrap();
        let roster: Roster = "FA25".parse().unwrap();
        let mut catalog = InMemoryCatalog::new();

        let error = catalog.fetch(&code, &roster).unwrap_err();
        assert!(matches!(error, FetchError::NotFound { .. }));
        assert_eq!(catalog.total_calls(), 1);
    }

    #[test]
    fn lists_subject_in_order() {
        let fall: Roster = "FA25".parse().unwrap();
        let spring: Roster = "SP25".parse().unwrap();
        let code = |s: &str| s.parse::<CourseCode>().unwrap();
        let mut catalog = InMemoryCatalog::new();
        catalog.insert(code("CS 4820"), fall.clone(), "CS 2110");
        catalog.insert(code("CS 2110"), fall.clone(), "");
        catalog.insert_error(code("CS 3110"), fall.clone(), FetchError::Parse("bad".into()));
        catalog.insert(code("CS 1110"), spring, "");
        catalog.insert(code("MATH 2940"), fall.clone(), "");

        let listed = catalog
            .list_subject(&Subject::new("cs").unwrap(), &fall)
            .unwrap();
        assert_eq!(listed, [code("CS 2110"), code("CS 3110"), code("CS 4820")]);
        assert_eq!(catalog.total_calls(), 0);
    }

    #[test]
    fn unknown_subject_is_not_found() {
        let roster: Roster = "FA25".parse().unwrap();
        let mut catalog = InMemoryCatalog::new();

        let error = catalog
            .list_subject(&Subject::new("ORIE").unwrap(), &roster)
            .unwrap_err();
        assert!(matches!(error, FetchError::SubjectNotFound { .. }));
    }

    #[test]
    fn rosters_are_independent() {
        let code: CourseCode = "CS 2110".parse().unwrap();
        let fall: Roster = "FA25".parse().unwrap();
        let spring: Roster = "SP25".parse().unwrap();
        let mut catalog = InMemoryCatalog::new();
        catalog.insert(code.clone(), fall.clone(), "CS 1110");

        assert!(catalog.fetch(&code, &fall).is_ok());
        assert!(catalog.fetch(&code, &spring).is_err());
    }
}
