use std::{collections::BTreeMap, time::Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Checker;
use crate::{
    catalog::{CatalogClient, FetchError},
    domain::{CourseCode, Roster, Subject},
};

/// Notification emitted after each course in a batch is resolved.
#[derive(Debug, Clone, Copy)]
pub struct Progress<'a> {
    /// Number of courses resolved so far, including this one.
    pub completed: usize,
    /// Number of courses in the batch.
    pub total: usize,
    /// The course just resolved.
    pub code: &'a CourseCode,
    /// Whether it qualifies.
    pub qualifies: bool,
}

/// Run metadata of a [`CheckResult`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    /// Number of distinct courses checked.
    pub total_courses_checked: usize,
    /// Number of courses that qualify.
    pub tech_electives_found: usize,
    /// Number of courses that do not qualify.
    pub non_tech_electives_found: usize,
    /// The roster the courses were resolved in.
    pub roster: Roster,
    /// Snapshot of the allow-list used.
    pub approved_courses: Vec<CourseCode>,
    /// When the result was assembled.
    pub timestamp: DateTime<Utc>,
    /// Wall-clock duration of the batch.
    pub elapsed_seconds: f64,
}

/// The outcome of checking a batch of courses.
///
/// `results` has one entry per distinct course. The two lists partition its
/// keys by outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    metadata: Metadata,
    results: BTreeMap<CourseCode, bool>,
    tech_electives: Vec<CourseCode>,
    non_tech_electives: Vec<CourseCode>,
}

impl CheckResult {
    fn assemble(
        results: BTreeMap<CourseCode, bool>,
        roster: Roster,
        approved_courses: Vec<CourseCode>,
        elapsed_seconds: f64,
    ) -> Self {
        let (tech, non_tech): (Vec<_>, Vec<_>) =
            results.iter().partition(|&(_, &qualifies)| qualifies);
        let tech_electives: Vec<CourseCode> = tech.into_iter().map(|(c, _)| c.clone()).collect();
        let non_tech_electives: Vec<CourseCode> =
            non_tech.into_iter().map(|(c, _)| c.clone()).collect();

        let metadata = Metadata {
            total_courses_checked: results.len(),
            tech_electives_found: tech_electives.len(),
            non_tech_electives_found: non_tech_electives.len(),
            roster,
            approved_courses,
            timestamp: Utc::now(),
            elapsed_seconds,
        };

        Self {
            metadata,
            results,
            tech_electives,
            non_tech_electives,
        }
    }

    /// Returns the run metadata.
    #[must_use]
    pub const fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Returns the outcome for every course, keyed by course code.
    #[must_use]
    pub const fn results(&self) -> &BTreeMap<CourseCode, bool> {
        &self.results
    }

    /// Returns the outcome for one course, if it was checked.
    #[must_use]
    pub fn get(&self, code: &CourseCode) -> Option<bool> {
        self.results.get(code).copied()
    }

    /// Returns the courses that qualify.
    #[must_use]
    pub fn tech_electives(&self) -> &[CourseCode] {
        &self.tech_electives
    }

    /// Returns the courses that do not qualify.
    #[must_use]
    pub fn non_tech_electives(&self) -> &[CourseCode] {
        &self.non_tech_electives
    }
}

impl<C: CatalogClient> Checker<C> {
    /// Check a sequence of courses.
    pub fn check_many(
        &mut self,
        codes: &[CourseCode],
        roster: &Roster,
        max_depth: usize,
    ) -> CheckResult {
        self.check_many_with_progress(codes, roster, max_depth, |_| {})
    }

    /// Check a sequence of courses in order, reporting each outcome to
    /// `progress` as it is decided.
    ///
    /// Repeated codes are resolved again and collapse into a single entry of
    /// the result.
    pub fn check_many_with_progress(
        &mut self,
        codes: &[CourseCode],
        roster: &Roster,
        max_depth: usize,
        mut progress: impl FnMut(Progress<'_>),
    ) -> CheckResult {
        let start = Instant::now();
        let total = codes.len();
        let mut results = BTreeMap::new();

        tracing::info!("checking {total} course(s) in {roster} (max depth {max_depth})");

        for (index, code) in codes.iter().enumerate() {
            let qualifies = self.is_tech_elective(code, roster, max_depth);
            results.insert(code.clone(), qualifies);
            progress(Progress {
                completed: index + 1,
                total,
                code,
                qualifies,
            });
        }

        let elapsed = start.elapsed().as_secs_f64();
        if !self.fetch_errors().is_empty() {
            tracing::info!(
                "{} course(s) could not be fetched and were treated as having no prerequisites",
                self.fetch_errors().len()
            );
        }

        CheckResult::assemble(
            results,
            roster.clone(),
            self.allow_list().iter().cloned().collect(),
            elapsed,
        )
    }

    /// List every course the catalog offers in a subject.
    ///
    /// # Errors
    ///
    /// Returns the catalog's error if the subject cannot be listed. Unlike
    /// prerequisite lookups, a failed listing is not downgraded: without it
    /// there is nothing to check.
    pub fn list_subject(
        &mut self,
        subject: &Subject,
        roster: &Roster,
    ) -> Result<Vec<CourseCode>, FetchError> {
        let codes = self.client_mut().list_subject(subject, roster)?;
        tracing::info!("{subject} lists {} course(s) in {roster}", codes.len());
        Ok(codes)
    }

    /// Check every course the catalog offers in a subject.
    ///
    /// # Errors
    ///
    /// Returns the catalog's error if the subject cannot be listed.
    pub fn check_subject(
        &mut self,
        subject: &Subject,
        roster: &Roster,
        max_depth: usize,
    ) -> Result<CheckResult, FetchError> {
        let codes = self.list_subject(subject, roster)?;
        Ok(self.check_many(&codes, roster, max_depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::InMemoryCatalog,
        domain::AllowList,
        resolve::DEFAULT_MAX_DEPTH,
    };

    fn code(s: &str) -> CourseCode {
        s.parse().unwrap()
    }

    fn fa25() -> Roster {
        "FA25".parse().unwrap()
    }

    fn checker() -> Checker<InMemoryCatalog> {
        let mut catalog = InMemoryCatalog::new();
        catalog.insert(code("CS 4820"), fa25(), "CS 2110 and CS 2800.");
        catalog.insert(code("CS 2110"), fa25(), "CS 1110 or equivalent.");
        catalog.insert(code("CS 1110"), fa25(), "");
        let allow_list: AllowList = [code("CS 2800")].into_iter().collect();
        Checker::new(allow_list, catalog)
    }

    #[test]
    fn partitions_results() {
        let result = checker().check_many(
            &[code("CS 4820"), code("CS 1110")],
            &fa25(),
            DEFAULT_MAX_DEPTH,
        );

        assert_eq!(result.get(&code("CS 4820")), Some(true));
        assert_eq!(result.get(&code("CS 1110")), Some(false));
        assert_eq!(result.tech_electives(), [code("CS 4820")]);
        assert_eq!(result.non_tech_electives(), [code("CS 1110")]);

        let metadata = result.metadata();
        assert_eq!(metadata.total_courses_checked, 2);
        assert_eq!(metadata.tech_electives_found, 1);
        assert_eq!(metadata.non_tech_electives_found, 1);
        assert_eq!(metadata.roster, fa25());
        assert_eq!(metadata.approved_courses, [code("CS 2800")]);
    }

    #[test]
    fn duplicate_inputs_collapse() {
        let result = checker().check_many(
            &[code("CS 4820"), code("cs4820")],
            &fa25(),
            DEFAULT_MAX_DEPTH,
        );

        assert_eq!(result.results().len(), 1);
        assert_eq!(result.get(&code("CS 4820")), Some(true));
        assert_eq!(result.metadata().total_courses_checked, 1);
    }

    #[test]
    fn unknown_courses_do_not_abort_the_batch() {
        let mut checker = checker();
        let result = checker.check_many(
            &[code("CS 9999"), code("CS 4820")],
            &fa25(),
            DEFAULT_MAX_DEPTH,
        );

        assert_eq!(result.get(&code("CS 9999")), Some(false));
        assert_eq!(result.get(&code("CS 4820")), Some(true));
        assert_eq!(checker.fetch_errors().len(), 1);
    }

    #[test]
    fn empty_batch() {
        let result = checker().check_many(&[], &fa25(), DEFAULT_MAX_DEPTH);
        assert!(result.results().is_empty());
        assert_eq!(result.metadata().total_courses_checked, 0);
    }

    #[test]
    fn checks_a_whole_subject() {
        let mut checker = checker();
        let cs = Subject::new("CS").unwrap();

        assert_eq!(
            checker.list_subject(&cs, &fa25()).unwrap(),
            [code("CS 1110"), code("CS 2110"), code("CS 4820")]
        );

        let result = checker.check_subject(&cs, &fa25(), DEFAULT_MAX_DEPTH).unwrap();
        assert_eq!(result.metadata().total_courses_checked, 3);
        assert_eq!(result.tech_electives(), [code("CS 4820")]);
        assert_eq!(
            result.non_tech_electives(),
            [code("CS 1110"), code("CS 2110")]
        );
    }

    #[test]
    fn unlisted_subject_is_an_error() {
        let mut checker = checker();
        let error = checker
            .check_subject(&Subject::new("ORIE").unwrap(), &fa25(), DEFAULT_MAX_DEPTH)
            .unwrap_err();

        assert!(matches!(error, FetchError::SubjectNotFound { .. }));
        assert!(checker.fetch_errors().is_empty());
    }

    #[test]
    fn reports_progress_in_order() {
        let mut seen = Vec::new();
        checker().check_many_with_progress(
            &[code("CS 1110"), code("CS 4820"), code("CS 1110")],
            &fa25(),
            DEFAULT_MAX_DEPTH,
            |progress| {
                seen.push((
                    progress.completed,
                    progress.total,
                    progress.code.to_string(),
                    progress.qualifies,
                ));
            },
        );

        assert_eq!(
            seen,
            [
                (1, 3, "CS 1110".to_string(), false),
                (2, 3, "CS 4820".to_string(), true),
                (3, 3, "CS 1110".to_string(), false),
            ]
        );
    }
}
