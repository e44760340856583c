//! Recursive resolution of prerequisite chains against an allow-list.

use std::fmt;

use super::{CacheEntry, PrerequisiteSet, ResolutionCache, extract};
use crate::{
    catalog::{CatalogClient, FetchError},
    domain::{AllowList, CourseCode, Roster},
};

/// Default bound on how many prerequisite hops are explored.
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// A fetch error that was downgraded to "no prerequisites".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    /// The course that could not be fetched.
    pub code: CourseCode,
    /// The roster it was requested from.
    pub roster: Roster,
    /// Why the fetch failed.
    pub error: FetchError,
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.code, self.roster, self.error)
    }
}

/// Decides whether courses are technical electives.
///
/// A course qualifies if it, or any course reachable through its
/// prerequisites within the depth bound, is on the allow-list. Each
/// `(course, roster)` pair is fetched from the catalog at most once per
/// checker; failed fetches are recorded and the course is treated as having
/// no prerequisites.
#[derive(Debug)]
pub struct Checker<C> {
    allow_list: AllowList,
    client: C,
    cache: ResolutionCache,
    fetch_errors: Vec<FetchFailure>,
}

impl<C: CatalogClient> Checker<C> {
    /// Create a checker for the given allow-list backed by `client`.
    #[must_use]
    pub fn new(allow_list: AllowList, client: C) -> Self {
        Self {
            allow_list,
            client,
            cache: ResolutionCache::new(),
            fetch_errors: Vec::new(),
        }
    }

    /// Returns the allow-list this checker resolves against.
    #[must_use]
    pub const fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    /// Returns the catalog client.
    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Returns the catalog client mutably.
    pub const fn client_mut(&mut self) -> &mut C {
        &mut self.client
    }

    /// Returns the prerequisites looked up so far.
    #[must_use]
    pub const fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    /// Returns every fetch error observed so far, in order of occurrence.
    #[must_use]
    pub fn fetch_errors(&self) -> &[FetchFailure] {
        &self.fetch_errors
    }

    /// Returns `true` if the course is a technical elective.
    ///
    /// The course qualifies if it is on the allow-list itself, or if any
    /// prerequisite chain starting from it reaches the allow-list within
    /// `max_depth` hops. A `max_depth` of zero only checks the course itself.
    pub fn is_tech_elective(
        &mut self,
        code: &CourseCode,
        roster: &Roster,
        max_depth: usize,
    ) -> bool {
        let qualifies = self.walk(code, roster, 0, max_depth, &mut Vec::new(), None);
        tracing::debug!("{code} ({roster}) qualifies: {qualifies}");
        qualifies
    }

    /// Resolve a course like [`Checker::is_tech_elective`], recording every
    /// node visited in traversal order.
    pub fn trace(&mut self, code: &CourseCode, roster: &Roster, max_depth: usize) -> Trace {
        let mut steps = Vec::new();
        let qualifies = self.walk(
            code,
            roster,
            0,
            max_depth,
            &mut Vec::new(),
            Some(&mut steps),
        );
        Trace { qualifies, steps }
    }

    /// Returns the direct prerequisites of a course, fetching them from the
    /// catalog on first use.
    pub fn prerequisites(&mut self, code: &CourseCode, roster: &Roster) -> &CacheEntry {
        let client = &mut self.client;
        let fetch_errors = &mut self.fetch_errors;
        self.cache.get_or_fetch(code, roster, || {
            match client.fetch(code, roster) {
                Ok(text) => {
                    let prerequisites = extract(&text);
                    tracing::debug!(
                        "fetched {code} ({roster}): {} prerequisite(s)",
                        prerequisites.len()
                    );
                    CacheEntry::Known(prerequisites)
                }
                Err(error) => {
                    tracing::warn!(
                        "treating {code} ({roster}) as having no prerequisites: {error}"
                    );
                    fetch_errors.push(FetchFailure {
                        code: code.clone(),
                        roster: roster.clone(),
                        error,
                    });
                    CacheEntry::Unavailable
                }
            }
        })
    }

    /// Depth-first search for an approved course.
    ///
    /// `path` holds the courses on the current branch only; it is restored
    /// before returning so sibling branches never see each other's nodes.
    fn walk(
        &mut self,
        code: &CourseCode,
        roster: &Roster,
        depth: usize,
        max_depth: usize,
        path: &mut Vec<CourseCode>,
        mut trace: Option<&mut Vec<TraceStep>>,
    ) -> bool {
        let mut record = |visit: Visit| {
            if let Some(steps) = trace.as_deref_mut() {
                steps.push(TraceStep {
                    depth,
                    code: code.clone(),
                    visit,
                });
            }
        };

        if path.contains(code) {
            record(Visit::Cycle);
            return false;
        }

        if self.allow_list.contains(code) {
            record(Visit::Approved);
            return true;
        }

        if depth >= max_depth {
            record(Visit::DepthLimit);
            return false;
        }

        let prerequisites = match self.prerequisites(code, roster).clone() {
            CacheEntry::Known(set) => {
                record(Visit::Expanded(set.clone()));
                set
            }
            CacheEntry::Unavailable => {
                record(Visit::Unavailable);
                PrerequisiteSet::new()
            }
        };

        if prerequisites.is_empty() {
            return false;
        }

        path.push(code.clone());
        let found = prerequisites.iter().any(|prerequisite| {
            self.walk(
                prerequisite,
                roster,
                depth + 1,
                max_depth,
                path,
                trace.as_deref_mut(),
            )
        });
        path.pop();

        found
    }
}

/// What happened when the resolver reached a course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visit {
    /// The course is on the allow-list.
    Approved,
    /// The course is already on the current path.
    Cycle,
    /// The depth bound was reached before the course's prerequisites were
    /// examined.
    DepthLimit,
    /// The course is not approved; its prerequisites (possibly none) were
    /// examined.
    Expanded(PrerequisiteSet),
    /// The course is not approved and could not be fetched.
    Unavailable,
}

/// One node visited during a traced resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceStep {
    /// Distance from the queried course.
    pub depth: usize,
    /// The course visited.
    pub code: CourseCode,
    /// What was found.
    pub visit: Visit,
}

impl TraceStep {
    /// Returns `true` if this node matched the allow-list.
    #[must_use]
    pub const fn matched(&self) -> bool {
        matches!(self.visit, Visit::Approved)
    }
}

impl fmt::Display for TraceStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:indent$}{}: ", "", self.code, indent = self.depth * 2)?;
        match &self.visit {
            Visit::Approved => write!(f, "on allow-list"),
            Visit::Cycle => write!(f, "already on this path, skipped"),
            Visit::DepthLimit => write!(f, "not on allow-list, depth limit reached"),
            Visit::Unavailable => write!(f, "not on allow-list, no prerequisites (fetch failed)"),
            Visit::Expanded(set) if set.is_empty() => {
                write!(f, "not on allow-list, no prerequisites")
            }
            Visit::Expanded(set) => {
                let codes: Vec<String> = set.iter().map(ToString::to_string).collect();
                write!(f, "not on allow-list, prerequisites [{}]", codes.join(", "))
            }
        }
    }
}

/// The outcome of a traced resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    /// Whether the course qualifies.
    pub qualifies: bool,
    /// Every node visited, in traversal order.
    pub steps: Vec<TraceStep>,
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            writeln!(f, "{step}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;

    fn code(s: &str) -> CourseCode {
        s.parse().unwrap()
    }

    fn fa25() -> Roster {
        "FA25".parse().unwrap()
    }

    fn allow(codes: &[&str]) -> AllowList {
        codes.iter().map(|c| code(c)).collect()
    }

    /// CS 4820 -> {CS 2110, CS 2800}, CS 2110 -> {CS 1110}, CS 1110 -> {}.
    fn sample_catalog() -> InMemoryCatalog {
        let mut catalog = InMemoryCatalog::new();
        catalog.insert(code("CS 4820"), fa25(), "CS 2110 and CS 2800.");
        catalog.insert(code("CS 2110"), fa25(), "CS 1110 or equivalent.");
        catalog.insert(code("CS 1110"), fa25(), "");
        catalog
    }

    fn checker(approved: &[&str], catalog: InMemoryCatalog) -> Checker<InMemoryCatalog> {
        Checker::new(allow(approved), catalog)
    }

    #[test]
    fn qualifies_through_direct_prerequisite() {
        let mut checker = checker(&["CS 2800"], sample_catalog());
        assert!(checker.is_tech_elective(&code("CS 4820"), &fa25(), DEFAULT_MAX_DEPTH));
    }

    #[test]
    fn course_without_approved_ancestry_does_not_qualify() {
        let mut checker = checker(&["CS 2800"], sample_catalog());
        assert!(!checker.is_tech_elective(&code("CS 1110"), &fa25(), DEFAULT_MAX_DEPTH));
    }

    #[test]
    fn qualifies_through_transitive_prerequisite() {
        let mut checker = checker(&["CS 1110"], sample_catalog());
        assert!(checker.is_tech_elective(&code("CS 4820"), &fa25(), DEFAULT_MAX_DEPTH));
    }

    #[test]
    fn approved_course_qualifies_without_fetching() {
        let mut checker = checker(&["CS 9999"], InMemoryCatalog::new());
        assert!(checker.is_tech_elective(&code("CS 9999"), &fa25(), DEFAULT_MAX_DEPTH));
        assert_eq!(checker.client().total_calls(), 0);
    }

    #[test]
    fn zero_depth_only_checks_the_course_itself() {
        let mut checker = checker(&["CS 2800"], sample_catalog());
        assert!(!checker.is_tech_elective(&code("CS 4820"), &fa25(), 0));
        assert!(checker.is_tech_elective(&code("CS 2800"), &fa25(), 0));
        assert_eq!(checker.client().total_calls(), 0);
    }

    #[test]
    fn depth_bound_limits_the_search() {
        let mut checker = checker(&["CS 1110"], sample_catalog());
        // CS 4820 -> CS 2110 -> CS 1110 needs two hops.
        assert!(!checker.is_tech_elective(&code("CS 4820"), &fa25(), 1));
        assert!(checker.is_tech_elective(&code("CS 4820"), &fa25(), 2));
    }

    #[test]
    fn cycles_terminate() {
        let mut catalog = InMemoryCatalog::new();
        catalog.insert(code("CS 3000"), fa25(), "CS 3001");
        catalog.insert(code("CS 3001"), fa25(), "CS 3002");
        catalog.insert(code("CS 3002"), fa25(), "CS 3000 or CS 3001");
        let mut checker = checker(&["MATH 2210"], catalog);

        assert!(!checker.is_tech_elective(&code("CS 3000"), &fa25(), 50));
        assert!(!checker.is_tech_elective(&code("CS 3000"), &fa25(), 50));
    }

    #[test]
    fn self_reference_is_a_dead_end() {
        let mut catalog = InMemoryCatalog::new();
        catalog.insert(code("CS 4999"), fa25(), "CS 4999 may be repeated; also CS 2800.");
        let mut checker = checker(&["CS 2800"], catalog);

        assert!(checker.is_tech_elective(&code("CS 4999"), &fa25(), DEFAULT_MAX_DEPTH));
    }

    #[test]
    fn each_course_is_fetched_once() {
        let mut checker = checker(&["MATH 2210"], sample_catalog());
        checker.is_tech_elective(&code("CS 4820"), &fa25(), DEFAULT_MAX_DEPTH);
        checker.is_tech_elective(&code("CS 4820"), &fa25(), DEFAULT_MAX_DEPTH);
        checker.is_tech_elective(&code("CS 2110"), &fa25(), DEFAULT_MAX_DEPTH);

        let catalog = checker.client();
        assert_eq!(catalog.calls(&code("CS 4820"), &fa25()), 1);
        assert_eq!(catalog.calls(&code("CS 2110"), &fa25()), 1);
        assert_eq!(catalog.calls(&code("CS 1110"), &fa25()), 1);
    }

    #[test]
    fn shared_prerequisites_are_fetched_once() {
        // Both branches lead to CS 1110; the second visit is served from cache.
        let mut catalog = InMemoryCatalog::new();
        catalog.insert(code("CS 4410"), fa25(), "CS 3410 and CS 2110");
        catalog.insert(code("CS 3410"), fa25(), "CS 1110");
        catalog.insert(code("CS 2110"), fa25(), "CS 1110");
        catalog.insert(code("CS 1110"), fa25(), "");
        let mut checker = checker(&["MATH 2210"], catalog);

        assert!(!checker.is_tech_elective(&code("CS 4410"), &fa25(), DEFAULT_MAX_DEPTH));
        assert_eq!(checker.client().calls(&code("CS 1110"), &fa25()), 1);
    }

    #[test]
    fn fetch_failures_fail_closed_and_are_recorded() {
        let mut catalog = InMemoryCatalog::new();
        catalog.insert(code("CS 4820"), fa25(), "CS 2110");
        catalog.insert_error(
            code("CS 2110"),
            fa25(),
            FetchError::Network("connection reset".to_string()),
        );
        let mut checker = checker(&["CS 1110"], catalog);

        assert!(!checker.is_tech_elective(&code("CS 4820"), &fa25(), DEFAULT_MAX_DEPTH));

        let errors = checker.fetch_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, code("CS 2110"));
        assert_eq!(
            errors[0].error,
            FetchError::Network("connection reset".to_string())
        );
        assert_eq!(
            checker.cache().get(&code("CS 2110"), &fa25()),
            Some(&CacheEntry::Unavailable)
        );
    }

    #[test]
    fn failed_fetch_is_not_retried() {
        let mut checker = checker(&["CS 1110"], InMemoryCatalog::new());
        checker.is_tech_elective(&code("CS 4820"), &fa25(), DEFAULT_MAX_DEPTH);
        checker.is_tech_elective(&code("CS 4820"), &fa25(), DEFAULT_MAX_DEPTH);

        assert_eq!(checker.client().total_calls(), 1);
        assert_eq!(checker.fetch_errors().len(), 1);
    }

    #[test]
    fn trace_records_traversal_order() {
        let mut checker = checker(&["CS 2800"], sample_catalog());
        let trace = checker.trace(&code("CS 4820"), &fa25(), DEFAULT_MAX_DEPTH);

        assert!(trace.qualifies);
        let visited: Vec<(usize, String, bool)> = trace
            .steps
            .iter()
            .map(|step| (step.depth, step.code.to_string(), step.matched()))
            .collect();
        assert_eq!(
            visited,
            [
                (0, "CS 4820".to_string(), false),
                (1, "CS 2110".to_string(), false),
                (2, "CS 1110".to_string(), false),
                (1, "CS 2800".to_string(), true),
            ]
        );
    }

    #[test]
    fn trace_agrees_with_plain_resolution() {
        let mut traced = checker(&["CS 1110"], sample_catalog());
        let mut plain = checker(&["CS 1110"], sample_catalog());
        for course in ["CS 4820", "CS 2110", "CS 1110", "CS 9999"] {
            for depth in 0..4 {
                assert_eq!(
                    traced.trace(&code(course), &fa25(), depth).qualifies,
                    plain.is_tech_elective(&code(course), &fa25(), depth),
                );
            }
        }
    }

    #[test]
    fn trace_lines_are_readable() {
        let mut checker = checker(&["CS 2800"], sample_catalog());
        let rendered = checker
            .trace(&code("CS 4820"), &fa25(), DEFAULT_MAX_DEPTH)
            .to_string();

        assert_eq!(
            rendered,
            "CS 4820: not on allow-list, prerequisites [CS 2110, CS 2800]\n  \
             CS 2110: not on allow-list, prerequisites [CS 1110]\n    \
             CS 1110: not on allow-list, no prerequisites\n  \
             CS 2800: on allow-list\n"
        );
    }
}
