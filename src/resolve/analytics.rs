use std::{cmp::Reverse, collections::BTreeMap};

use serde::Serialize;

use super::{CheckResult, Checker};
use crate::{catalog::CatalogClient, domain::CourseCode};

/// How often each course code appears among the direct prerequisites of a
/// batch of checked courses.
///
/// Codes that are mentioned often but are not approved are the natural
/// candidates for growing the allow-list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analytics {
    /// Every code mentioned as a direct prerequisite, with the number of
    /// checked courses mentioning it. Most frequent first, ties by code.
    pub observed_code_counts: Vec<(CourseCode, usize)>,
    /// The subset of `observed_code_counts` that is not on the allow-list.
    #[serde(rename = "not_in_whitelist_counts")]
    pub unapproved_code_counts: Vec<(CourseCode, usize)>,
    /// Size of the allow-list the batch was checked against.
    #[serde(rename = "whitelist_size")]
    pub allow_list_size: usize,
}

impl Analytics {
    /// Returns `true` if some mentioned prerequisite is not approved.
    #[must_use]
    pub fn has_unapproved(&self) -> bool {
        !self.unapproved_code_counts.is_empty()
    }
}

impl<C: CatalogClient> Checker<C> {
    /// Count the direct prerequisites of every course in `result`.
    ///
    /// Courses the resolver never had to look up, such as approved ones, are
    /// fetched now. Courses that cannot be fetched contribute nothing.
    pub fn analytics(&mut self, result: &CheckResult) -> Analytics {
        let roster = &result.metadata().roster;
        let mut observed: BTreeMap<CourseCode, usize> = BTreeMap::new();

        for code in result.results().keys() {
            for prerequisite in self.prerequisites(code, roster).prerequisites() {
                *observed.entry(prerequisite.clone()).or_insert(0) += 1;
            }
        }

        let unapproved = observed
            .iter()
            .filter(|(code, _)| !self.allow_list().contains(code))
            .map(|(code, &count)| (code.clone(), count))
            .collect();

        Analytics {
            observed_code_counts: by_frequency(observed),
            unapproved_code_counts: by_frequency(unapproved),
            allow_list_size: self.allow_list().len(),
        }
    }
}

fn by_frequency(counts: BTreeMap<CourseCode, usize>) -> Vec<(CourseCode, usize)> {
    let mut counts: Vec<_> = counts.into_iter().collect();
    // stable, so equal counts stay in code order
    counts.sort_by_key(|&(_, count)| Reverse(count));
    counts
}
