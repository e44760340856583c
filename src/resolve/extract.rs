use std::{collections::BTreeSet, sync::LazyLock};

use regex::Regex;

use crate::domain::CourseCode;

/// The set of course codes mentioned by one course's prerequisite text.
pub type PrerequisiteSet = BTreeSet<CourseCode>;

/// A subject immediately followed by a catalog number, e.g. `CS 2110`,
/// `MATH1920` or `ECE 4710B`.
static CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z]{2,5})[\s/]*(\d{3,4}[A-Z]?)\b").expect("course pattern is valid")
});

/// Several slash-separated subjects sharing one number, e.g. `CS/INFO 4321`.
static CROSS_LISTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b((?:[A-Z]{2,5}/)+[A-Z]{2,5})\s*(\d{3,4}[A-Z]?)\b")
        .expect("cross-listing pattern is valid")
});

/// Words that look like a subject when followed by a number, as in
/// `CS 2110 or 2112` or `one 3000-level course`.
///
/// Only words that are not catalog subjects belong here: `AS`, `LA`, `NS`
/// and `PE` are real subjects and must stay extractable.
const NOT_SUBJECTS: &[&str] = &[
    "ABOVE", "ALL", "AN", "AND", "ANY", "AT", "BY", "EACH", "FIVE", "FOR", "FOUR", "FROM", "IN",
    "IS", "LEAST", "NO", "NOT", "OF", "ON", "ONE", "OR", "OVER", "PLUS", "THE", "THREE", "TO",
    "TWO", "UNDER", "WITH",
];

/// Extract every course code mentioned in a free-text prerequisite
/// description.
///
/// Boolean structure (`and`, `or`, parentheses) is ignored: every mentioned
/// code becomes a candidate prerequisite. Cross-listed codes such as
/// `CS/INFO 4321` yield one code per subject. Matches that do not form a
/// valid [`CourseCode`] are dropped.
///
/// # Examples
///
/// ```
/// use electives::resolve::extract;
///
/// let codes = extract("Prerequisite: CS 2110 and (CS 2800 or cs/info 4300).");
/// let codes: Vec<String> = codes.iter().map(ToString::to_string).collect();
/// assert_eq!(codes, ["CS 2110", "CS 2800", "CS 4300", "INFO 4300"]);
/// ```
#[must_use]
pub fn extract(text: &str) -> PrerequisiteSet {
    if text.trim().is_empty() {
        return PrerequisiteSet::new();
    }
    let text = text.to_uppercase();

    let cross_listed = CROSS_LISTED.captures_iter(&text).flat_map(|captures| {
        let number = captures[2].to_string();
        captures[1]
            .split('/')
            .map(|subject| (subject.to_string(), number.clone()))
            .collect::<Vec<_>>()
    });

    let direct = CODE
        .captures_iter(&text)
        .map(|captures| (captures[1].to_string(), captures[2].to_string()));

    cross_listed
        .chain(direct)
        .filter(|(subject, _)| !NOT_SUBJECTS.contains(&subject.as_str()))
        .filter_map(|(subject, number)| match CourseCode::new(&subject, &number) {
            Ok(code) => Some(code),
            Err(e) => {
                tracing::trace!("dropping malformed prerequisite token: {e}");
                None
            }
        })
        .collect()
}
