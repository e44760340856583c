use std::collections::BTreeSet;

use super::CourseCode;

/// Courses that count as a technical-elective-granting prerequisite when no
/// list is supplied.
const DEFAULT_APPROVED: &[(&str, &str)] = &[
    ("CS", "2110"),
    ("CS", "2112"),
    ("CS", "2800"),
    ("CS", "2802"),
    ("CS", "3110"),
    ("CS", "3410"),
    ("MATH", "2210"),
    ("MATH", "2930"),
    ("MATH", "2940"),
];

/// The caller-supplied set of approved courses.
///
/// A course qualifies as a technical elective if it, or any course in its
/// prerequisite ancestry, is a member of this set. The list is fixed once a
/// [`Checker`](crate::Checker) is built from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList(BTreeSet<CourseCode>);

impl AllowList {
    /// Returns the built-in list of approved courses.
    #[must_use]
    pub fn builtin() -> Self {
        DEFAULT_APPROVED
            .iter()
            .filter_map(|(subject, number)| CourseCode::new(subject, number).ok())
            .collect()
    }

    /// Returns `true` if the course is approved.
    #[must_use]
    pub fn contains(&self, code: &CourseCode) -> bool {
        self.0.contains(code)
    }

    /// Returns the number of approved courses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no courses are approved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the approved courses in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &CourseCode> {
        self.0.iter()
    }
}

impl FromIterator<CourseCode> for AllowList {
    fn from_iter<T: IntoIterator<Item = CourseCode>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a AllowList {
    type Item = &'a CourseCode;
    type IntoIter = std::collections::btree_set::Iter<'a, CourseCode>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
