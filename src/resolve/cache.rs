use std::collections::{HashMap, hash_map::Entry};

use super::PrerequisiteSet;
use crate::domain::{CourseCode, Roster};

static NO_PREREQUISITES: PrerequisiteSet = PrerequisiteSet::new();

/// What is known about the direct prerequisites of one course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEntry {
    /// The catalog answered; the set may be empty.
    Known(PrerequisiteSet),
    /// The catalog could not be consulted. Treated as having no
    /// prerequisites.
    Unavailable,
}

impl CacheEntry {
    /// The prerequisites to traverse. Empty for unavailable courses.
    #[must_use]
    pub fn prerequisites(&self) -> &PrerequisiteSet {
        match self {
            Self::Known(set) => set,
            Self::Unavailable => &NO_PREREQUISITES,
        }
    }
}

/// Direct prerequisites already looked up during this run, keyed by course
/// and roster.
///
/// Entries are written once. Nothing is persisted beyond the lifetime of the
/// owning [`Checker`](crate::Checker).
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: HashMap<(CourseCode, Roster), CacheEntry>,
}

impl ResolutionCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a course.
    #[must_use]
    pub fn get(&self, code: &CourseCode, roster: &Roster) -> Option<&CacheEntry> {
        self.entries.get(&(code.clone(), roster.clone()))
    }

    /// Record a course's prerequisites.
    ///
    /// Returns `false` and leaves the existing entry untouched if the course
    /// is already cached.
    pub fn put(&mut self, code: CourseCode, roster: Roster, entry: CacheEntry) -> bool {
        match self.entries.entry((code, roster)) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(entry);
                true
            }
        }
    }

    /// Return the cached entry for a course, computing and storing it with
    /// `fetch` on a miss.
    pub fn get_or_fetch(
        &mut self,
        code: &CourseCode,
        roster: &Roster,
        fetch: impl FnOnce() -> CacheEntry,
    ) -> &CacheEntry {
        match self.entries.entry((code.clone(), roster.clone())) {
            Entry::Occupied(slot) => {
                tracing::trace!("cache hit for {code} in {roster}");
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(fetch()),
        }
    }

    /// Returns the number of cached courses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
