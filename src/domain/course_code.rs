use std::{fmt, ops::Deref, str::FromStr, sync::LazyLock};

use regex::Regex;

/// Strict shape of a normalized course code: subject letters, optional
/// whitespace, catalog number with an optional letter suffix.
static CODE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z]{2,5})\s*(\d{3,4}[A-Z]?)$").expect("course code pattern is valid")
});

/// A validated subject string containing 2-5 uppercase letters (e.g. `CS`,
/// `MATH`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Subject(String);

impl Subject {
    /// Creates a new `Subject`, normalizing to uppercase.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Subject`] if the string is not 2-5 ASCII letters.
    pub fn new(s: &str) -> Result<Self, Error> {
        let upper = s.trim().to_ascii_uppercase();
        if !(2..=5).contains(&upper.len()) || !upper.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(Error::Subject(s.to_string()));
        }
        Ok(Self(upper))
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for Subject {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A course identifier made of a subject and a catalog number.
///
/// Format: `{SUBJECT} {NUMBER}`, where:
/// - `SUBJECT` is 2-5 uppercase letters (e.g. `CS`, `MATH`, `STSCI`)
/// - `NUMBER` is 3-4 digits with an optional trailing letter (e.g. `2110`,
///   `4710B`)
///
/// Parsing is case-insensitive and tolerant of whitespace, so `cs4820`,
/// `CS  4820` and ` CS 4820 ` all produce the same code. Equality is the only
/// identity relation; the derived ordering is lexical and exists so that
/// collections of codes iterate deterministically.
///
/// # Examples
///
/// ```
/// use electives::CourseCode;
///
/// let code: CourseCode = "cs4820".parse().unwrap();
/// assert_eq!(code.to_string(), "CS 4820");
/// assert_eq!(code.subject(), "CS");
/// assert_eq!(code.number(), "4820");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CourseCode {
    subject: Subject,
    number: String,
}

impl CourseCode {
    /// Build a course code from its two components.
    ///
    /// # Errors
    ///
    /// Returns an error if either component is malformed.
    pub fn new(subject: &str, number: &str) -> Result<Self, Error> {
        let subject = Subject::new(subject)?;
        let number = number.trim().to_ascii_uppercase();
        let valid_number = {
            let digits = number.chars().take_while(char::is_ascii_digit).count();
            let rest = &number[digits..];
            (3..=4).contains(&digits)
                && (rest.is_empty()
                    || (rest.len() == 1 && rest.chars().all(|c| c.is_ascii_uppercase())))
        };
        if !valid_number {
            return Err(Error::Number(number));
        }
        Ok(Self { subject, number })
    }

    /// Returns the subject component.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns the subject component as a [`Subject`].
    #[must_use]
    pub const fn typed_subject(&self) -> &Subject {
        &self.subject
    }

    /// Returns the catalog number component.
    #[must_use]
    pub fn number(&self) -> &str {
        &self.number
    }
}

impl fmt::Display for CourseCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.subject, self.number)
    }
}

/// Errors that can occur when parsing a course code.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// The string does not have the shape `SUBJECT NUMBER`.
    #[error("Invalid course code '{0}': expected a subject and catalog number, e.g. 'CS 2110'")]
    Syntax(String),

    /// The subject is not 2-5 letters.
    #[error("Invalid subject '{0}': must be 2-5 letters")]
    Subject(String),

    /// The catalog number is not 3-4 digits with an optional letter suffix.
    #[error("Invalid catalog number '{0}': must be 3-4 digits with an optional letter suffix")]
    Number(String),
}

impl FromStr for CourseCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        let captures = CODE_PATTERN
            .captures(&normalized)
            .ok_or_else(|| Error::Syntax(s.to_string()))?;
        Self::new(&captures[1], &captures[2])
    }
}

impl TryFrom<&str> for CourseCode {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_str(value)
    }
}

impl serde::Serialize for CourseCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for CourseCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
