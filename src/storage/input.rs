//! Loaders for course lists and allow-lists.
//!
//! Course lists are either plain text (one code per line) or delimited tables
//! (code in the first column). Allow-lists may additionally be JSON arrays.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::domain::{AllowList, CourseCode, CourseCodeError};

/// Errors that can occur while loading an input file.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// The file that was requested.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// A line does not hold a valid course code.
    #[error("{}:{line}: {source}", .path.display())]
    InvalidCode {
        /// The file being read.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// Why the code was rejected.
        source: CourseCodeError,
    },

    /// The file is structurally invalid.
    #[error("{}: {message}", .path.display())]
    Format {
        /// The file being read.
        path: PathBuf,
        /// What is wrong with it.
        message: String,
    },
}

/// The layout of a course-list file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFormat {
    /// One course code per line.
    Lines,
    /// Delimited rows; the course code is in the first column.
    Delimited(char),
}

impl ListFormat {
    /// Infer the layout from a file extension: `.csv` is comma-delimited,
    /// `.tsv` is tab-delimited, anything else is one code per line.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("csv") => Self::Delimited(','),
            Some("tsv") => Self::Delimited('\t'),
            _ => Self::Lines,
        }
    }
}

/// Load an ordered list of course codes from a file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or a row holds something other
/// than a course code.
pub fn load_course_list(path: &Path) -> Result<Vec<CourseCode>, InputError> {
    let content = read(path)?;
    parse_course_list(&content, ListFormat::from_path(path)).map_err(|(line, source)| {
        InputError::InvalidCode {
            path: path.to_path_buf(),
            line,
            source,
        }
    })
}

/// Parse an ordered list of course codes.
///
/// Entries are trimmed; blank lines and lines starting with `#` are skipped.
/// In delimited input a leading header row (a first cell without digits) is
/// skipped too.
///
/// # Errors
///
/// Returns the one-based line number and parse error of the first invalid
/// entry.
pub fn parse_course_list(
    content: &str,
    format: ListFormat,
) -> Result<Vec<CourseCode>, (usize, CourseCodeError)> {
    let mut codes = Vec::new();
    let mut seen_row = false;

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let cell = match format {
            ListFormat::Lines => line,
            ListFormat::Delimited(delimiter) => line
                .split(delimiter)
                .next()
                .unwrap_or_default()
                .trim()
                .trim_matches('"')
                .trim(),
        };

        let first_row = !seen_row;
        seen_row = true;

        if first_row
            && matches!(format, ListFormat::Delimited(_))
            && !cell.chars().any(|c| c.is_ascii_digit())
        {
            tracing::debug!("skipping header row '{line}'");
            continue;
        }

        let code = cell.parse().map_err(|e| (index + 1, e))?;
        codes.push(code);
    }

    Ok(codes)
}

/// One entry of a JSON allow-list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonEntry {
    /// `"CS 2110"`
    Code(String),
    /// `["CS", "2110"]` or `["CS", 2110]`
    Pair(String, CatalogNumber),
}

/// The number half of a JSON allow-list pair.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogNumber {
    Text(String),
    Integer(u32),
}

impl CatalogNumber {
    fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Integer(number) => number.to_string(),
        }
    }
}

/// Load an allow-list from a file.
///
/// Accepted formats:
/// - a JSON array of codes: `["CS 2110", "CS 3110"]`
/// - a JSON array of pairs: `[["CS", "2110"], ["MATH", 2210]]`
/// - plain text with one code per line; `#` starts a comment line
///
/// # Errors
///
/// Returns an error if the file cannot be read, is malformed JSON, or holds an
/// invalid course code.
pub fn load_allow_list(path: &Path) -> Result<AllowList, InputError> {
    let content = read(path)?;
    let trimmed = content.trim_start();

    if !(trimmed.starts_with('[') || trimmed.starts_with('{')) {
        let codes = parse_course_list(&content, ListFormat::Lines).map_err(|(line, source)| {
            InputError::InvalidCode {
                path: path.to_path_buf(),
                line,
                source,
            }
        })?;
        return Ok(codes.into_iter().collect());
    }

    let entries: Vec<JsonEntry> =
        serde_json::from_str(&content).map_err(|e| InputError::Format {
            path: path.to_path_buf(),
            message: format!("expected a JSON array of course codes: {e}"),
        })?;

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let code = match entry {
                JsonEntry::Code(code) => code.parse(),
                JsonEntry::Pair(subject, number) => {
                    CourseCode::new(&subject, &number.into_string())
                }
            };
            code.map_err(|source| InputError::Format {
                path: path.to_path_buf(),
                message: format!("entry {}: {source}", index + 1),
            })
        })
        .collect()
}

fn read(path: &Path) -> Result<String, InputError> {
    fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })
}
