use std::{io, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use super::{AllowList, CourseCode, Roster};

/// Configuration for catalog access and prerequisite resolution.
///
/// This struct holds settings that control where the catalog is queried,
/// which schema field a roster is read from, how requests are paced, and the
/// defaults used when a caller doesn't supply a roster or depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Base URL of the course catalog API.
    pub api_base: String,

    /// The first roster served with the current schema.
    ///
    /// Rosters at or after this term read prerequisites from
    /// `current_field`; earlier rosters read `legacy_field`.
    pub cutover_roster: Roster,

    /// Prerequisite field name for rosters at or after the cutover.
    pub current_field: String,

    /// Prerequisite field name for rosters before the cutover.
    pub legacy_field: String,

    /// Minimum spacing between consecutive catalog requests.
    request_interval_ms: u64,

    /// Transport timeout for a single catalog request.
    timeout_secs: u64,

    /// Roster queried when none is given.
    pub default_roster: Roster,

    /// Maximum prerequisite depth explored when none is given.
    pub max_depth: usize,

    /// Approved courses.
    ///
    /// If this is empty, the built-in list is used.
    approved_courses: Vec<CourseCode>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            cutover_roster: default_roster(),
            current_field: default_current_field(),
            legacy_field: default_legacy_field(),
            request_interval_ms: default_request_interval_ms(),
            timeout_secs: default_timeout_secs(),
            default_roster: default_roster(),
            max_depth: default_max_depth(),
            approved_courses: Vec::new(),
        }
    }
}

/// Errors that can occur when loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config file: {0}")]
    Io(#[from] io::Error),

    /// The file is not valid configuration TOML.
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Returns the minimum spacing between catalog requests.
    #[must_use]
    pub const fn request_interval(&self) -> Duration {
        Duration::from_millis(self.request_interval_ms)
    }

    /// Returns the transport timeout for a single catalog request.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns the configured allow-list, falling back to the built-in list
    /// when none is configured.
    #[must_use]
    pub fn allow_list(&self) -> AllowList {
        if self.approved_courses.is_empty() {
            AllowList::builtin()
        } else {
            self.approved_courses.iter().cloned().collect()
        }
    }

    /// Returns the name of the prerequisite field used for the given roster.
    #[must_use]
    pub fn prerequisite_field(&self, roster: &Roster) -> &str {
        if *roster >= self.cutover_roster {
            &self.current_field
        } else {
            &self.legacy_field
        }
    }
}

fn default_api_base() -> String {
    "https://classes.cornell.edu/api/2.0".to_string()
}

fn default_roster() -> Roster {
    Roster::try_from("FA25").expect("default roster is valid")
}

fn default_current_field() -> String {
    "catalogPrereq".to_string()
}

fn default_legacy_field() -> String {
    "catalogPrereqCoreq".to_string()
}

const fn default_request_interval_ms() -> u64 {
    1000
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_max_depth() -> usize {
    5
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_api_base")]
        api_base: String,

        #[serde(default = "default_roster")]
        cutover_roster: Roster,

        #[serde(default = "default_current_field")]
        current_field: String,

        #[serde(default = "default_legacy_field")]
        legacy_field: String,

        #[serde(default = "default_request_interval_ms")]
        request_interval_ms: u64,

        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,

        #[serde(default = "default_roster")]
        default_roster: Roster,

        #[serde(default = "default_max_depth")]
        max_depth: usize,

        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        approved_courses: Vec<CourseCode>,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                api_base,
                cutover_roster,
                current_field,
                legacy_field,
                request_interval_ms,
                timeout_secs,
                default_roster,
                max_depth,
                approved_courses,
            } => Self {
                api_base,
                cutover_roster,
                current_field,
                legacy_field,
                request_interval_ms,
                timeout_secs,
                default_roster,
                max_depth,
                approved_courses,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            api_base: config.api_base,
            cutover_roster: config.cutover_roster,
            current_field: config.current_field,
            legacy_field: config.legacy_field,
            request_interval_ms: config.request_interval_ms,
            timeout_secs: config.timeout_secs,
            default_roster: config.default_roster,
            max_depth: config.max_depth,
            approved_courses: config.approved_courses,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\ncutover_roster = \"SP26\"\nrequest_interval_ms = 250\nmax_depth = 3\napproved_courses = [\"cs 2800\", \"MATH 2210\"]\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.cutover_roster.to_string(), "SP26");
        assert_eq!(config.request_interval(), Duration::from_millis(250));
        assert_eq!(config.max_depth, 3);
        let allow_list = config.allow_list();
        assert_eq!(allow_list.len(), 2);
        assert!(allow_list.contains(&"CS 2800".parse().unwrap()));
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(matches!(error, ConfigError::Io(_)));
        assert!(error.to_string().starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nmax_depth = \"five\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(matches!(error, ConfigError::Parse(_)));
    }

    #[test]
    fn invalid_course_in_allow_list_is_rejected() {
        let result: Result<Config, _> =
            toml::from_str("_version = \"1\"\napproved_courses = [\"not a course\"]\n");
        assert!(result.is_err());
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn empty_allow_list_falls_back_to_builtin() {
        assert_eq!(Config::default().allow_list(), AllowList::builtin());
    }

    #[test]
    fn prerequisite_field_switches_at_cutover() {
        let config = Config::default();
        let before: Roster = "SP25".parse().unwrap();
        let at: Roster = "FA25".parse().unwrap();
        let after: Roster = "SP26".parse().unwrap();

        assert_eq!(config.prerequisite_field(&before), "catalogPrereqCoreq");
        assert_eq!(config.prerequisite_field(&at), "catalogPrereq");
        assert_eq!(config.prerequisite_field(&after), "catalogPrereq");
    }
}
