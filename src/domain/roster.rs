use std::{cmp::Ordering, fmt, str::FromStr};

/// The academic season a roster covers.
///
/// Seasons are declared in calendar order, so the derived ordering places
/// winter before spring before summer before fall within a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Season {
    /// Winter session (`WI`).
    Winter,
    /// Spring semester (`SP`).
    Spring,
    /// Summer session (`SU`).
    Summer,
    /// Fall semester (`FA`).
    Fall,
}

impl Season {
    const fn code(self) -> &'static str {
        match self {
            Self::Winter => "WI",
            Self::Spring => "SP",
            Self::Summer => "SU",
            Self::Fall => "FA",
        }
    }
}

/// A term identifier selecting one catalog snapshot, e.g. `FA25` or `SP24`.
///
/// Rosters compare chronologically: by year, then by season. The catalog
/// uses this order to decide which response schema a roster is served with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Roster {
    season: Season,
    year: u8,
}

impl Roster {
    /// Returns the season of this roster.
    #[must_use]
    pub const fn season(&self) -> Season {
        self.season
    }

    /// Returns the two-digit year of this roster.
    #[must_use]
    pub const fn year(&self) -> u8 {
        self.year
    }
}

impl Ord for Roster {
    fn cmp(&self, other: &Self) -> Ordering {
        self.year
            .cmp(&other.year)
            .then_with(|| self.season.cmp(&other.season))
    }
}

impl PartialOrd for Roster {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Roster {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{:02}", self.season.code(), self.year)
    }
}

/// Error returned when a string is not a valid roster term.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid roster '{0}': expected a season (WI, SP, SU, FA) followed by a two-digit year, e.g. 'FA25'")]
pub struct Error(String);

impl FromStr for Roster {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        if upper.len() != 4 || !upper.is_ascii() {
            return Err(Error(s.to_string()));
        }
        let (season, year) = upper.split_at(2);
        let season = match season {
            "WI" => Season::Winter,
            "SP" => Season::Spring,
            "SU" => Season::Summer,
            "FA" => Season::Fall,
            _ => return Err(Error(s.to_string())),
        };
        if !year.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error(s.to_string()));
        }
        let year = year.parse().map_err(|_| Error(s.to_string()))?;
        Ok(Self { season, year })
    }
}

impl TryFrom<&str> for Roster {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_str(value)
    }
}

impl serde::Serialize for Roster {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Roster {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn roster(s: &str) -> Roster {
        s.parse().unwrap()
    }

    #[test_case("FA25", Season::Fall, 25; "fall")]
    #[test_case("sp24", Season::Spring, 24; "lowercase")]
    #[test_case("WI07", Season::Winter, 7; "leading zero year")]
    #[test_case(" SU19 ", Season::Summer, 19; "surrounding whitespace")]
    fn parse_valid(input: &str, season: Season, year: u8) {
        let roster = roster(input);
        assert_eq!(roster.season(), season);
        assert_eq!(roster.year(), year);
    }

    #[test_case(""; "empty")]
    #[test_case("FA"; "missing year")]
    #[test_case("FA2025"; "four digit year")]
    #[test_case("AU25"; "unknown season")]
    #[test_case("FA2x"; "non numeric year")]
    fn parse_invalid(input: &str) {
        assert!(input.parse::<Roster>().is_err());
    }

    #[test]
    fn display_round_trips_canonical_form() {
        assert_eq!(roster("wi07").to_string(), "WI07");
        assert_eq!(roster("FA25").to_string(), "FA25");
    }

    #[test]
    fn orders_by_year_then_season() {
        assert!(roster("SP25") < roster("SU25"));
        assert!(roster("SU25") < roster("FA25"));
        assert!(roster("FA24") < roster("WI25"));
        assert!(roster("WI26") > roster("FA25"));
        assert_eq!(roster("fa25").cmp(&roster("FA25")), Ordering::Equal);
    }
}
