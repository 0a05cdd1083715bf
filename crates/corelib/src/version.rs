//! Semantic version of the producing tool
//!
//! Accepts the semver.org 2.0 grammar: numeric `major.minor.patch` without
//! leading zeros, optionally followed by `-pre.release` and `+build` parts.

use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

static SEMVER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(?:-((?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*)(?:\.(?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*))*))?(?:\+([0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*))?$",
    )
    .expect("semver pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre_release: Option<String>,
    pub build: Option<String>,
}

impl SemanticVersion {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            pre_release: None,
            build: None,
        }
    }

    /// Checks the syntax without keeping the parsed value
    pub fn is_valid(version: &str) -> bool {
        version.parse::<SemanticVersion>().is_ok()
    }
}

impl FromStr for SemanticVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("Invalid semantic version: {}", s);
        let caps = SEMVER.captures(s).ok_or_else(invalid)?;

        // Numeric identifiers can overflow u64 even when syntactically valid.
        let number = |i: usize| -> Result<u64, String> {
            caps.get(i)
                .ok_or_else(invalid)?
                .as_str()
                .parse()
                .map_err(|_| invalid())
        };

        Ok(SemanticVersion {
            major: number(1)?,
            minor: number(2)?,
            patch: number(3)?,
            pre_release: caps.get(4).map(|m| m.as_str().to_string()),
            build: caps.get(5).map(|m| m.as_str().to_string()),
        })
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre_release {
            write!(f, "-{}", pre)?;
        }
        if let Some(build) = &self.build {
            write!(f, "+{}", build)?;
        }
        Ok(())
    }
}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Pre-release and build metadata do not take part in ordering.
impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.major.cmp(&other.major) {
            Ordering::Equal => match self.minor.cmp(&other.minor) {
                Ordering::Equal => self.patch.cmp(&other.patch),
                other => other,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_release() {
        let version: SemanticVersion = "2022.1.0".parse().unwrap();
        assert_eq!(version, SemanticVersion::new(2022, 1, 0));
        assert_eq!(version.to_string(), "2022.1.0");
    }

    #[test]
    fn test_parse_pre_release_and_build() {
        let version: SemanticVersion = "2023.2.1-rc.1+20230401".parse().unwrap();
        assert_eq!(version.pre_release.as_deref(), Some("rc.1"));
        assert_eq!(version.build.as_deref(), Some("20230401"));
        assert_eq!(version.to_string(), "2023.2.1-rc.1+20230401");
    }

    #[test]
    fn test_rejects_invalid() {
        for bad in [
            "bad sem version",
            "",
            "2022.1",
            "2022.01.0",
            "v2022.1.0",
            "2022.1.0-",
            "2022.1.0 ",
            "99999999999999999999.0.0",
        ] {
            assert!(!SemanticVersion::is_valid(bad), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_ordering() {
        let older: SemanticVersion = "2021.2.0".parse().unwrap();
        let newer: SemanticVersion = "2022.1.0".parse().unwrap();
        assert!(older < newer);
    }
}
