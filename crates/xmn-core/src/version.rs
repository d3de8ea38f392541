//! Dotted numeric version strings.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A version such as `0.91.3`, compared component by component.
///
/// When one version is a prefix of the other, the longer one is greater,
/// so `1.2 < 1.2.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    parts: Vec<u32>,
}

impl Version {
    pub fn parts(&self) -> &[u32] {
        &self.parts
    }

    /// Parse an application version string such as `"0.91.3 beta"`,
    /// ignoring everything after the first space.
    pub fn from_app_version(version: &str) -> Result<Self> {
        version
            .split(' ')
            .next()
            .unwrap_or_default()
            .parse()
    }

    /// Compare this version with a version string.
    pub fn compare_str(&self, other: &str) -> Result<Ordering> {
        Ok(self.cmp(&other.parse()?))
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts = s
            .split('.')
            .map(str::parse::<u32>)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| Error::InvalidVersion(s.to_string()))?;
        Ok(Self { parts })
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        for (i, part) in self.parts.iter().enumerate() {
            let Some(theirs) = other.parts.get(i) else {
                return Ordering::Greater;
            };
            match part.cmp(theirs) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        }
        self.parts.len().cmp(&other.parts.len())
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.parts.iter().map(u32::to_string).collect();
        f.write_str(&parts.join("."))
    }
}
