//! TYPO3 platform version parsing and ordering
//!
//! TYPO3 versions (`12.4`, `13.4.2`) are not valid semver - the patch
//! segment is optional and minor lines like `10.4` are identities of
//! their own. `PlatformVersion` gives them a total (major, minor,
//! patch) ordering and a stable `major.minor` key for catalog lookups.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// A TYPO3 release version: `major.minor` with an optional patch
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlatformVersion {
    /// Major version (breaking-change axis)
    pub major: u32,

    /// Minor version
    pub minor: u32,

    /// Patch level, absent for minor-line identifiers like `12.4`
    pub patch: Option<u32>,
}

impl PlatformVersion {
    /// Create a minor-line version without a patch level
    pub fn new(major: u32, minor: u32) -> Self {
        Self {
            major,
            minor,
            patch: None,
        }
    }

    /// Create a fully qualified version
    pub fn with_patch(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch: Some(patch),
        }
    }

    /// The `(major, minor)` identity of this version's minor line
    pub fn minor_key(&self) -> (u32, u32) {
        (self.major, self.minor)
    }

    /// Display form of the minor line (`12.4`), patch dropped
    pub fn minor_line(&self) -> String {
        format!("{}.{}", self.major, self.minor)
    }

    /// Whether both versions sit on the same `major.minor` line
    pub fn same_minor_line(&self, other: &PlatformVersion) -> bool {
        self.minor_key() == other.minor_key()
    }

    /// Major-version distance to `other`, saturating at zero for downgrades
    pub fn major_delta(&self, other: &PlatformVersion) -> u32 {
        other.major.saturating_sub(self.major)
    }
}

impl Ord for PlatformVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch.unwrap_or(0)).cmp(&(
            other.major,
            other.minor,
            other.patch.unwrap_or(0),
        ))
    }
}

impl PartialOrd for PlatformVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PlatformVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.patch {
            Some(patch) => write!(f, "{}.{}.{}", self.major, self.minor, patch),
            None => write!(f, "{}.{}", self.major, self.minor),
        }
    }
}

impl FromStr for PlatformVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('v');
        let mut parts = trimmed.split('.');

        let major = parts
            .next()
            .and_then(|p| p.parse::<u32>().ok())
            .ok_or_else(|| Error::invalid_version(s))?;
        let minor = parts
            .next()
            .and_then(|p| p.parse::<u32>().ok())
            .ok_or_else(|| Error::invalid_version(s))?;
        let patch = match parts.next() {
            Some(p) => Some(p.parse::<u32>().map_err(|_| Error::invalid_version(s))?),
            None => None,
        };

        if parts.next().is_some() {
            return Err(Error::invalid_version(s));
        }

        Ok(Self {
            major,
            minor,
            patch,
        })
    }
}

impl Serialize for PlatformVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PlatformVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
