//! Release catalog types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::version::PlatformVersion;

/// TYPO3 release type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseType {
    /// Long-term support release (preferred upgrade waypoint)
    Lts,
    /// Short-term support release
    Sts,
    /// Regular release
    #[default]
    Regular,
    /// Development / pre-release
    Dev,
}

/// One known TYPO3 release with its static metadata
///
/// Exactly one canonical `Release` exists per `major.minor` line in a
/// loaded catalog (highest patch wins). Immutable within a session;
/// replaced wholesale on a catalog refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    /// Release version
    pub version: PlatformVersion,

    /// Release type
    #[serde(default, rename = "type")]
    pub release_type: ReleaseType,

    /// Initial release date
    #[serde(default)]
    pub release_date: Option<NaiveDate>,

    /// End of active (feature/bugfix) support
    #[serde(default)]
    pub active_support_until: Option<NaiveDate>,

    /// End of security support
    #[serde(default)]
    pub security_support_until: Option<NaiveDate>,

    /// PHP requirement range as a composer constraint (e.g. "^8.1")
    #[serde(default)]
    pub php_range: Option<String>,

    /// Database requirement description
    #[serde(default)]
    pub database_requirement: Option<String>,

    /// Minimum Composer version needed to manage this release
    #[serde(default)]
    pub composer_min_version: Option<String>,

    /// Whether hopping onto this release requires a schema update
    #[serde(default)]
    pub needs_schema_change: bool,

    /// Whether hopping onto this release requires running upgrade wizards
    #[serde(default)]
    pub needs_upgrade_wizard: bool,
}

impl Release {
    /// Whether this is a long-term support release
    pub fn is_lts(&self) -> bool {
        self.release_type == ReleaseType::Lts
    }

    /// Whether this is a development / pre-release
    pub fn is_dev(&self) -> bool {
        self.release_type == ReleaseType::Dev
    }

    /// Whether the release still receives security fixes at `today`
    pub fn is_security_supported(&self, today: NaiveDate) -> bool {
        match self.security_support_until {
            Some(until) => today <= until,
            None => true,
        }
    }
}
