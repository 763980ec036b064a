//! System Facts - the normalized record recovered from a project upload

use serde::{Deserialize, Serialize};

use crate::version::PlatformVersion;

/// How the inspected installation is managed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallationMode {
    /// Managed through Composer (vendor-qualified package identifiers)
    #[default]
    Composer,
    /// Manual source-package installation (bare extension keys)
    Legacy,
}

impl std::fmt::Display for InstallationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstallationMode::Composer => write!(f, "composer"),
            InstallationMode::Legacy => write!(f, "legacy"),
        }
    }
}

/// Normalized description of an inspected TYPO3 installation
///
/// Produced by the extractor from one input document or archive;
/// consumed read-only by the planner and step generator. Not persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemFacts {
    /// Detected TYPO3 version, if any marker was found
    pub typo3_version: Option<PlatformVersion>,

    /// Detected PHP version or constraint
    pub php_version: Option<String>,

    /// Installation mode
    pub mode: InstallationMode,

    /// Installed extensions, in discovery order
    pub extensions: Vec<ExtensionFact>,

    /// Database facts (possibly estimated)
    pub database: DatabaseFacts,
}

/// One installed extension as recovered by the classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionFact {
    /// Canonical extension key (vendor-stripped, e.g. "news")
    pub key: String,

    /// Identifier exactly as found in the project
    pub raw_identifier: String,

    /// Best-effort version (bundled extensions inherit the platform version)
    pub version: Option<String>,

    /// Vendor segment, if the identifier carried one
    pub vendor: Option<String>,

    /// Whether this is a bundled platform component
    pub bundled: bool,

    /// Tri-state compatibility verdict for the upgrade target;
    /// `None` until a compatibility probe fills it in
    pub compatible: Option<bool>,

    /// TYPO3 compatibility constraint as found in metadata
    /// (emconf range like "11.5.0-12.4.99" or a composer constraint)
    #[serde(default)]
    pub typo3_constraint: Option<String>,

    /// Suggested replacement packages, possibly empty
    #[serde(default)]
    pub alternatives: Vec<String>,
}

/// Database facts recovered or estimated from the project
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseFacts {
    /// Database driver (e.g. "mysqli", "pdo_pgsql")
    pub driver: Option<String>,

    /// Server version string
    pub version: Option<String>,

    /// Database name
    pub name: Option<String>,

    /// Database host
    pub host: Option<String>,

    /// Table count, measured from a dump or estimated
    pub table_count: Option<u32>,

    /// True when version/table count are heuristic estimates rather
    /// than measurements
    pub estimated: bool,
}
