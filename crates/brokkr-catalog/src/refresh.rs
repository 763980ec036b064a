//! Upstream catalog refresh
//!
//! Fetches the release table from a get.typo3.org-style endpoint: a
//! keyed table of major versions, each holding a table of minor/patch
//! records. Any failure - network, parse, empty result - keeps the
//! current catalog unchanged and is never surfaced to the caller.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{anyhow, Result};
use brokkr_core::types::{Release, ReleaseType};
use brokkr_core::PlatformVersion;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::catalog::{is_known_lts_line, ReleaseCatalog};

/// Default upstream endpoint
pub const DEFAULT_CATALOG_URL: &str = "https://get.typo3.org/api/v1/majors.json";

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// One upstream release record; every field beyond the version may be missing
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamRecord {
    /// Version string (falls back to the table key when absent)
    #[serde(default)]
    pub version: Option<String>,

    /// Explicit release type, takes precedence over LTS inference
    #[serde(default, rename = "type")]
    pub release_type: Option<String>,

    /// Explicit LTS flag
    #[serde(default)]
    pub lts: Option<bool>,

    /// Release date
    #[serde(default)]
    pub date: Option<NaiveDate>,

    /// End of active support
    #[serde(default)]
    pub active_until: Option<NaiveDate>,

    /// End of security support
    #[serde(default)]
    pub security_until: Option<NaiveDate>,

    /// PHP requirement range
    #[serde(default)]
    pub php: Option<String>,

    /// Database requirement description
    #[serde(default)]
    pub database: Option<String>,

    /// Minimum Composer version
    #[serde(default)]
    pub composer: Option<String>,

    /// Whether landing on this release requires a schema update
    #[serde(default)]
    pub schema_change: Option<bool>,

    /// Whether landing on this release requires upgrade wizards
    #[serde(default)]
    pub upgrade_wizard: Option<bool>,
}

/// Upstream payload: major version -> (minor/patch key -> record)
pub type UpstreamTable = HashMap<String, HashMap<String, UpstreamRecord>>;

/// Client for the upstream release-metadata service
pub struct CatalogRefresher {
    client: reqwest::Client,
    url: String,
}

impl CatalogRefresher {
    /// Create a refresher for the default endpoint
    pub fn new() -> Self {
        Self::with_url(DEFAULT_CATALOG_URL)
    }

    /// Create a refresher for a custom endpoint
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(FETCH_TIMEOUT)
                .build()
                .unwrap_or_default(),
            url: url.into(),
        }
    }

    /// Refresh the catalog in place, keeping it unchanged on any failure
    pub async fn refresh(&self, catalog: &ReleaseCatalog) {
        match self.fetch_releases().await {
            Ok(releases) if !releases.is_empty() => {
                info!("Refreshed release catalog: {} records", releases.len());
                catalog.replace(releases);
            }
            Ok(_) => {
                warn!("Upstream catalog was empty; keeping current catalog");
            }
            Err(e) => {
                warn!("Catalog refresh failed: {}. Keeping current catalog", e);
            }
        }
    }

    /// Fetch and convert the upstream table
    async fn fetch_releases(&self) -> Result<Vec<Release>> {
        debug!("Fetching release catalog from: {}", self.url);

        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!("Failed to fetch catalog: {}", response.status()));
        }

        let table: UpstreamTable = response.json().await?;
        Ok(convert_upstream(table))
    }
}

impl Default for CatalogRefresher {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert the upstream table to releases, skipping unparseable records
pub fn convert_upstream(table: UpstreamTable) -> Vec<Release> {
    let mut releases = Vec::new();
    for minors in table.into_values() {
        for (key, record) in minors {
            match convert_record(&key, record) {
                Some(release) => releases.push(release),
                None => debug!("Skipping unparseable upstream record: {}", key),
            }
        }
    }
    releases
}

fn convert_record(key: &str, record: UpstreamRecord) -> Option<Release> {
    let version: PlatformVersion = record
        .version
        .as_deref()
        .unwrap_or(key)
        .parse()
        .ok()?;

    let release_type = resolve_release_type(&version, &record);

    Some(Release {
        release_type,
        release_date: record.date,
        active_support_until: record.active_until,
        security_support_until: record.security_until,
        php_range: record.php,
        database_requirement: record.database,
        composer_min_version: record.composer,
        needs_schema_change: record.schema_change.unwrap_or(false),
        needs_upgrade_wizard: record.upgrade_wizard.unwrap_or(false),
        version,
    })
}

/// Decide the release type: an explicit record field wins, then the
/// explicit LTS flag, then the fixed table of historically-known LTS
/// minor lines.
fn resolve_release_type(version: &PlatformVersion, record: &UpstreamRecord) -> ReleaseType {
    if let Some(explicit) = record.release_type.as_deref() {
        match explicit {
            "lts" => return ReleaseType::Lts,
            "sts" => return ReleaseType::Sts,
            "dev" => return ReleaseType::Dev,
            "regular" => return ReleaseType::Regular,
            other => debug!("Unknown upstream release type '{}'", other),
        }
    }
    match record.lts {
        Some(true) => ReleaseType::Lts,
        Some(false) => ReleaseType::Regular,
        None if is_known_lts_line(version.major, version.minor) => ReleaseType::Lts,
        None => ReleaseType::Regular,
    }
}
