//! In-memory release catalog
//!
//! Process-wide, read-mostly state. The only write path is a refresh,
//! which assembles the new table fully before swapping it in under the
//! write lock, so concurrent planning calls never observe a
//! half-updated catalog.

use std::collections::BTreeMap;
use std::sync::Arc;

use brokkr_core::types::Release;
use brokkr_core::{PlatformVersion, Result};
use parking_lot::RwLock;
use tracing::debug;

use crate::baseline::baseline_releases;

/// Minor versions that were historically designated LTS, per major.
/// Used when an upstream record carries no explicit LTS flag.
pub const KNOWN_LTS_MINORS: &[(u32, u32)] = &[
    (6, 2),
    (7, 6),
    (8, 7),
    (9, 5),
    (10, 4),
    (11, 5),
    (12, 4),
    (13, 4),
];

/// Whether a `major.minor` line is a historically-known LTS line
pub fn is_known_lts_line(major: u32, minor: u32) -> bool {
    KNOWN_LTS_MINORS.contains(&(major, minor))
}

/// The in-memory table of known TYPO3 releases
pub struct ReleaseCatalog {
    releases: RwLock<Arc<Vec<Release>>>,
}

impl ReleaseCatalog {
    /// Create a catalog from an explicit release list (deduplicated)
    pub fn new(releases: Vec<Release>) -> Self {
        Self {
            releases: RwLock::new(Arc::new(dedup_releases(releases))),
        }
    }

    /// Create a catalog seeded from the bundled baseline
    pub fn baseline() -> Result<Self> {
        Ok(Self::new(baseline_releases()?))
    }

    /// All canonical releases, ascending by version
    ///
    /// Returns a snapshot; a concurrent refresh does not affect it.
    pub fn get_all(&self) -> Arc<Vec<Release>> {
        Arc::clone(&self.releases.read())
    }

    /// Look up the canonical release for a version's `major.minor` line
    pub fn get(&self, version: &PlatformVersion) -> Option<Release> {
        self.releases
            .read()
            .iter()
            .find(|r| r.version.minor_key() == version.minor_key())
            .cloned()
    }

    /// All LTS releases, ascending
    pub fn lts_releases(&self) -> Vec<Release> {
        self.releases
            .read()
            .iter()
            .filter(|r| r.is_lts())
            .cloned()
            .collect()
    }

    /// Replace the whole table atomically
    ///
    /// The replacement is deduplicated before the swap; readers holding
    /// an older snapshot keep it until they re-read.
    pub fn replace(&self, releases: Vec<Release>) {
        let table = Arc::new(dedup_releases(releases));
        debug!("Catalog replaced: {} canonical releases", table.len());
        *self.releases.write() = table;
    }
}

/// Collapse a release list to one canonical release per `major.minor`
///
/// The highest patch per minor line wins. Development releases are
/// excluded from deduplication entirely: they pass through as-is so a
/// caller asking for dev lines still sees them.
pub fn dedup_releases(releases: Vec<Release>) -> Vec<Release> {
    let mut canonical: BTreeMap<(u32, u32), Release> = BTreeMap::new();
    let mut dev: Vec<Release> = Vec::new();

    for release in releases {
        if release.is_dev() {
            dev.push(release);
            continue;
        }
        let key = release.version.minor_key();
        match canonical.get(&key) {
            Some(existing) if existing.version >= release.version => {}
            _ => {
                canonical.insert(key, release);
            }
        }
    }

    let mut result: Vec<Release> = canonical.into_values().collect();
    result.extend(dev);
    result.sort_by(|a, b| a.version.cmp(&b.version));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use brokkr_core::types::ReleaseType;

    fn release(version: &str, release_type: ReleaseType) -> Release {
        Release {
            version: version.parse().unwrap(),
            release_type,
            release_date: None,
            active_support_until: None,
            security_support_until: None,
            php_range: None,
            database_requirement: None,
            composer_min_version: None,
            needs_schema_change: true,
            needs_upgrade_wizard: true,
        }
    }

    #[test]
    fn test_dedup_keeps_highest_patch() {
        let catalog = ReleaseCatalog::new(vec![
            release("12.4.2", ReleaseType::Lts),
            release("12.4.31", ReleaseType::Lts),
            release("12.4.10", ReleaseType::Lts),
        ]);

        let all = catalog.get_all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].version.to_string(), "12.4.31");
    }

    #[test]
    fn test_dev_releases_skip_dedup() {
        let catalog = ReleaseCatalog::new(vec![
            release("14.0.0", ReleaseType::Dev),
            release("14.0.1", ReleaseType::Dev),
        ]);

        // Both dev identifiers survive
        assert_eq!(catalog.get_all().len(), 2);
    }

    #[test]
    fn test_get_matches_minor_line() {
        let catalog = ReleaseCatalog::new(vec![release("11.5.41", ReleaseType::Lts)]);

        let hit = catalog.get(&"11.5".parse().unwrap());
        assert!(hit.is_some());
        assert_eq!(hit.unwrap().version.to_string(), "11.5.41");

        assert!(catalog.get(&"11.4".parse().unwrap()).is_none());
    }

    #[test]
    fn test_replace_swaps_whole_table() {
        let catalog = ReleaseCatalog::new(vec![release("10.4.37", ReleaseType::Lts)]);
        let before = catalog.get_all();

        catalog.replace(vec![
            release("11.5.41", ReleaseType::Lts),
            release("12.4.31", ReleaseType::Lts),
        ]);

        // Old snapshot untouched, new reads see the replacement
        assert_eq!(before.len(), 1);
        assert_eq!(catalog.get_all().len(), 2);
        assert!(catalog.get(&"10.4".parse().unwrap()).is_none());
    }

    #[test]
    fn test_baseline_catalog_sorted_ascending() {
        let catalog = ReleaseCatalog::baseline().unwrap();
        let all = catalog.get_all();
        for pair in all.windows(2) {
            assert!(pair[0].version < pair[1].version);
        }
    }

    #[test]
    fn test_known_lts_lines() {
        assert!(is_known_lts_line(11, 5));
        assert!(!is_known_lts_line(11, 4));
        assert!(!is_known_lts_line(13, 0));
    }
}
