//! Composer manifest extraction
//!
//! A project carrying a `composer.json` is a composer-managed
//! installation: platform and PHP versions come out of the manifest's
//! constraint strings, `typo3/cms-*` packages are bundled components,
//! and every other vendor-qualified require is a third-party extension.

use std::sync::OnceLock;

use brokkr_core::types::{InstallationMode, SystemFacts};
use brokkr_core::PlatformVersion;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::classify::{classify, ClassifyContext};
use crate::source::ProjectSource;

/// Require keys that pin the platform version
const PLATFORM_PACKAGES: &[&str] = &["typo3/cms-core", "typo3/cms"];

#[derive(Debug, Deserialize)]
struct ComposerManifest {
    #[serde(default)]
    require: std::collections::BTreeMap<String, String>,
}

/// Locate the project manifest: exact name first, then suffix match.
/// Vendored manifests never count; the shortest remaining path wins.
pub fn find_manifest(source: &dyn ProjectSource) -> Option<String> {
    let entries = source.entries();
    if entries.iter().any(|e| e == "composer.json") {
        return Some("composer.json".to_string());
    }
    entries
        .into_iter()
        .filter(|e| e.ends_with("/composer.json") && !is_vendored(e))
        .min_by_key(|e| e.len())
}

/// A manifest is vendored when a `vendor` path segment contains it
fn is_vendored(entry: &str) -> bool {
    entry.split('/').any(|segment| segment == "vendor")
}

/// Extract system facts from a manifest entry
///
/// Returns `None` when the entry is missing or not valid JSON, letting
/// the caller fall back to the legacy configuration scan.
pub fn extract_from_manifest(source: &dyn ProjectSource, path: &str) -> Option<SystemFacts> {
    let text = source.read_text(path)?;
    let manifest: ComposerManifest = match serde_json::from_str(&text) {
        Ok(m) => m,
        Err(e) => {
            debug!("Manifest {} unparseable: {}", path, e);
            return None;
        }
    };

    let typo3_version = PLATFORM_PACKAGES
        .iter()
        .find_map(|key| manifest.require.get(*key))
        .and_then(|constraint| capture_minor_version(constraint));

    let php_version = manifest
        .require
        .get("php")
        .map(|constraint| clean_constraint(constraint));

    let mut extensions = Vec::new();
    for (name, constraint) in &manifest.require {
        if !name.contains('/') {
            // php, ext-intl and friends are runtime requirements
            continue;
        }
        let metadata_version = capture_minor_version(constraint).map(|v| v.to_string());
        let ctx = ClassifyContext {
            platform_version: typo3_version.as_ref(),
            metadata_version: metadata_version.as_deref(),
            typo3_constraint: None,
        };
        extensions.push(classify(name, &ctx));
    }

    Some(SystemFacts {
        typo3_version,
        php_version,
        mode: InstallationMode::Composer,
        extensions,
        database: Default::default(),
    })
}

/// Capture `major.minor` out of a composer constraint, stripping
/// leading `^`/`~`/`v` and comparison operators
pub fn capture_minor_version(constraint: &str) -> Option<PlatformVersion> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN
        .get_or_init(|| Regex::new(r"[\^~>=<\s]*v?(\d+)\.(\d+)").expect("valid regex"));

    let caps = pattern.captures(constraint)?;
    let major = caps.get(1)?.as_str().parse().ok()?;
    let minor = caps.get(2)?.as_str().parse().ok()?;
    Some(PlatformVersion::new(major, minor))
}

/// Strip constraint decoration for display (`^8.1` -> `8.1`)
fn clean_constraint(constraint: &str) -> String {
    constraint
        .trim()
        .trim_start_matches(['^', '~', 'v', '>', '=', '<'])
        .trim()
        .to_string()
}
