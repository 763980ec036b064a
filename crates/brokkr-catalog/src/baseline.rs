//! Bundled baseline release catalog
//!
//! The baseline is embedded at build time so planning works without
//! network access; an upstream refresh can replace it at runtime.

use brokkr_core::types::Release;
use brokkr_core::{Error, Result};
use rust_embed::RustEmbed;

/// Embedded catalog files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../embedded/catalog/"]
#[prefix = ""]
struct EmbeddedCatalog;

/// Load the bundled baseline releases
pub fn baseline_releases() -> Result<Vec<Release>> {
    let file = EmbeddedCatalog::get("releases.json")
        .ok_or_else(|| Error::extraction_failed("embedded baseline catalog missing"))?;
    let releases: Vec<Release> = serde_json::from_slice(&file.data)?;
    Ok(releases)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_loads() {
        let releases = baseline_releases().unwrap();
        assert!(releases.len() >= 7);
    }

    #[test]
    fn test_baseline_contains_known_lts_lines() {
        let releases = baseline_releases().unwrap();
        for line in [(10, 4), (11, 5), (12, 4), (13, 4)] {
            assert!(
                releases
                    .iter()
                    .any(|r| r.version.minor_key() == line && r.is_lts()),
                "missing LTS {line:?}"
            );
        }
    }
}
