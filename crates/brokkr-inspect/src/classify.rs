//! Extension classification
//!
//! Pure and deterministic: the same raw identifier and context always
//! produce the same fact, which keeps extraction fixtures reproducible.

use brokkr_core::types::ExtensionFact;
use brokkr_core::PlatformVersion;

/// Reserved vendor name of the platform itself
pub const PLATFORM_VENDOR: &str = "typo3";

/// Extension keys that ship as bundled platform components
pub const CORE_EXTENSION_KEYS: &[&str] = &[
    "adminpanel",
    "backend",
    "belog",
    "beuser",
    "core",
    "dashboard",
    "extbase",
    "extensionmanager",
    "felogin",
    "filelist",
    "fluid",
    "fluid_styled_content",
    "form",
    "frontend",
    "impexp",
    "indexed_search",
    "info",
    "install",
    "linkvalidator",
    "lowlevel",
    "opendocs",
    "recordlist",
    "recycler",
    "redirects",
    "reports",
    "rte_ckeditor",
    "scheduler",
    "seo",
    "setup",
    "sys_note",
    "t3editor",
    "tstemplate",
    "viewpage",
    "workspaces",
];

/// Replacement suggestions for extensions known to be abandoned or
/// superseded
const ALTERNATIVE_PACKAGES: &[(&str, &[&str])] = &[
    ("rtehtmlarea", &["typo3/cms-rte-ckeditor"]),
    ("gridelements", &["b13/container"]),
    ("templavoila", &["b13/container"]),
];

/// Context available to the classifier for one identifier
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassifyContext<'a> {
    /// Detected platform version; bundled extensions inherit it
    pub platform_version: Option<&'a PlatformVersion>,

    /// Version supplied by a metadata file (emconf, composer constraint)
    pub metadata_version: Option<&'a str>,

    /// TYPO3 compatibility constraint from metadata, if any
    pub typo3_constraint: Option<&'a str>,
}

/// Classify a raw extension identifier into an `ExtensionFact`
pub fn classify(raw: &str, ctx: &ClassifyContext) -> ExtensionFact {
    let (vendor, name) = split_vendor(raw);
    let key = canonical_key(vendor.as_deref(), &name);

    let bundled = match vendor.as_deref() {
        Some(v) => v == PLATFORM_VENDOR,
        None => CORE_EXTENSION_KEYS.contains(&key.as_str()),
    };

    let version = if bundled {
        ctx.platform_version
            .map(|v| v.to_string())
            .or_else(|| ctx.metadata_version.map(String::from))
    } else {
        Some(
            ctx.metadata_version
                .map(String::from)
                .unwrap_or_else(|| "1.0.0".to_string()),
        )
    };

    let alternatives = ALTERNATIVE_PACKAGES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, packages)| packages.iter().map(|p| (*p).to_string()).collect())
        .unwrap_or_default();

    ExtensionFact {
        key,
        raw_identifier: raw.to_string(),
        version,
        vendor,
        bundled,
        compatible: None,
        typo3_constraint: ctx.typo3_constraint.map(String::from),
        alternatives,
    }
}

/// Split an identifier into optional vendor and name segments
fn split_vendor(raw: &str) -> (Option<String>, String) {
    match raw.split_once('/') {
        Some((vendor, name)) if !vendor.is_empty() => {
            (Some(vendor.to_string()), name.to_string())
        }
        _ => (None, raw.to_string()),
    }
}

/// Canonical extension key: `cms-` dropped under the platform vendor,
/// common `ext-`/`typo3-` infixes stripped, dashes folded to underscores
pub fn canonical_key(vendor: Option<&str>, name: &str) -> String {
    let mut key = name.to_ascii_lowercase();
    if vendor == Some(PLATFORM_VENDOR) {
        key = key
            .strip_prefix("cms-")
            .map(String::from)
            .unwrap_or(key);
    }
    key = key.strip_prefix("typo3-").map(String::from).unwrap_or(key);
    key = key.strip_prefix("ext-").map(String::from).unwrap_or(key);
    key.replace('-', "_")
}
