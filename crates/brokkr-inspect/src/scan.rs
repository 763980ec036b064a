//! Legacy installation scanning
//!
//! When a project carries no composer manifest, the version is
//! recovered from well-known source files (fixed priority order, first
//! file with a match wins) and extensions are enumerated from
//! conventional folder layouts.

use std::sync::OnceLock;

use brokkr_core::types::ExtensionFact;
use brokkr_core::PlatformVersion;
use regex::Regex;
use tracing::debug;

use crate::classify::{classify, ClassifyContext};
use crate::source::ProjectSource;

/// Version-marker files in priority order, each with its capture pattern
const VERSION_MARKERS: &[(&str, &str)] = &[
    (
        "typo3/sysext/core/Classes/Information/Typo3Version.php",
        r"VERSION\s*=\s*'(\d+\.\d+(?:\.\d+)?)'",
    ),
    (
        "typo3_src/typo3/sysext/core/Classes/Information/Typo3Version.php",
        r"VERSION\s*=\s*'(\d+\.\d+(?:\.\d+)?)'",
    ),
    (
        "typo3/sysext/core/Classes/Core/SystemEnvironmentBuilder.php",
        r"TYPO3_version',\s*'(\d+\.\d+(?:\.\d+)?)'",
    ),
    (
        "typo3conf/LocalConfiguration.php",
        r"'compat_version'\s*=>\s*'(\d+\.\d+)'",
    ),
    (
        "config/system/settings.php",
        r"'compat_version'\s*=>\s*'(\d+\.\d+)'",
    ),
    ("ChangeLog", r"TYPO3\s+(\d+\.\d+(?:\.\d+)?)"),
];

/// Vendors whose `vendor/<vendor>/<key>` folders are scanned for extensions
const KNOWN_VENDORS: &[&str] = &[
    "georgringer",
    "in2code",
    "b13",
    "helhum",
    "friendsoftypo3",
    "fluidtypo3",
    "dmitryd",
    "lochmueller",
    "clickstorm",
    "netresearch",
    "sitegeist",
    "bk2k",
    "mask",
    "tpwd",
    "sjbr",
];

/// Extension-folder path prefixes, unqualified
const EXTENSION_ROOTS: &[&str] = &["typo3conf/ext/", "typo3/ext/", "packages/"];

/// Recover the platform version from legacy source markers
pub fn scan_platform_version(source: &dyn ProjectSource) -> Option<PlatformVersion> {
    for (path, pattern) in VERSION_MARKERS {
        let Some(text) = source.read_text(path) else {
            continue;
        };
        let regex = Regex::new(pattern).expect("valid marker regex");
        if let Some(caps) = regex.captures(&text) {
            if let Ok(version) = caps[1].parse() {
                debug!("Platform version {} found in {}", &caps[1], path);
                return Some(version);
            }
        }
    }
    None
}

/// Enumerate extension folders and classify each into a fact
pub fn scan_extensions(
    source: &dyn ProjectSource,
    platform_version: Option<&PlatformVersion>,
) -> Vec<ExtensionFact> {
    let mut facts = Vec::new();
    let mut seen = Vec::new();

    for (folder, key, vendor) in extension_folders(source) {
        if seen.contains(&key) {
            continue;
        }
        seen.push(key.clone());

        let metadata = read_extension_metadata(source, &folder);
        let raw = match &vendor {
            Some(v) => format!("{v}/{key}"),
            None => key.clone(),
        };
        let ctx = ClassifyContext {
            platform_version,
            metadata_version: metadata.version.as_deref(),
            typo3_constraint: metadata.typo3_constraint.as_deref(),
        };
        facts.push(classify(&raw, &ctx));
    }

    facts
}

/// All candidate extension folders: `(folder, key, vendor)`
fn extension_folders(source: &dyn ProjectSource) -> Vec<(String, String, Option<String>)> {
    let mut folders = Vec::new();

    for entry in source.entries() {
        for root in EXTENSION_ROOTS {
            if let Some(rest) = entry.strip_prefix(root) {
                if let Some((key, _)) = rest.split_once('/') {
                    folders.push((format!("{root}{key}"), key.to_string(), None));
                }
            }
        }
        for vendor in KNOWN_VENDORS {
            let prefix = format!("vendor/{vendor}/");
            if let Some(rest) = entry.strip_prefix(&prefix) {
                if let Some((key, _)) = rest.split_once('/') {
                    folders.push((
                        format!("vendor/{vendor}/{key}"),
                        key.to_string(),
                        Some((*vendor).to_string()),
                    ));
                }
            }
        }
    }

    folders
}

/// Metadata recovered from an extension folder
#[derive(Debug, Default)]
struct ExtensionMetadata {
    version: Option<String>,
    typo3_constraint: Option<String>,
}

/// Read `ext_emconf.php` (preferred) or the extension's own
/// `composer.json`; absence of both is fine - folder presence alone
/// identifies the extension.
fn read_extension_metadata(source: &dyn ProjectSource, folder: &str) -> ExtensionMetadata {
    if let Some(text) = source.read_text(&format!("{folder}/ext_emconf.php")) {
        return parse_emconf(&text);
    }

    if let Some(text) = source.read_text(&format!("{folder}/composer.json")) {
        #[derive(serde::Deserialize)]
        struct ExtComposer {
            #[serde(default)]
            version: Option<String>,
            #[serde(default)]
            require: std::collections::BTreeMap<String, String>,
        }
        if let Ok(manifest) = serde_json::from_str::<ExtComposer>(&text) {
            return ExtensionMetadata {
                version: manifest.version,
                typo3_constraint: manifest.require.get("typo3/cms-core").cloned(),
            };
        }
    }

    ExtensionMetadata::default()
}

fn parse_emconf(text: &str) -> ExtensionMetadata {
    static VERSION_RE: OnceLock<Regex> = OnceLock::new();
    static TYPO3_RE: OnceLock<Regex> = OnceLock::new();

    let version_re = VERSION_RE
        .get_or_init(|| Regex::new(r"'version'\s*=>\s*'([^']+)'").expect("valid regex"));
    let typo3_re =
        TYPO3_RE.get_or_init(|| Regex::new(r"'typo3'\s*=>\s*'([^']+)'").expect("valid regex"));

    ExtensionMetadata {
        version: version_re.captures(text).map(|c| c[1].to_string()),
        typo3_constraint: typo3_re.captures(text).map(|c| c[1].to_string()),
    }
}
