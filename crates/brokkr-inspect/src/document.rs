//! Structured export extraction
//!
//! Accepts a key/value document (YAML or JSON) in place of an archive.
//! Each fact is resolved by an ordered list of extraction rules tried
//! in priority order - first hit wins - and a document that carries
//! only some of the facts degrades to a partial result, never an error.

use brokkr_core::types::{InstallationMode, SystemFacts};
use brokkr_core::{Error, PlatformVersion, Result};
use serde_yaml_ng::Value;

use crate::classify::{classify, ClassifyContext};

/// Synonymous keys accepted for the platform version, by priority
const PLATFORM_KEYS: &[&str] = &["typo3_version", "typo3", "platform_version", "core_version"];

/// Synonymous keys for the PHP version
const PHP_KEYS: &[&str] = &["php_version", "php", "runtime_version", "runtime"];

/// Synonymous keys for the installation mode
const MODE_KEYS: &[&str] = &["installation_mode", "mode"];

/// Synonymous keys for the extension list
const EXTENSION_KEYS: &[&str] = &["extensions", "installed_extensions", "packages"];

/// Parse a structured export into system facts
///
/// Fails only when the text is neither valid YAML nor valid JSON.
pub fn extract_document(text: &str) -> Result<SystemFacts> {
    let doc: Value = serde_yaml_ng::from_str(text)
        .map_err(|e| Error::extraction_failed(format!("not a key/value document: {e}")))?;

    let typo3_version = resolve_platform_version(&doc);
    let php_version = resolve_php_version(&doc);
    let mode = resolve_mode(&doc).unwrap_or_default();

    Ok(SystemFacts {
        extensions: resolve_extensions(&doc, typo3_version.as_ref()),
        typo3_version,
        php_version,
        mode,
        database: Default::default(),
    })
}

/// First recognized platform-version key that parses
pub fn resolve_platform_version(doc: &Value) -> Option<PlatformVersion> {
    first_string(doc, PLATFORM_KEYS).and_then(|raw| raw.parse().ok())
}

/// First recognized PHP-version key
pub fn resolve_php_version(doc: &Value) -> Option<String> {
    first_string(doc, PHP_KEYS)
}

/// First recognized installation-mode key with a known value
pub fn resolve_mode(doc: &Value) -> Option<InstallationMode> {
    match first_string(doc, MODE_KEYS)?.to_ascii_lowercase().as_str() {
        "composer" | "package-manager" => Some(InstallationMode::Composer),
        "legacy" | "manual" => Some(InstallationMode::Legacy),
        _ => None,
    }
}

/// Extension records under the first recognized list key
fn resolve_extensions(
    doc: &Value,
    platform_version: Option<&PlatformVersion>,
) -> Vec<brokkr_core::types::ExtensionFact> {
    let Some(list) = EXTENSION_KEYS
        .iter()
        .find_map(|key| doc.get(key))
        .and_then(Value::as_sequence)
    else {
        return Vec::new();
    };

    list.iter()
        .filter_map(|item| {
            let identifier = item
                .get("identifier")
                .or_else(|| item.get("key"))
                .or_else(|| item.get("name"))
                .and_then(Value::as_str)?;
            let version = item.get("version").and_then(Value::as_str);
            let vendor = item.get("vendor").and_then(Value::as_str);

            let raw = match (identifier.contains('/'), vendor) {
                (false, Some(v)) => format!("{v}/{identifier}"),
                _ => identifier.to_string(),
            };
            let ctx = ClassifyContext {
                platform_version,
                metadata_version: version,
                typo3_constraint: None,
            };
            Some(classify(&raw, &ctx))
        })
        .collect()
}

/// First key in `keys` whose value is a non-empty scalar
fn first_string(doc: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        let Some(value) = doc.get(key) else {
            continue;
        };
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => continue,
        };
        if !text.is_empty() {
            return Some(text);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_yaml_export() {
        let facts = extract_document(
            r#"
typo3_version: "12.4"
php_version: "8.2"
installation_mode: composer
extensions:
  - identifier: news
    vendor: georgringer
    version: "11.0.3"
  - identifier: typo3/cms-backend
"#,
        )
        .unwrap();

        assert_eq!(facts.typo3_version.unwrap().to_string(), "12.4");
        assert_eq!(facts.php_version.as_deref(), Some("8.2"));
        assert_eq!(facts.mode, InstallationMode::Composer);
        assert_eq!(facts.extensions.len(), 2);
        assert_eq!(facts.extensions[0].key, "news");
        assert_eq!(facts.extensions[0].vendor.as_deref(), Some("georgringer"));
        assert!(facts.extensions[1].bundled);
    }

    #[test]
    fn test_json_export_accepted() {
        let facts =
            extract_document(r#"{"typo3": "11.5", "mode": "manual"}"#).unwrap();
        assert_eq!(facts.typo3_version.unwrap().to_string(), "11.5");
        assert_eq!(facts.mode, InstallationMode::Legacy);
    }

    #[test]
    fn test_key_priority_order() {
        // "typo3_version" outranks "typo3"
        let facts = extract_document("typo3_version: '12.4'\ntypo3: '10.4'\n").unwrap();
        assert_eq!(facts.typo3_version.unwrap().to_string(), "12.4");
    }

    #[test]
    fn test_partial_document_degrades() {
        let facts = extract_document("php: '8.1'\n").unwrap();
        assert!(facts.typo3_version.is_none());
        assert_eq!(facts.php_version.as_deref(), Some("8.1"));
        assert!(facts.extensions.is_empty());
    }

    #[test]
    fn test_numeric_version_scalar() {
        let facts = extract_document("typo3: 12.4\n").unwrap();
        assert_eq!(facts.typo3_version.unwrap().to_string(), "12.4");
    }

    #[test]
    fn test_unreadable_document_errors() {
        assert!(extract_document(": {{{ not a document").is_err());
    }
}
