//! Extraction orchestration
//!
//! One entry point per input shape. Both produce the same normalized
//! `SystemFacts`; neither has side effects. Missing optional facts
//! degrade to `None`/defaults - extraction raises only when the input
//! is structurally unreadable.

use brokkr_core::types::{InstallationMode, SystemFacts};
use brokkr_core::Result;
use tracing::debug;

use crate::database::{scan_database, EstimateProvider, HeuristicEstimates};
use crate::document;
use crate::manifest::{extract_from_manifest, find_manifest};
use crate::scan::{scan_extensions, scan_platform_version};
use crate::source::ProjectSource;

/// Project introspection front door
pub struct Extractor {
    estimates: Box<dyn EstimateProvider>,
}

impl Extractor {
    /// Create an extractor with the default heuristic estimates
    pub fn new() -> Self {
        Self {
            estimates: Box::new(HeuristicEstimates),
        }
    }

    /// Create an extractor with a custom estimate provider
    pub fn with_estimates(estimates: Box<dyn EstimateProvider>) -> Self {
        Self { estimates }
    }

    /// Recover system facts from a project file tree
    pub fn extract_archive(&self, source: &dyn ProjectSource) -> Result<SystemFacts> {
        let mut facts = match find_manifest(source)
            .and_then(|path| extract_from_manifest(source, &path))
        {
            Some(facts) => facts,
            None => {
                debug!("No usable composer manifest; scanning as legacy installation");
                let typo3_version = scan_platform_version(source);
                let extensions = scan_extensions(source, typo3_version.as_ref());
                SystemFacts {
                    typo3_version,
                    php_version: None,
                    mode: InstallationMode::Legacy,
                    extensions,
                    database: Default::default(),
                }
            }
        };

        facts.database = scan_database(
            source,
            facts.typo3_version.as_ref(),
            self.estimates.as_ref(),
        );
        Ok(facts)
    }

    /// Recover system facts from a structured key/value export
    pub fn extract_document(&self, text: &str) -> Result<SystemFacts> {
        document::extract_document(text)
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::InMemoryProject;

    #[test]
    fn test_composer_project_end_to_end() {
        let project = InMemoryProject::new().with_file(
            "composer.json",
            r#"{"require": {"typo3/cms-core": "^12.4", "georgringer/news": "^11.0"}}"#,
        );

        let facts = Extractor::new().extract_archive(&project).unwrap();
        assert_eq!(facts.mode, InstallationMode::Composer);
        assert_eq!(facts.typo3_version.unwrap().to_string(), "12.4");
        assert!(facts.extensions.iter().any(|e| e.key == "news"));
        // No dump in the archive, so database facts are estimated
        assert!(facts.database.estimated);
    }

    #[test]
    fn test_legacy_project_end_to_end() {
        let project = InMemoryProject::new()
            .with_file(
                "typo3conf/LocalConfiguration.php",
                "'compat_version' => '10.4', 'driver' => 'mysqli', 'dbname' => 'site'",
            )
            .with_file("typo3conf/ext/news/ext_emconf.php", "'version' => '8.0.0'");

        let facts = Extractor::new().extract_archive(&project).unwrap();
        assert_eq!(facts.mode, InstallationMode::Legacy);
        assert_eq!(facts.typo3_version.unwrap().to_string(), "10.4");
        assert_eq!(facts.extensions.len(), 1);
        assert_eq!(facts.extensions[0].version.as_deref(), Some("8.0.0"));
        assert_eq!(facts.database.driver.as_deref(), Some("mysqli"));
    }

    #[test]
    fn test_empty_project_degrades_to_defaults() {
        let facts = Extractor::new()
            .extract_archive(&InMemoryProject::new())
            .unwrap();
        assert!(facts.typo3_version.is_none());
        assert_eq!(facts.mode, InstallationMode::Legacy);
        assert!(facts.extensions.is_empty());
        assert!(facts.database.estimated);
    }

    #[test]
    fn test_broken_manifest_falls_back_to_scan() {
        let project = InMemoryProject::new()
            .with_file("composer.json", "{ broken")
            .with_file(
                "typo3conf/LocalConfiguration.php",
                "'compat_version' => '9.5'",
            );

        let facts = Extractor::new().extract_archive(&project).unwrap();
        assert_eq!(facts.mode, InstallationMode::Legacy);
        assert_eq!(facts.typo3_version.unwrap().to_string(), "9.5");
    }
}
