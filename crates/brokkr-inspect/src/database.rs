//! Database fact recovery
//!
//! Connection facts come from a fixed list of candidate configuration
//! files; table count and server version come from a SQL dump when one
//! is present. Without a dump they are estimated from the platform
//! version. Estimates are clearly flagged and produced by an
//! injectable provider so tests can substitute a stub.

use std::sync::OnceLock;

use brokkr_core::types::DatabaseFacts;
use brokkr_core::PlatformVersion;
use regex::Regex;
use tracing::debug;

use crate::source::ProjectSource;

/// Candidate configuration files, in priority order
const DB_CONFIG_PATHS: &[&str] = &[
    "typo3conf/LocalConfiguration.php",
    "config/system/settings.php",
    "typo3conf/localconf.php",
    ".env",
];

/// Best-effort estimates used when nothing measurable is available
pub trait EstimateProvider: Send + Sync {
    /// Estimated table count for an installation of this platform version
    fn table_count(&self, platform: Option<&PlatformVersion>) -> u32;

    /// Estimated database server version
    fn database_version(&self, platform: Option<&PlatformVersion>) -> String;
}

/// Deterministic platform-version heuristics
///
/// Newer platform majors ship more core tables; the figures are rough
/// medians for a stock installation, not measurements.
#[derive(Debug, Default)]
pub struct HeuristicEstimates;

impl EstimateProvider for HeuristicEstimates {
    fn table_count(&self, platform: Option<&PlatformVersion>) -> u32 {
        match platform.map(|v| v.major) {
            Some(major) if major >= 12 => 72,
            Some(major) if major >= 10 => 64,
            Some(major) if major >= 8 => 52,
            Some(_) => 45,
            None => 50,
        }
    }

    fn database_version(&self, platform: Option<&PlatformVersion>) -> String {
        match platform.map(|v| v.major) {
            Some(major) if major >= 12 => "10.6".to_string(),
            Some(major) if major >= 10 => "10.4".to_string(),
            _ => "5.7".to_string(),
        }
    }
}

/// Recover database facts from the project
pub fn scan_database(
    source: &dyn ProjectSource,
    platform: Option<&PlatformVersion>,
    estimates: &dyn EstimateProvider,
) -> DatabaseFacts {
    let mut facts = DatabaseFacts::default();

    for path in DB_CONFIG_PATHS {
        let Some(text) = source.read_text(path) else {
            continue;
        };
        if facts.driver.is_none() {
            facts.driver = capture(&text, driver_re());
        }
        if facts.name.is_none() {
            facts.name = capture(&text, dbname_re()).or_else(|| capture(&text, env_dbname_re()));
        }
        if facts.host.is_none() {
            facts.host = capture(&text, host_re());
        }
        if facts.driver.is_some() && facts.name.is_some() && facts.host.is_some() {
            break;
        }
    }

    if let Some(dump) = find_sql_dump(source) {
        let text = source.read_text(&dump).unwrap_or_default();
        facts.table_count = Some(count_create_tables(&text));
        facts.version = capture(&text, dump_version_re());
        facts.estimated = false;
        debug!("Database facts measured from dump: {}", dump);
    } else {
        facts.table_count = Some(estimates.table_count(platform));
        facts.version = Some(estimates.database_version(platform));
        facts.estimated = true;
    }

    facts
}

fn find_sql_dump(source: &dyn ProjectSource) -> Option<String> {
    source
        .entries()
        .into_iter()
        .filter(|e| e.ends_with(".sql"))
        .min_by_key(|e| e.len())
}

fn count_create_tables(dump: &str) -> u32 {
    dump.matches("CREATE TABLE").count() as u32
}

fn capture(text: &str, regex: &Regex) -> Option<String> {
    regex.captures(text).map(|c| c[1].to_string())
}

fn driver_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"'driver'\s*=>\s*'([^']+)'").expect("valid regex"))
}

fn dbname_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"'dbname'\s*=>\s*'([^']+)'").expect("valid regex"))
}

fn host_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"'host'\s*=>\s*'([^']+)'").expect("valid regex"))
}

fn env_dbname_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"TYPO3_CONF_VARS__DB__Connections__Default__dbname=(\S+)")
            .expect("valid regex")
    })
}

fn dump_version_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-- Server version\s+(\S+)").expect("valid regex"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::InMemoryProject;

    const LOCAL_CONFIGURATION: &str = r#"<?php
return [
    'DB' => [
        'Connections' => [
            'Default' => [
                'driver' => 'mysqli',
                'dbname' => 'typo3_site',
                'host' => 'db.internal',
            ],
        ],
    ],
];
"#;

    #[test]
    fn test_facts_from_local_configuration() {
        let project =
            InMemoryProject::new().with_file("typo3conf/LocalConfiguration.php", LOCAL_CONFIGURATION);

        let facts = scan_database(&project, None, &HeuristicEstimates);
        assert_eq!(facts.driver.as_deref(), Some("mysqli"));
        assert_eq!(facts.name.as_deref(), Some("typo3_site"));
        assert_eq!(facts.host.as_deref(), Some("db.internal"));
    }

    #[test]
    fn test_dump_measurements_beat_estimates() {
        let dump = "-- Server version\t10.5.8-MariaDB\nCREATE TABLE a (id int);\nCREATE TABLE b (id int);\n";
        let project = InMemoryProject::new().with_file("backup/db.sql", dump);

        let facts = scan_database(&project, None, &HeuristicEstimates);
        assert!(!facts.estimated);
        assert_eq!(facts.table_count, Some(2));
        assert_eq!(facts.version.as_deref(), Some("10.5.8-MariaDB"));
    }

    #[test]
    fn test_estimates_are_flagged() {
        let platform: PlatformVersion = "12.4".parse().unwrap();
        let project = InMemoryProject::new();

        let facts = scan_database(&project, Some(&platform), &HeuristicEstimates);
        assert!(facts.estimated);
        assert_eq!(facts.table_count, Some(72));
        assert_eq!(facts.version.as_deref(), Some("10.6"));
    }

    #[test]
    fn test_stub_provider_substitutes() {
        struct StubEstimates;
        impl EstimateProvider for StubEstimates {
            fn table_count(&self, _platform: Option<&PlatformVersion>) -> u32 {
                7
            }
            fn database_version(&self, _platform: Option<&PlatformVersion>) -> String {
                "9.9".to_string()
            }
        }

        let facts = scan_database(&InMemoryProject::new(), None, &StubEstimates);
        assert_eq!(facts.table_count, Some(7));
        assert_eq!(facts.version.as_deref(), Some("9.9"));
    }

    #[test]
    fn test_env_file_dbname() {
        let project = InMemoryProject::new()
            .with_file(".env", "TYPO3_CONF_VARS__DB__Connections__Default__dbname=prod_db\n");
        let facts = scan_database(&project, None, &HeuristicEstimates);
        assert_eq!(facts.name.as_deref(), Some("prod_db"));
    }
}
