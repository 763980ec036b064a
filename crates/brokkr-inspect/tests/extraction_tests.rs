//! Integration tests for archive extraction
//!
//! Builds real gzipped tar archives in memory and runs the full
//! extraction pipeline over them.

use brokkr_core::types::InstallationMode;
use brokkr_inspect::{Extractor, TarGzProject};
use flate2::write::GzEncoder;
use flate2::Compression;

fn archive(files: &[(&str, &str)]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (path, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, path, content.as_bytes()).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

#[test]
fn test_composer_archive_round_trip() {
    let bytes = archive(&[(
        "site/composer.json",
        r#"{
            "require": {
                "typo3/cms-core": "^12.4",
                "typo3/cms-backend": "^12.4",
                "georgringer/news": "^11.0"
            }
        }"#,
    )]);

    let project = TarGzProject::from_bytes(&bytes).unwrap();
    let facts = Extractor::new().extract_archive(&project).unwrap();

    assert_eq!(facts.mode, InstallationMode::Composer);
    assert_eq!(facts.typo3_version.as_ref().unwrap().minor_key(), (12, 4));

    let news = facts.extensions.iter().find(|e| e.key == "news").unwrap();
    assert!(!news.bundled);
    assert_eq!(news.vendor.as_deref(), Some("georgringer"));
    assert_eq!(news.raw_identifier, "georgringer/news");

    let backend = facts.extensions.iter().find(|e| e.key == "backend").unwrap();
    assert!(backend.bundled);
    // Bundled extensions inherit the platform version
    assert_eq!(backend.version.as_deref(), Some("12.4"));
}

#[test]
fn test_legacy_archive_scanned_from_markers() {
    let bytes = archive(&[
        (
            "typo3/sysext/core/Classes/Information/Typo3Version.php",
            "class Typo3Version { protected const VERSION = '11.5.30'; }",
        ),
        (
            "typo3conf/ext/news/ext_emconf.php",
            "'version' => '10.0.2',\n'constraints' => [],\n'typo3' => '10.4.0-11.5.99',",
        ),
        ("typo3conf/ext/my_sitepackage/ext_tables.php", "<?php"),
    ]);

    let project = TarGzProject::from_bytes(&bytes).unwrap();
    let facts = Extractor::new().extract_archive(&project).unwrap();

    assert_eq!(facts.mode, InstallationMode::Legacy);
    assert_eq!(facts.typo3_version.as_ref().unwrap().to_string(), "11.5.30");

    let news = facts.extensions.iter().find(|e| e.key == "news").unwrap();
    assert_eq!(news.version.as_deref(), Some("10.0.2"));
    assert_eq!(news.typo3_constraint.as_deref(), Some("10.4.0-11.5.99"));

    // Folder presence alone still yields a fact
    assert!(facts.extensions.iter().any(|e| e.key == "my_sitepackage"));
}

#[test]
fn test_non_archive_bytes_rejected() {
    assert!(TarGzProject::from_bytes(b"definitely not a tarball").is_err());
}
