//! Inspect command

use anyhow::{Context, Result};
use camino::Utf8Path;
use brokkr_core::types::SystemFacts;
use brokkr_inspect::{DirProject, Extractor, TarGzProject};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::InspectArgs;
use crate::output;

pub fn run(args: InspectArgs) -> Result<()> {
    let facts = extract_facts(&args.path)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&facts)?);
        return Ok(());
    }

    print_facts(&facts);
    Ok(())
}

/// Extract system facts from an archive, a directory, or a facts export
pub(crate) fn extract_facts(path: &Utf8Path) -> Result<SystemFacts> {
    let extractor = Extractor::new();

    if path.is_dir() {
        let project = DirProject::open(path.as_std_path())
            .with_context(|| format!("Failed to index {path}"))?;
        return Ok(extractor.extract_archive(&project)?);
    }

    if path.as_str().ends_with(".tar.gz") || path.as_str().ends_with(".tgz") {
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read {path}"))?;
        let project = TarGzProject::from_bytes(&bytes)
            .with_context(|| format!("Failed to unpack {path}"))?;
        return Ok(extractor.extract_archive(&project)?);
    }

    let text =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?;
    Ok(extractor.extract_document(&text)?)
}

#[derive(Tabled)]
struct ExtensionRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Vendor")]
    vendor: String,
    #[tabled(rename = "Bundled")]
    bundled: String,
}

fn print_facts(facts: &SystemFacts) {
    output::header("System facts");
    output::kv(
        "TYPO3",
        &facts
            .typo3_version
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "unknown".to_string()),
    );
    output::kv(
        "PHP",
        facts.php_version.as_deref().unwrap_or("unknown"),
    );
    output::kv("Mode", &facts.mode.to_string());

    output::header("Database");
    output::kv("Driver", facts.database.driver.as_deref().unwrap_or("unknown"));
    output::kv("Version", facts.database.version.as_deref().unwrap_or("unknown"));
    output::kv("Name", facts.database.name.as_deref().unwrap_or("unknown"));
    output::kv("Host", facts.database.host.as_deref().unwrap_or("unknown"));
    let tables = facts
        .database
        .table_count
        .map(|n| n.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    if facts.database.estimated {
        output::kv("Tables", &format!("{tables} (estimated)"));
    } else {
        output::kv("Tables", &tables);
    }

    if facts.extensions.is_empty() {
        output::info("No extensions found");
        return;
    }

    output::header(&format!("Extensions ({})", facts.extensions.len()));
    let rows: Vec<ExtensionRow> = facts
        .extensions
        .iter()
        .map(|e| ExtensionRow {
            key: e.key.clone(),
            version: e.version.clone().unwrap_or_else(|| "unknown".to_string()),
            vendor: e.vendor.clone().unwrap_or_default(),
            bundled: if e.bundled { "yes" } else { "" }.to_string(),
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));
}
