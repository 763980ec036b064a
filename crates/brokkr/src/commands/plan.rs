//! Plan command

use anyhow::{anyhow, Result};
use brokkr_catalog::{CatalogRefresher, PackageResolver, ReleaseCatalog};
use brokkr_core::types::{Hop, InstallationMode, SystemFacts};
use brokkr_core::PlatformVersion;
use brokkr_inspect::{apply_probe, ConstraintProbe};
use brokkr_planner::{CommandComposer, Planner, StepGenerator};
use console::style;

use crate::cli::PlanArgs;
use crate::commands::inspect::extract_facts;
use crate::output;

pub async fn run(args: PlanArgs) -> Result<()> {
    let catalog = ReleaseCatalog::baseline()?;
    if args.refresh {
        let spinner = output::spinner("Refreshing release catalog...");
        CatalogRefresher::new().refresh(&catalog).await;
        spinner.finish_and_clear();
        if !args.json {
            output::success("Release catalog refreshed");
        }
    }

    // Facts are optional: a bare --from/--to pair plans without them
    let mut facts = match (&args.facts, &args.project) {
        (Some(path), _) | (None, Some(path)) => {
            let facts = extract_facts(path)?;
            tracing::debug!(
                "Extracted facts from {}: {} extension(s)",
                path,
                facts.extensions.len()
            );
            Some(facts)
        }
        (None, None) => None,
    };

    let from = resolve_from(&args, facts.as_ref())?;
    let to: PlatformVersion = args.to.parse()?;
    let mode = resolve_mode(&args, facts.as_ref());

    if let Some(facts) = facts.as_mut() {
        apply_probe(facts, &ConstraintProbe, &to);
    }
    let extensions = facts.as_ref().map(|f| f.extensions.clone()).unwrap_or_default();

    let mut hops = Planner::new(&catalog).plan(&from, &to, args.allow_downgrade)?;
    let composer = CommandComposer::new(PackageResolver::new());
    let generator = StepGenerator::new(&catalog, &composer);
    generator.attach_steps(&mut hops, mode, &extensions);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&hops)?);
        return Ok(());
    }

    warn_if_unsupported(&catalog, &from);
    print_plan(&from, &to, mode, &hops);
    warn_incompatible(facts.as_ref());
    Ok(())
}

/// The source version: explicit flag first, then detected facts
fn resolve_from(args: &PlanArgs, facts: Option<&SystemFacts>) -> Result<PlatformVersion> {
    if let Some(raw) = &args.from {
        return Ok(raw.parse()?);
    }
    facts
        .and_then(|f| f.typo3_version.clone())
        .ok_or_else(|| anyhow!("No source version: pass --from or a --project/--facts input that carries one"))
}

/// The installation mode: explicit flag first, then detected facts
fn resolve_mode(args: &PlanArgs, facts: Option<&SystemFacts>) -> InstallationMode {
    match args.mode.as_deref() {
        Some("legacy") => InstallationMode::Legacy,
        Some(_) => InstallationMode::Composer,
        None => facts.map(|f| f.mode).unwrap_or_default(),
    }
}

/// EOL advisory when the source release is past security support
fn warn_if_unsupported(catalog: &ReleaseCatalog, from: &PlatformVersion) {
    if let Some(release) = catalog.get(from) {
        let today = chrono::Utc::now().date_naive();
        if !release.is_security_supported(today) {
            output::warning(&format!(
                "TYPO3 {} no longer receives security fixes",
                from.minor_line()
            ));
        }
    }
}

fn print_plan(from: &PlatformVersion, to: &PlatformVersion, mode: InstallationMode, hops: &[Hop]) {
    output::header("Upgrade plan");
    output::kv("From", &from.to_string());
    output::kv("To", &to.to_string());
    output::kv("Mode", &mode.to_string());
    output::kv("Hops", &hops.len().to_string());

    for (i, hop) in hops.iter().enumerate() {
        output::header(&format!("Hop {}: {} -> {}", i + 1, hop.from, hop.to));
        output::kv("Complexity", &hop.complexity.to_string());
        if hop.is_downgrade {
            output::warning("This hop is a downgrade");
        }

        for (n, step) in hop.steps.iter().enumerate() {
            println!("  {}. {}", n + 1, style(&step.title).bold());
            for command in &step.commands {
                println!("     {}", style(command).cyan());
            }
            if let Some(note) = &step.note {
                println!("     {} {}", style("note:").yellow(), note);
            }
        }
    }
    println!();
}

/// List extensions the compatibility probe rejected for the target
fn warn_incompatible(facts: Option<&SystemFacts>) {
    let Some(facts) = facts else { return };
    let incompatible: Vec<_> = facts
        .extensions
        .iter()
        .filter(|e| e.compatible == Some(false))
        .collect();
    if incompatible.is_empty() {
        return;
    }

    output::warning("Extensions incompatible with the target version:");
    for ext in incompatible {
        let constraint = ext.typo3_constraint.as_deref().unwrap_or("no constraint");
        println!("  {} ({constraint})", ext.key);
        if !ext.alternatives.is_empty() {
            println!("    consider: {}", ext.alternatives.join(", "));
        }
    }
}
