//! Integration tests for the planning pipeline
//!
//! Tests cover:
//! - The full 10.4 -> 13.4 LTS route with attached steps
//! - Step counts driven by release flags
//! - Command composition stability across repeated generation
//! - Downgrade handling end to end

use brokkr_catalog::{PackageResolver, ReleaseCatalog};
use brokkr_core::types::{Complexity, ExtensionFact, InstallationMode};
use brokkr_core::Error;
use brokkr_planner::{CommandComposer, Planner, StepGenerator};

fn extension(key: &str) -> ExtensionFact {
    ExtensionFact {
        key: key.to_string(),
        raw_identifier: key.to_string(),
        version: None,
        vendor: None,
        bundled: false,
        compatible: None,
        typo3_constraint: None,
        alternatives: Vec::new(),
    }
}

#[test]
fn test_lts_route_with_composer_steps() {
    let catalog = ReleaseCatalog::baseline().unwrap();
    let planner = Planner::new(&catalog);

    let mut hops = planner
        .plan(&"10.4".parse().unwrap(), &"13.4".parse().unwrap(), false)
        .unwrap();

    // Three single-major legs: 10.4 -> 11.5 -> 12.4 -> 13.4
    assert_eq!(hops.len(), 3);
    assert!(hops.iter().all(|h| h.complexity == Complexity::Medium));
    for pair in hops.windows(2) {
        assert_eq!(pair[0].to, pair[1].from);
    }

    let composer = CommandComposer::new(PackageResolver::new());
    let generator = StepGenerator::new(&catalog, &composer);
    generator.attach_steps(&mut hops, InstallationMode::Composer, &[extension("news")]);

    for hop in &hops {
        // Every hop crosses a major, so advisories lead the skeleton
        assert_eq!(hop.steps[0].title, "Review deprecations and breaking changes");
        assert_eq!(hop.steps.last().unwrap().title, "Flush all caches");

        let command = hop
            .steps
            .iter()
            .flat_map(|s| &s.commands)
            .find(|c| c.starts_with("composer require"))
            .expect("dependency step carries the composed command");
        assert!(command.contains(&format!("typo3/cms-core:^{}", hop.to)));
        assert!(command.contains("georgringer/news"));
        assert!(command.ends_with("--with-all-dependencies"));
    }
}

#[test]
fn test_downgrade_end_to_end() {
    let catalog = ReleaseCatalog::baseline().unwrap();
    let planner = Planner::new(&catalog);

    let refused = planner.plan(&"13.4".parse().unwrap(), &"11.5".parse().unwrap(), false);
    assert!(matches!(refused, Err(Error::DowngradeNotAllowed { .. })));

    let hops = planner
        .plan(&"13.4".parse().unwrap(), &"11.5".parse().unwrap(), true)
        .unwrap();
    assert_eq!(hops.len(), 1);
    assert!(hops[0].is_downgrade);
    assert_eq!(hops[0].complexity, Complexity::VeryHigh);
}

#[test]
fn test_intermediate_hops_land_on_lts_lines_only() {
    let catalog = ReleaseCatalog::baseline().unwrap();
    let hops = Planner::new(&catalog)
        .plan(&"9.5".parse().unwrap(), &"13.4".parse().unwrap(), false)
        .unwrap();

    for hop in &hops[..hops.len() - 1] {
        let release = catalog.get(&hop.to).unwrap();
        assert!(release.is_lts(), "intermediate {} is not LTS", hop.to);
    }
}

#[test]
fn test_composed_command_is_stable_across_hops_and_calls() {
    let catalog = ReleaseCatalog::baseline().unwrap();
    let composer = CommandComposer::new(PackageResolver::new());
    let generator = StepGenerator::new(&catalog, &composer);
    let extensions = [extension("news"), extension("powermail")];

    let hop = brokkr_core::types::Hop::new("12.4".parse().unwrap(), "13.4".parse().unwrap());
    let first = generator.steps_for(&hop, InstallationMode::Composer, &extensions);
    let second = generator.steps_for(&hop, InstallationMode::Composer, &extensions);

    let command = |steps: &[brokkr_core::types::RemediationStep]| {
        steps
            .iter()
            .flat_map(|s| s.commands.clone())
            .find(|c| c.starts_with("composer require"))
            .unwrap()
    };
    assert_eq!(command(&first), command(&second));
}
