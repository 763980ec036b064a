//! Per-hop remediation step generation
//!
//! Steps come from a single ordered template table; each template
//! carries a predicate deciding whether it applies to the hop at hand.
//! Order in the table is execution order and encodes the hard
//! dependencies: backup before the package update, schema before
//! wizards, cache flush last. Conditional steps drop out when the
//! target release does not require them.

use brokkr_catalog::ReleaseCatalog;
use brokkr_core::types::{ExtensionFact, Hop, InstallationMode, RemediationStep};

use crate::compose::CommandComposer;

/// Everything a step template may draw on
struct StepContext<'a> {
    hop: &'a Hop,
    mode: InstallationMode,
    /// Precomposed `composer require` command for the hop's target
    command: String,
    php_range: Option<String>,
    composer_min_version: Option<String>,
    needs_schema_change: bool,
    needs_upgrade_wizard: bool,
}

type Predicate = fn(&StepContext) -> bool;
type Builder = fn(&StepContext) -> RemediationStep;

/// The fixed step skeleton, in execution order
const TEMPLATES: &[(Predicate, Builder)] = &[
    (crosses_major, review_deprecations),
    (crosses_major, verify_php),
    (always, backup),
    (always, dependency_update),
    (needs_schema, schema_update),
    (needs_wizards, upgrade_wizards),
    (always, cache_flush),
];

/// Generates the ordered remediation steps for each hop of a plan
pub struct StepGenerator<'a> {
    catalog: &'a ReleaseCatalog,
    composer: &'a CommandComposer,
}

impl<'a> StepGenerator<'a> {
    pub fn new(catalog: &'a ReleaseCatalog, composer: &'a CommandComposer) -> Self {
        Self { catalog, composer }
    }

    /// The ordered remediation steps for one hop
    pub fn steps_for(
        &self,
        hop: &Hop,
        mode: InstallationMode,
        extensions: &[ExtensionFact],
    ) -> Vec<RemediationStep> {
        let release = self.catalog.get(&hop.to);
        let ctx = StepContext {
            hop,
            mode,
            command: self.composer.compose(&hop.to, extensions),
            php_range: release.as_ref().and_then(|r| r.php_range.clone()),
            composer_min_version: release
                .as_ref()
                .and_then(|r| r.composer_min_version.clone()),
            // Unknown target release: assume the expensive steps apply
            needs_schema_change: release.as_ref().map_or(true, |r| r.needs_schema_change),
            needs_upgrade_wizard: release.as_ref().map_or(true, |r| r.needs_upgrade_wizard),
        };

        TEMPLATES
            .iter()
            .filter(|(include_if, _)| include_if(&ctx))
            .map(|(_, build)| build(&ctx))
            .collect()
    }

    /// Generate and attach steps to every hop of a plan, in place
    pub fn attach_steps(
        &self,
        hops: &mut [Hop],
        mode: InstallationMode,
        extensions: &[ExtensionFact],
    ) {
        for hop in hops {
            hop.steps = self.steps_for(hop, mode, extensions);
        }
    }
}

fn always(_ctx: &StepContext) -> bool {
    true
}

fn crosses_major(ctx: &StepContext) -> bool {
    ctx.hop.breaking
}

fn needs_schema(ctx: &StepContext) -> bool {
    ctx.needs_schema_change
}

fn needs_wizards(ctx: &StepContext) -> bool {
    ctx.needs_upgrade_wizard
}

fn review_deprecations(ctx: &StepContext) -> RemediationStep {
    let major = ctx.hop.to.major;
    RemediationStep::new(
        "Review deprecations and breaking changes",
        vec![
            format!(
                "Read the changelog for TYPO3 {major}: \
                 https://docs.typo3.org/c/typo3/cms-core/main/en-us/Changelog-{major}.html"
            ),
            "Run the extension scanner (Install Tool > Upgrade > Scan Extension Files)"
                .to_string(),
        ],
    )
}

fn verify_php(ctx: &StepContext) -> RemediationStep {
    let step = RemediationStep::new("Verify the PHP version", vec!["php -v".to_string()]);
    match &ctx.php_range {
        Some(range) => step.with_note(format!(
            "TYPO3 {} requires PHP {range}",
            ctx.hop.to.minor_line()
        )),
        None => step,
    }
}

fn backup(ctx: &StepContext) -> RemediationStep {
    let from = ctx.hop.from.minor_line();
    let files = match ctx.mode {
        InstallationMode::Composer => "config/ public/fileadmin/ composer.json composer.lock",
        InstallationMode::Legacy => "typo3conf/ fileadmin/ uploads/",
    };
    RemediationStep::new(
        "Back up the database and files",
        vec![
            format!("mysqldump --single-transaction typo3db > backup-typo3-{from}.sql"),
            format!("tar -czf backup-typo3-{from}-files.tar.gz {files}"),
        ],
    )
    .with_note("Confirm the dump restores into a scratch database before continuing")
}

fn dependency_update(ctx: &StepContext) -> RemediationStep {
    let target = ctx.hop.to.minor_line();
    match ctx.mode {
        InstallationMode::Composer => {
            let step =
                RemediationStep::new("Update TYPO3 packages", vec![ctx.command.clone()]);
            match &ctx.composer_min_version {
                Some(min) => step.with_note(format!("Requires Composer {min} or newer")),
                None => step,
            }
        }
        InstallationMode::Legacy => RemediationStep::new(
            "Replace the TYPO3 source",
            vec![
                format!(
                    "Download the TYPO3 {target} source package from https://get.typo3.org/"
                ),
                "Point the typo3_src symlink at the unpacked new source".to_string(),
            ],
        ),
    }
}

fn schema_update(ctx: &StepContext) -> RemediationStep {
    let commands = match ctx.mode {
        InstallationMode::Composer => vec!["vendor/bin/typo3 database:updateschema".to_string()],
        InstallationMode::Legacy => vec![
            "Open the Install Tool and run Analyze Database Structure (Maintenance)".to_string(),
        ],
    };
    RemediationStep::new("Update the database schema", commands)
}

fn upgrade_wizards(ctx: &StepContext) -> RemediationStep {
    let commands = match ctx.mode {
        InstallationMode::Composer => vec![
            "vendor/bin/typo3 upgrade:list".to_string(),
            "vendor/bin/typo3 upgrade:run".to_string(),
        ],
        InstallationMode::Legacy => vec![
            "Run every pending wizard under Install Tool > Upgrade > Run Upgrade Wizard"
                .to_string(),
        ],
    };
    RemediationStep::new("Run upgrade wizards", commands)
}

fn cache_flush(ctx: &StepContext) -> RemediationStep {
    let commands = match ctx.mode {
        InstallationMode::Composer => vec!["vendor/bin/typo3 cache:flush".to_string()],
        InstallationMode::Legacy => vec![
            "Delete typo3temp/var/cache/ and flush all caches from the Install Tool".to_string(),
        ],
    };
    RemediationStep::new("Flush all caches", commands)
}
