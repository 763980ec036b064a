//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// Brokkr - TYPO3 upgrade path planner
#[derive(Parser, Debug)]
#[command(name = "brokkr")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Plan an upgrade path between two TYPO3 versions
    Plan(PlanArgs),

    /// Inspect a project archive, directory, or facts export
    Inspect(InspectArgs),

    /// List known TYPO3 releases
    Releases(ReleasesArgs),
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Source TYPO3 version (detected from --project/--facts when omitted)
    #[arg(long)]
    pub from: Option<String>,

    /// Target TYPO3 version
    #[arg(long)]
    pub to: String,

    /// Plan a downgrade instead of refusing it
    #[arg(long)]
    pub allow_downgrade: bool,

    /// Installation mode for the generated steps
    #[arg(long, value_parser = ["composer", "legacy"])]
    pub mode: Option<String>,

    /// Key/value facts export (YAML or JSON) to plan against
    #[arg(long, conflicts_with = "project")]
    pub facts: Option<Utf8PathBuf>,

    /// Project archive (.tar.gz) or directory to inspect first
    #[arg(long)]
    pub project: Option<Utf8PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Refresh the release catalog from upstream before planning
    #[arg(long)]
    pub refresh: bool,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Project archive (.tar.gz), directory, or facts export to inspect
    pub path: Utf8PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ReleasesArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Include development releases
    #[arg(long)]
    pub include_dev: bool,

    /// Refresh the release catalog from upstream before listing
    #[arg(long)]
    pub refresh: bool,
}
