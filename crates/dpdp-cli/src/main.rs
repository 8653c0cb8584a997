//! # dpdp CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dpdp_core::Catalog;

use dpdp_cli::catalog::{run_catalog, CatalogArgs};
use dpdp_cli::report::{run_report, ReportArgs};
use dpdp_cli::show::{run_show, ShowArgs};
use dpdp_cli::summary::{run_summary, SummaryArgs};
use dpdp_cli::validate::{run_validate, ValidateArgs};

/// DPDP Act 2023 audit checklist.
///
/// Browse the section catalog and its audit guidance, check catalog files,
/// and produce progress summaries and plain-text audit reports.
#[derive(Parser, Debug)]
#[command(name = "dpdp", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Catalog YAML file. Defaults to the embedded reference catalog.
    #[arg(long, global = true, value_name = "PATH")]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List chapters and sections with risk badges.
    Catalog(CatalogArgs),

    /// Show the overview and audit procedure of one section.
    Show(ShowArgs),

    /// Load and integrity-check a catalog file.
    Validate(ValidateArgs),

    /// Print the progress summary table for a one-shot session.
    Summary(SummaryArgs),

    /// Generate the plain-text audit report for a one-shot session.
    Report(ReportArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let catalog_path = cli.catalog.as_deref();
    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args, catalog_path),
        Commands::Catalog(args) => with_catalog(catalog_path, |c| run_catalog(&args, c)),
        Commands::Show(args) => with_catalog(catalog_path, |c| run_show(&args, c)),
        Commands::Summary(args) => with_catalog(catalog_path, |c| run_summary(&args, c)),
        Commands::Report(args) => with_catalog(catalog_path, |c| run_report(&args, c)),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

/// Load the catalog once, then run a subcommand against it.
fn with_catalog(path: Option<&Path>, run: impl FnOnce(&Catalog) -> anyhow::Result<u8>) -> anyhow::Result<u8> {
    let catalog = dpdp_cli::load_catalog(path)?;
    tracing::debug!(
        chapters = catalog.chapter_count(),
        sections = catalog.section_count(),
        "catalog ready"
    );
    run(&catalog)
}
