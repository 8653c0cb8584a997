//! # Validate Subcommand
//!
//! Loads a catalog file and runs the integrity checks: unique chapter ids,
//! unique section numbers across the catalog, non-empty chapters, and
//! non-empty audit procedures.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use dpdp_core::{Catalog, RiskLevel};

/// Arguments for the `dpdp validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Catalog file to check. Defaults to `--catalog`, then the embedded
    /// reference catalog.
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when the catalog is valid, 1 otherwise.
pub fn run_validate(args: &ValidateArgs, global_catalog: Option<&Path>) -> Result<u8> {
    let path = args.path.as_deref().or(global_catalog);
    let label = path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<embedded reference catalog>".to_string());

    match crate::load_catalog(path) {
        Ok(catalog) => {
            println!("OK: {label}");
            println!("{}", describe(&catalog));
            Ok(0)
        }
        Err(e) => {
            println!("FAIL: {label} — {e:#}");
            Ok(1)
        }
    }
}

/// One-line description of a valid catalog.
pub fn describe(catalog: &Catalog) -> String {
    let count = |risk| {
        catalog
            .chapters()
            .iter()
            .map(|c| c.count_by_risk(risk))
            .sum::<usize>()
    };
    format!(
        "  {}: {} chapters, {} sections ({} high, {} medium, {} low risk)",
        catalog.metadata().name,
        catalog.chapter_count(),
        catalog.section_count(),
        count(RiskLevel::High),
        count(RiskLevel::Medium),
        count(RiskLevel::Low)
    )
}
