//! # Report Subcommand
//!
//! Generates the plain-text audit report for a one-shot session and writes
//! it to stdout or a file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use dpdp_core::{Catalog, Timestamp};
use dpdp_report::generate_report;

use crate::session::SessionArgs;

/// Arguments for the `dpdp report` subcommand.
#[derive(Args, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Generation time for the header, RFC 3339. Defaults to now.
    #[arg(long, value_name = "RFC3339")]
    pub generated_at: Option<String>,

    /// Write the report here instead of stdout (e.g. `DPDP_Audit_Report.txt`).
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Execute the report subcommand.
pub fn run_report(args: &ReportArgs, catalog: &Catalog) -> Result<u8> {
    let state = args.session.build_state(catalog)?;
    let generated_at = match &args.generated_at {
        Some(raw) => Timestamp::parse_lenient(raw).with_context(|| format!("--generated-at {raw}"))?,
        None => Timestamp::now(),
    };
    let report = generate_report(catalog, &state, &generated_at);

    match &args.output {
        Some(path) => {
            std::fs::write(path, &report)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "report written");
            println!("Report written to {}", path.display());
        }
        None => println!("{report}"),
    }
    Ok(0)
}
