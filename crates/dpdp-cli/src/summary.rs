//! # Summary Subcommand
//!
//! Prints overall progress and the per-chapter summary table for a
//! one-shot session.

use anyhow::Result;
use clap::Args;

use dpdp_core::Catalog;
use dpdp_state::{chapter_summary, overall_stats, CompletionState};

use crate::catalog::finish;
use crate::session::SessionArgs;

/// Arguments for the `dpdp summary` subcommand.
#[derive(Args, Debug)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub session: SessionArgs,
}

/// Execute the summary subcommand.
pub fn run_summary(args: &SummaryArgs, catalog: &Catalog) -> Result<u8> {
    let state = args.session.build_state(catalog)?;
    print!("{}", render_summary(catalog, &state));
    Ok(0)
}

/// Render overall stats followed by the summary table.
pub fn render_summary(catalog: &Catalog, state: &CompletionState) -> String {
    let overall = overall_stats(catalog, state);
    let mut lines = vec![
        format!(
            "Overall: {}/{} sections audited ({:.1}%), {} pending",
            overall.completed, overall.total, overall.percent_complete, overall.pending
        ),
        String::new(),
        format!(
            "{:<6} {:<48} {:>5} {:>7} {:>7} {:>9} {:>8}",
            "ID", "Chapter", "Total", "Audited", "Pending", "High risk", "Progress"
        ),
    ];
    for row in chapter_summary(catalog, state) {
        lines.push(format!(
            "{:<6} {:<48} {:>5} {:>7} {:>7} {:>9} {:>7}%",
            row.chapter_id,
            row.title,
            row.total,
            row.completed,
            row.pending,
            format!("{}/{}", row.high_risk_done, row.high_risk),
            row.progress
        ));
    }
    finish(lines)
}
