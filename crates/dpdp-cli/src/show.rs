//! # Show Subcommand
//!
//! Prints the overview and numbered audit procedure of one section.

use anyhow::{anyhow, Result};
use clap::Args;

use dpdp_core::Catalog;

use crate::catalog::finish;

/// Arguments for the `dpdp show` subcommand.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Chapter ID (e.g. `ch2`).
    #[arg(value_name = "CHAPTER")]
    pub chapter: String,

    /// Section number (e.g. `4`).
    #[arg(value_name = "SECTION")]
    pub section: String,
}

/// Execute the show subcommand.
pub fn run_show(args: &ShowArgs, catalog: &Catalog) -> Result<u8> {
    print!("{}", render_section(catalog, &args.chapter, &args.section)?);
    Ok(0)
}

/// Render one section's guidance.
pub fn render_section(catalog: &Catalog, chapter_id: &str, number: &str) -> Result<String> {
    let chapter = catalog
        .chapter(chapter_id)
        .ok_or_else(|| anyhow!("unknown chapter {chapter_id:?}"))?;
    let section = chapter
        .section(number)
        .ok_or_else(|| anyhow!("no section {number:?} in chapter {chapter_id:?}"))?;

    let mut lines = vec![
        chapter.title.clone(),
        format!("{}  [{}]", section.label(), section.risk.badge()),
        String::new(),
        "Overview".to_string(),
        format!("  {}", section.overview),
        String::new(),
        "Audit procedure".to_string(),
    ];
    lines.extend(
        section
            .audit_steps
            .iter()
            .enumerate()
            .map(|(i, step)| format!("  {}. {}", i + 1, step)),
    );
    Ok(finish(lines))
}
