//! # Catalog Subcommand
//!
//! Lists chapters and their sections with risk badges.

use anyhow::{bail, Result};
use clap::Args;

use dpdp_core::{Catalog, Chapter, RiskLevel};

/// Arguments for the `dpdp catalog` subcommand.
#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// List only this chapter.
    #[arg(long, value_name = "ID")]
    pub chapter: Option<String>,
}

/// Execute the catalog subcommand.
pub fn run_catalog(args: &CatalogArgs, catalog: &Catalog) -> Result<u8> {
    print!("{}", render_catalog(catalog, args.chapter.as_deref())?);
    Ok(0)
}

/// Render the listing, optionally restricted to one chapter.
pub fn render_catalog(catalog: &Catalog, chapter_id: Option<&str>) -> Result<String> {
    let mut lines = Vec::new();
    match chapter_id {
        Some(id) => {
            let Some(chapter) = catalog.chapter(id) else {
                bail!("unknown chapter {id:?}");
            };
            chapter_lines(&mut lines, chapter);
        }
        None => {
            let meta = catalog.metadata();
            lines.push(meta.name.clone());
            if let Some(citation) = &meta.citation {
                lines.push(citation.clone());
            }
            if let Some(deadline) = meta.compliance_deadline {
                lines.push(format!("Compliance deadline: {}", deadline.format("%d %b %Y")));
            }
            lines.push(format!(
                "{} chapters, {} sections",
                catalog.chapter_count(),
                catalog.section_count()
            ));
            for chapter in catalog.chapters() {
                lines.push(String::new());
                chapter_lines(&mut lines, chapter);
            }
        }
    }
    Ok(finish(lines))
}

fn chapter_lines(lines: &mut Vec<String>, chapter: &Chapter) {
    lines.push(format!(
        "[{}] {}  ({} sections, {} high risk)",
        chapter.id,
        chapter.title,
        chapter.sections.len(),
        chapter.count_by_risk(RiskLevel::High)
    ));
    for section in &chapter.sections {
        lines.push(format!("  {:<50} {}", section.label(), section.risk.badge()));
    }
}

/// Join rendered lines, newline-terminated.
pub(crate) fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
