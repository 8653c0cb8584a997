//! # dpdp-cli — Command-Line Interface for the DPDP Audit Checklist
//!
//! Provides the `dpdp` binary.
//!
//! ## Subcommands
//!
//! - `dpdp catalog` — Chapters, sections, and risk badges.
//! - `dpdp show` — Overview and numbered audit procedure of one section.
//! - `dpdp validate` — Load and integrity-check a catalog file.
//! - `dpdp summary` — Summary table for a one-shot session.
//! - `dpdp report` — Plain-text audit report for a one-shot session.
//!
//! ## One-Shot Sessions
//!
//! Nothing is persisted between invocations. `summary` and `report` build a
//! fresh session from `--done` keys and `--chapter-complete` chapters:
//!
//! ```bash
//! dpdp summary --done ch2-4 --done ch2-5 --chapter-complete ch5
//! dpdp report --chapter-complete ch1 --output DPDP_Audit_Report.txt
//! ```

pub mod catalog;
pub mod report;
pub mod session;
pub mod show;
pub mod summary;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};

use dpdp_core::Catalog;

/// Load the catalog named by `--catalog`, or the embedded reference catalog.
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("failed to load catalog {}", path.display())),
        None => Catalog::reference().context("embedded reference catalog is invalid"),
    }
}
