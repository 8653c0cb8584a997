//! # dpdp-report — Audit Report Export
//!
//! Serializes a catalog and one session's completion state into the
//! plain-text report offered for download, and parses such a report back.
//!
//! ## Format
//!
//! ```text
//! DPDP Act 2023 — Audit Report | Generated: 13 May 2027 09:30
//! ======================================================================
//!
//! Chapter I — Preliminary
//! --------------------------------------------------
//!   [✅ DONE] § 1 — Short Title and Commencement  (LOW RISK)
//!   [⬜ PENDING] § 2 — Definitions  (MEDIUM RISK)
//! ```
//!
//! Every chapter and every section appears exactly once, in catalog order.
//! Lines are joined with `\n`; there is no trailing newline. Generation is a
//! pure function of `(catalog, state, generated_at)`.

pub mod generate;
pub mod parse;

pub use generate::{
    generate_report, CHAPTER_RULE, DONE_MARKER, HEADER_RULE, PENDING_MARKER, REPORT_CONTENT_TYPE,
    REPORT_FILENAME,
};
pub use parse::{parse_report, verify_report, ParsedChapter, ParsedReport, ReportEntry, ReportError};
