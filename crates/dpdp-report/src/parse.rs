//! Report parsing and verification.
//!
//! [`parse_report`] recovers the structure of an exported report: chapter
//! titles and, per section line, the completion marker, number, title, and
//! risk level. [`verify_report`] checks a parsed report against a catalog
//! and returns the completion flags it encodes.

use std::collections::BTreeMap;

use thiserror::Error;

use dpdp_core::{Catalog, RiskLevel, SectionKey};

use crate::generate::{CHAPTER_RULE, DONE_MARKER, GENERATED_SEPARATOR, HEADER_RULE, PENDING_MARKER};

/// Errors raised while parsing or verifying a report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// The first two lines are not a report header and rule.
    #[error("missing report header")]
    MissingHeader,

    /// A line that fits nowhere in the format.
    #[error("malformed report line {line_no}: {content:?}")]
    MalformedLine {
        /// 1-based line number.
        line_no: usize,
        /// The offending line.
        content: String,
    },

    /// The report disagrees with the catalog.
    #[error("report does not match catalog: {0}")]
    CatalogMismatch(String),
}

/// One section line of a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    /// Marked audited.
    pub done: bool,
    /// Section number.
    pub number: String,
    /// Section title.
    pub title: String,
    /// Risk level.
    pub risk: RiskLevel,
}

/// One chapter block of a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedChapter {
    /// Chapter title.
    pub title: String,
    /// Section lines in report order.
    pub entries: Vec<ReportEntry>,
}

/// A parsed report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReport {
    /// Header text before the generation time (e.g. `DPDP Act 2023 — Audit Report`).
    pub title: String,
    /// Generation time as printed.
    pub generated: String,
    /// Chapter blocks in report order.
    pub chapters: Vec<ParsedChapter>,
}

impl ParsedReport {
    /// All section lines, in report order.
    pub fn entries(&self) -> impl Iterator<Item = &ReportEntry> {
        self.chapters.iter().flat_map(|c| c.entries.iter())
    }
}

/// Parse report text.
pub fn parse_report(text: &str) -> Result<ParsedReport, ReportError> {
    let mut lines = text.split('\n').enumerate().map(|(i, l)| (i + 1, l));

    let (title, generated) = lines
        .next()
        .and_then(|(_, l)| l.rsplit_once(GENERATED_SEPARATOR))
        .ok_or(ReportError::MissingHeader)?;
    match lines.next() {
        Some((_, rule)) if rule == HEADER_RULE => {}
        _ => return Err(ReportError::MissingHeader),
    }

    let mut chapters: Vec<ParsedChapter> = Vec::new();
    while let Some((line_no, line)) = lines.next() {
        if line.is_empty() {
            let (_, chapter_title) = lines.next().ok_or_else(|| malformed(line_no, line))?;
            match lines.next() {
                Some((_, rule)) if rule == CHAPTER_RULE => {}
                Some((n, other)) => return Err(malformed(n, other)),
                None => return Err(malformed(line_no + 1, chapter_title)),
            }
            chapters.push(ParsedChapter {
                title: chapter_title.to_string(),
                entries: Vec::new(),
            });
            continue;
        }

        let entry = parse_entry(line).ok_or_else(|| malformed(line_no, line))?;
        chapters
            .last_mut()
            .ok_or_else(|| malformed(line_no, line))?
            .entries
            .push(entry);
    }

    Ok(ParsedReport {
        title: title.to_string(),
        generated: generated.to_string(),
        chapters,
    })
}

/// Check a parsed report against a catalog and return the flags it encodes.
///
/// Chapters must appear in catalog order with catalog titles, and each
/// chapter's section lines must match its sections' `(number, title, risk)`
/// in order.
pub fn verify_report(
    catalog: &Catalog,
    report: &ParsedReport,
) -> Result<BTreeMap<SectionKey, bool>, ReportError> {
    if report.chapters.len() != catalog.chapter_count() {
        return Err(ReportError::CatalogMismatch(format!(
            "expected {} chapters, found {}",
            catalog.chapter_count(),
            report.chapters.len()
        )));
    }

    let mut flags = BTreeMap::new();
    for (chapter, parsed) in catalog.chapters().iter().zip(&report.chapters) {
        if chapter.title != parsed.title {
            return Err(ReportError::CatalogMismatch(format!(
                "expected chapter {:?}, found {:?}",
                chapter.title, parsed.title
            )));
        }
        if chapter.sections.len() != parsed.entries.len() {
            return Err(ReportError::CatalogMismatch(format!(
                "chapter {:?}: expected {} sections, found {}",
                chapter.id,
                chapter.sections.len(),
                parsed.entries.len()
            )));
        }
        for (section, entry) in chapter.sections.iter().zip(&parsed.entries) {
            if section.number != entry.number || section.title != entry.title || section.risk != entry.risk {
                return Err(ReportError::CatalogMismatch(format!(
                    "chapter {:?}: expected § {} {:?} ({}), found § {} {:?} ({})",
                    chapter.id,
                    section.number,
                    section.title,
                    section.risk,
                    entry.number,
                    entry.title,
                    entry.risk
                )));
            }
            flags.insert(SectionKey::new(chapter.id.as_str(), section.number.as_str()), entry.done);
        }
    }
    Ok(flags)
}

/// `  [{marker}] § {number} — {title}  ({RISK} RISK)`
fn parse_entry(line: &str) -> Option<ReportEntry> {
    let rest = line.strip_prefix("  [")?;
    let (marker, rest) = rest.split_once("] § ")?;
    let done = match marker {
        DONE_MARKER => true,
        PENDING_MARKER => false,
        _ => return None,
    };
    // Numbers never contain " — "; titles may.
    let (number, rest) = rest.split_once(" — ")?;
    let (title, risk) = rest.rsplit_once("  (")?;
    let risk = RiskLevel::from_upper(risk.strip_suffix(" RISK)")?).ok()?;
    Some(ReportEntry {
        done,
        number: number.to_string(),
        title: title.to_string(),
        risk,
    })
}

fn malformed(line_no: usize, content: &str) -> ReportError {
    ReportError::MalformedLine {
        line_no,
        content: content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::generate_report;
    use dpdp_core::Timestamp;
    use dpdp_state::CompletionState;

    fn ts() -> Timestamp {
        Timestamp::parse("2026-10-19T08:00:00Z").unwrap()
    }

    #[test]
    fn test_parse_entry_with_em_dash_title() {
        let entry = parse_entry("  [✅ DONE] § 31 — Penalties — Schedule  (HIGH RISK)").unwrap();
        assert!(entry.done);
        assert_eq!(entry.number, "31");
        assert_eq!(entry.title, "Penalties — Schedule");
        assert_eq!(entry.risk, RiskLevel::High);
    }

    #[test]
    fn test_parse_entry_rejects_noise() {
        assert!(parse_entry("  [✅ OK] § 1 — One  (LOW RISK)").is_none());
        assert!(parse_entry("  [⬜ PENDING] § 1 — One  (SEVERE RISK)").is_none());
        assert!(parse_entry("§ 1 — One  (LOW RISK)").is_none());
    }

    #[test]
    fn test_parse_reference_report() {
        let catalog = Catalog::reference().unwrap();
        let mut state = CompletionState::initialize(&catalog);
        state.set_all("ch3", true).unwrap();
        let text = generate_report(&catalog, &state, &ts());

        let parsed = parse_report(&text).unwrap();
        assert_eq!(parsed.title, "DPDP Act 2023 — Audit Report");
        assert_eq!(parsed.generated, "19 Oct 2026 08:00");
        assert_eq!(parsed.chapters.len(), 9);
        assert_eq!(parsed.entries().count(), 44);
        assert_eq!(parsed.entries().filter(|e| e.done).count(), 5);

        let flags = verify_report(&catalog, &parsed).unwrap();
        assert_eq!(&flags, state.flags());
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(parse_report(""), Err(ReportError::MissingHeader));
        assert_eq!(
            parse_report("DPDP — Audit Report | Generated: now\n---"),
            Err(ReportError::MissingHeader)
        );
    }

    #[test]
    fn test_entry_before_chapter_is_malformed() {
        let text = format!(
            "T | Generated: now\n{HEADER_RULE}\n  [✅ DONE] § 1 — One  (LOW RISK)"
        );
        assert!(matches!(
            parse_report(&text),
            Err(ReportError::MalformedLine { line_no: 3, .. })
        ));
    }

    #[test]
    fn test_verify_detects_tampering() {
        let catalog = Catalog::reference().unwrap();
        let state = CompletionState::initialize(&catalog);
        let text = generate_report(&catalog, &state, &ts()).replace("(HIGH RISK)", "(LOW RISK)");
        let parsed = parse_report(&text).unwrap();
        assert!(matches!(
            verify_report(&catalog, &parsed),
            Err(ReportError::CatalogMismatch(_))
        ));
    }
}
