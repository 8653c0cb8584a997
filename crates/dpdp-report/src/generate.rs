//! Report generation.

use dpdp_core::{Catalog, Timestamp};
use dpdp_state::CompletionState;

/// Download file name of the exported report.
pub const REPORT_FILENAME: &str = "DPDP_Audit_Report.txt";

/// Content type of the exported report.
pub const REPORT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Marker of an audited section.
pub const DONE_MARKER: &str = "✅ DONE";

/// Marker of a section not yet audited.
pub const PENDING_MARKER: &str = "⬜ PENDING";

/// Rule under the report header (70 `=`).
pub const HEADER_RULE: &str =
    "======================================================================";

/// Rule under each chapter title (50 `-`).
pub const CHAPTER_RULE: &str = "--------------------------------------------------";

/// Separator between report title and generation time in the header.
pub(crate) const GENERATED_SEPARATOR: &str = " | Generated: ";

/// Render the report.
///
/// Deterministic: identical inputs produce identical text. The only time
/// source is `generated_at`.
pub fn generate_report(catalog: &Catalog, state: &CompletionState, generated_at: &Timestamp) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(2 + catalog.chapter_count() * 3 + catalog.section_count());
    lines.push(format!(
        "{} — Audit Report{}{}",
        catalog.metadata().name,
        GENERATED_SEPARATOR,
        generated_at.to_report_format()
    ));
    lines.push(HEADER_RULE.to_string());

    for chapter in catalog.chapters() {
        lines.push(String::new());
        lines.push(chapter.title.clone());
        lines.push(CHAPTER_RULE.to_string());
        for (section, key) in chapter.sections.iter().zip(chapter.keys()) {
            let marker = if matches!(state.get(&key), Ok(true)) {
                DONE_MARKER
            } else {
                PENDING_MARKER
            };
            lines.push(format!(
                "  [{marker}] § {} — {}  ({} RISK)",
                section.number,
                section.title,
                section.risk.as_upper()
            ));
        }
    }

    tracing::debug!(
        sections = catalog.section_count(),
        completed = state.completed_count(),
        "report generated"
    );
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpdp_core::SectionKey;

    fn ts() -> Timestamp {
        Timestamp::parse("2027-05-13T09:30:00Z").unwrap()
    }

    #[test]
    fn test_reference_report_layout() {
        let catalog = Catalog::reference().unwrap();
        let mut state = CompletionState::initialize(&catalog);
        state.set(&SectionKey::new("ch1", "1"), true).unwrap();

        let report = generate_report(&catalog, &state, &ts());
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines[0], "DPDP Act 2023 — Audit Report | Generated: 13 May 2027 09:30");
        assert_eq!(lines[1], HEADER_RULE);
        assert_eq!(lines[1].chars().count(), 70);
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "Chapter I — Preliminary");
        assert_eq!(lines[4], CHAPTER_RULE);
        assert_eq!(lines[4].chars().count(), 50);
        assert_eq!(
            lines[5],
            "  [✅ DONE] § 1 — Short Title and Commencement  (LOW RISK)"
        );
        assert_eq!(lines[6], "  [⬜ PENDING] § 2 — Definitions  (MEDIUM RISK)");

        // header (2) + per chapter (3) + per section (1)
        assert_eq!(lines.len(), 2 + 9 * 3 + 44);
        assert!(!report.ends_with('\n'));
    }

    #[test]
    fn test_deterministic() {
        let catalog = Catalog::reference().unwrap();
        let state = CompletionState::initialize(&catalog);
        assert_eq!(
            generate_report(&catalog, &state, &ts()),
            generate_report(&catalog, &state, &ts())
        );
    }

    #[test]
    fn test_em_dash_titles_are_kept() {
        let catalog = Catalog::reference().unwrap();
        let state = CompletionState::initialize(&catalog);
        let report = generate_report(&catalog, &state, &ts());
        assert!(report.contains("  [⬜ PENDING] § 31 — Penalties — Schedule  (HIGH RISK)"));
    }
}
