//! # Aggregator
//!
//! Pure, read-only derivations over `(catalog, state)`.
//!
//! Percentages use exact integer arithmetic with round-half-to-even:
//! whole percent at chapter granularity, one decimal for the overall figure.
//! Half-even matches how the checklist has always displayed progress
//! (a chapter at 1/8 reads 12%, not 13%).

use serde::Serialize;

use dpdp_core::{Catalog, Chapter, RiskLevel, SectionKey};

use crate::completion::{CompletionState, StateError};

// ─── Result Types ────────────────────────────────────────────────────

/// Whole-checklist progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverallStats {
    /// Sections in the catalog.
    pub total: usize,
    /// Sections marked audited.
    pub completed: usize,
    /// `total - completed`.
    pub pending: usize,
    /// Percent complete, one decimal; `0.0` for an empty catalog.
    pub percent_complete: f64,
}

/// Progress of one chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterStats {
    /// Chapter id.
    pub chapter_id: String,
    /// Sections in the chapter.
    pub total: usize,
    /// Sections marked audited.
    pub completed: usize,
    /// `total - completed`.
    pub pending: usize,
    /// Whole percent complete.
    pub percent: u32,
    /// Every section audited (and the chapter is non-empty).
    pub all_done: bool,
}

impl ChapterStats {
    /// Compact progress label, e.g. `[3/8]`.
    pub fn progress_label(&self) -> String {
        format!("[{}/{}]", self.completed, self.total)
    }
}

/// Completion of the sections of one risk level within a chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskBreakdown {
    /// The risk level counted.
    pub risk: RiskLevel,
    /// Sections of this level in the chapter.
    pub total: usize,
    /// Of those, how many are audited.
    pub completed: usize,
}

/// One row of the per-chapter compliance summary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterSummary {
    /// Chapter id.
    pub chapter_id: String,
    /// Chapter title.
    pub title: String,
    /// Sections in the chapter.
    pub total: usize,
    /// Sections marked audited.
    pub completed: usize,
    /// `total - completed`.
    pub pending: usize,
    /// High-risk sections in the chapter.
    pub high_risk: usize,
    /// High-risk sections marked audited.
    pub high_risk_done: usize,
    /// Whole percent complete.
    pub progress: u32,
}

// ─── Aggregations ────────────────────────────────────────────────────

/// Progress across the whole catalog.
pub fn overall_stats(catalog: &Catalog, state: &CompletionState) -> OverallStats {
    let total = catalog.section_count();
    let completed = catalog.keys().filter(|k| is_done(state, k)).count();
    let percent_complete = if total == 0 {
        0.0
    } else {
        round_half_even(1000 * completed as u64, total as u64) as f64 / 10.0
    };
    OverallStats {
        total,
        completed,
        pending: total - completed,
        percent_complete,
    }
}

/// Progress of one chapter.
pub fn chapter_stats(
    catalog: &Catalog,
    state: &CompletionState,
    chapter_id: &str,
) -> Result<ChapterStats, StateError> {
    let chapter = find_chapter(catalog, chapter_id)?;
    Ok(stats_for(chapter, state))
}

/// Completion of the `risk` sections of one chapter.
pub fn risk_breakdown(
    catalog: &Catalog,
    state: &CompletionState,
    chapter_id: &str,
    risk: RiskLevel,
) -> Result<RiskBreakdown, StateError> {
    let chapter = find_chapter(catalog, chapter_id)?;
    let (total, completed) = count_risk(chapter, state, risk);
    Ok(RiskBreakdown {
        risk,
        total,
        completed,
    })
}

/// The per-chapter summary table, in catalog order.
pub fn chapter_summary(catalog: &Catalog, state: &CompletionState) -> Vec<ChapterSummary> {
    catalog
        .chapters()
        .iter()
        .map(|chapter| {
            let stats = stats_for(chapter, state);
            let (high_risk, high_risk_done) = count_risk(chapter, state, RiskLevel::High);
            ChapterSummary {
                chapter_id: stats.chapter_id,
                title: chapter.title.clone(),
                total: stats.total,
                completed: stats.completed,
                pending: stats.pending,
                high_risk,
                high_risk_done,
                progress: stats.percent,
            }
        })
        .collect()
}

// ─── Helpers ─────────────────────────────────────────────────────────

fn find_chapter<'c>(catalog: &'c Catalog, chapter_id: &str) -> Result<&'c Chapter, StateError> {
    catalog
        .chapter(chapter_id)
        .ok_or_else(|| StateError::UnknownChapter {
            chapter_id: chapter_id.to_string(),
        })
}

fn stats_for(chapter: &Chapter, state: &CompletionState) -> ChapterStats {
    let total = chapter.sections.len();
    let completed = chapter.keys().filter(|k| is_done(state, k)).count();
    let percent = if total == 0 {
        0
    } else {
        round_half_even(100 * completed as u64, total as u64) as u32
    };
    ChapterStats {
        chapter_id: chapter.id.clone(),
        total,
        completed,
        pending: total - completed,
        percent,
        all_done: total > 0 && completed == total,
    }
}

fn count_risk(chapter: &Chapter, state: &CompletionState, risk: RiskLevel) -> (usize, usize) {
    chapter
        .sections
        .iter()
        .filter(|s| s.risk == risk)
        .fold((0, 0), |(total, done), s| {
            let key = SectionKey::new(chapter.id.as_str(), s.number.as_str());
            (total + 1, done + usize::from(is_done(state, &key)))
        })
}

fn is_done(state: &CompletionState, key: &SectionKey) -> bool {
    matches!(state.get(key), Ok(true))
}

/// `numer / denom` rounded to the nearest integer, ties to even.
fn round_half_even(numer: u64, denom: u64) -> u64 {
    let quotient = numer / denom;
    let twice_remainder = 2 * (numer % denom);
    if twice_remainder > denom || (twice_remainder == denom && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use dpdp_core::{CatalogMetadata, Section};

    fn section(number: &str, risk: RiskLevel) -> Section {
        Section {
            number: number.to_string(),
            title: format!("Section {number}"),
            risk,
            overview: "overview".to_string(),
            audit_steps: vec!["step".to_string()],
        }
    }

    fn catalog_of(chapters: Vec<(&str, Vec<Section>)>) -> Catalog {
        Catalog::new(
            CatalogMetadata {
                name: "Test Act".to_string(),
                citation: None,
                compliance_deadline: None,
                version: None,
            },
            chapters
                .into_iter()
                .map(|(id, sections)| Chapter {
                    id: id.to_string(),
                    title: format!("Chapter {id}"),
                    sections,
                })
                .collect(),
        )
        .unwrap()
    }

    /// Chapter A: §1 high, §2 low. Chapter B: §3 medium.
    fn small_catalog() -> Catalog {
        catalog_of(vec![
            ("A", vec![section("1", RiskLevel::High), section("2", RiskLevel::Low)]),
            ("B", vec![section("3", RiskLevel::Medium)]),
        ])
    }

    #[test]
    fn test_initial_overall() {
        let catalog = small_catalog();
        let state = CompletionState::initialize(&catalog);
        let stats = overall_stats(&catalog, &state);
        assert_eq!((stats.total, stats.completed, stats.pending), (3, 0, 3));
        assert_eq!(stats.percent_complete, 0.0);
    }

    #[test]
    fn test_after_high_risk_toggle() {
        let catalog = small_catalog();
        let mut state = CompletionState::initialize(&catalog);
        state.set(&SectionKey::new("A", "1"), true).unwrap();

        let overall = overall_stats(&catalog, &state);
        assert_eq!((overall.total, overall.completed, overall.pending), (3, 1, 2));
        assert_eq!(overall.percent_complete, 33.3);

        let a = chapter_stats(&catalog, &state, "A").unwrap();
        assert_eq!(
            a,
            ChapterStats {
                chapter_id: "A".to_string(),
                total: 2,
                completed: 1,
                pending: 1,
                percent: 50,
                all_done: false,
            }
        );
        assert_eq!(a.progress_label(), "[1/2]");

        let high = risk_breakdown(&catalog, &state, "A", RiskLevel::High).unwrap();
        assert_eq!((high.total, high.completed), (1, 1));
        let medium = risk_breakdown(&catalog, &state, "A", RiskLevel::Medium).unwrap();
        assert_eq!((medium.total, medium.completed), (0, 0));
    }

    #[test]
    fn test_empty_catalog_does_not_divide_by_zero() {
        let catalog = catalog_of(Vec::new());
        let state = CompletionState::initialize(&catalog);
        let stats = overall_stats(&catalog, &state);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.percent_complete, 0.0);
        assert!(chapter_summary(&catalog, &state).is_empty());
    }

    #[test]
    fn test_unknown_chapter() {
        let catalog = small_catalog();
        let state = CompletionState::initialize(&catalog);
        assert!(chapter_stats(&catalog, &state, "Z").is_err());
        assert!(risk_breakdown(&catalog, &state, "Z", RiskLevel::High).is_err());
    }

    #[test]
    fn test_rounding_precision_differs_by_scope() {
        let sections: Vec<Section> = (1..=8)
            .map(|n| section(&n.to_string(), RiskLevel::Low))
            .collect();
        let catalog = catalog_of(vec![("A", sections)]);
        let mut state = CompletionState::initialize(&catalog);
        state.set(&SectionKey::new("A", "1"), true).unwrap();

        // 12.5 exactly: whole-percent ties to even, one decimal keeps it.
        assert_eq!(chapter_stats(&catalog, &state, "A").unwrap().percent, 12);
        assert_eq!(overall_stats(&catalog, &state).percent_complete, 12.5);

        for n in 2..=3 {
            state.set(&SectionKey::new("A", n.to_string()), true).unwrap();
        }
        // 37.5 rounds to 38 (even).
        assert_eq!(chapter_stats(&catalog, &state, "A").unwrap().percent, 38);
    }

    #[test]
    fn test_round_half_even() {
        assert_eq!(round_half_even(1, 2), 0);
        assert_eq!(round_half_even(3, 2), 2);
        assert_eq!(round_half_even(5, 2), 2);
        assert_eq!(round_half_even(2, 3), 1);
        assert_eq!(round_half_even(1, 3), 0);
        assert_eq!(round_half_even(100, 1), 100);
        // 1/16 = 6.25% → 6.2 at one decimal.
        assert_eq!(round_half_even(1000, 16), 62);
    }

    #[test]
    fn test_reference_summary_table() {
        let catalog = Catalog::reference().unwrap();
        let mut state = CompletionState::initialize(&catalog);
        state.set_all("ch2", true).unwrap();

        let summary = chapter_summary(&catalog, &state);
        assert_eq!(summary.len(), 9);
        let ch2 = &summary[1];
        assert_eq!(ch2.chapter_id, "ch2");
        assert_eq!((ch2.total, ch2.completed, ch2.pending), (8, 8, 0));
        assert_eq!((ch2.high_risk, ch2.high_risk_done), (6, 6));
        assert_eq!(ch2.progress, 100);
        assert!(summary.iter().filter(|r| r.chapter_id != "ch2").all(|r| r.completed == 0));

        let overall = overall_stats(&catalog, &state);
        assert_eq!(overall.completed, 8);
        // 8/44 = 18.18…%
        assert_eq!(overall.percent_complete, 18.2);
    }
}
