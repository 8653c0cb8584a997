//! # Checklist Catalog
//!
//! The immutable, ordered dataset of chapters and sections. One catalog is
//! loaded per process and shared read-only by every session.
//!
//! ## Integrity Invariants
//!
//! Enforced by [`Catalog::new()`], which every loader and the serde
//! deserializer go through:
//!
//! - chapter ids are unique, non-empty, and contain no `-`;
//! - section numbers are non-empty and unique across the whole catalog, so
//!   every `(chapter_id, number)` key is unique;
//! - every chapter has at least one section;
//! - every section has at least one audit step.
//!
//! Order is meaningful throughout: chapters, sections within a chapter, and
//! audit steps within a section are displayed and reported in file order.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::key::{SectionKey, KEY_SEPARATOR};
use crate::risk::RiskLevel;

/// The reference edition: DPDP Act 2023, 44 sections in 9 chapters.
pub const REFERENCE_CATALOG_YAML: &str = include_str!("../data/dpdp_act_2023.yaml");

// ─── Section ─────────────────────────────────────────────────────────

/// One statutory section and its audit guidance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Section number, unique across the catalog (e.g. `"6"`).
    pub number: String,
    /// Short name of the provision.
    pub title: String,
    /// Fixed risk classification.
    pub risk: RiskLevel,
    /// Description of the statutory provision.
    pub overview: String,
    /// Ordered audit procedure.
    pub audit_steps: Vec<String>,
}

impl Section {
    /// Display label, e.g. `§ 6 — Consent`.
    pub fn label(&self) -> String {
        format!("§ {} — {}", self.number, self.title)
    }
}

// ─── Chapter ─────────────────────────────────────────────────────────

/// An ordered group of sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Chapter identifier (e.g. `"ch2"`).
    pub id: String,
    /// Human-readable chapter name.
    pub title: String,
    /// Sections in display order. Never empty.
    pub sections: Vec<Section>,
}

impl Chapter {
    /// Look up a section of this chapter by number.
    pub fn section(&self, number: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.number == number)
    }

    /// Keys of this chapter's sections, in display order.
    pub fn keys(&self) -> impl Iterator<Item = SectionKey> + '_ {
        self.sections
            .iter()
            .map(move |s| SectionKey::new(self.id.as_str(), s.number.as_str()))
    }

    /// Number of sections carrying the given risk level.
    pub fn count_by_risk(&self, risk: RiskLevel) -> usize {
        self.sections.iter().filter(|s| s.risk == risk).count()
    }
}

// ─── Catalog ─────────────────────────────────────────────────────────

/// Descriptive metadata for a catalog edition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogMetadata {
    /// Short name of the statute, used as the report title.
    pub name: String,
    /// Official citation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation: Option<String>,
    /// Date by which full compliance is required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_deadline: Option<NaiveDate>,
    /// Edition of the checklist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Unvalidated catalog document as it appears on disk.
#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(flatten)]
    metadata: CatalogMetadata,
    chapters: Vec<Chapter>,
}

impl TryFrom<CatalogDocument> for Catalog {
    type Error = CatalogError;

    fn try_from(doc: CatalogDocument) -> Result<Self, Self::Error> {
        Catalog::new(doc.metadata, doc.chapters)
    }
}

/// The validated checklist catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CatalogDocument")]
pub struct Catalog {
    #[serde(flatten)]
    metadata: CatalogMetadata,
    chapters: Vec<Chapter>,
}

impl Catalog {
    /// Build a catalog, enforcing every integrity invariant.
    ///
    /// An empty chapter list is accepted; aggregation over an empty catalog
    /// is defined (all counts zero).
    pub fn new(metadata: CatalogMetadata, chapters: Vec<Chapter>) -> Result<Self, CatalogError> {
        validate_title(&metadata.name)?;
        let mut chapter_ids: HashSet<&str> = HashSet::new();
        let mut section_owner: HashMap<&str, &str> = HashMap::new();

        for chapter in &chapters {
            validate_identifier(&chapter.id)?;
            if chapter.id.contains(KEY_SEPARATOR) {
                return Err(CatalogError::InvalidIdentifier {
                    value: chapter.id.clone(),
                    reason: format!("chapter ids must not contain {KEY_SEPARATOR:?}"),
                });
            }
            if !chapter_ids.insert(chapter.id.as_str()) {
                return Err(CatalogError::DuplicateChapter {
                    chapter_id: chapter.id.clone(),
                });
            }
            validate_title(&chapter.title)?;
            if chapter.sections.is_empty() {
                return Err(CatalogError::EmptyChapter {
                    chapter_id: chapter.id.clone(),
                });
            }

            for section in &chapter.sections {
                validate_identifier(&section.number)?;
                validate_title(&section.title)?;
                if let Some(first) = section_owner.insert(&section.number, &chapter.id) {
                    return Err(CatalogError::DuplicateSection {
                        chapter_id: chapter.id.clone(),
                        number: section.number.clone(),
                        first_chapter_id: first.to_string(),
                    });
                }
                if section.audit_steps.is_empty() {
                    return Err(CatalogError::MissingAuditSteps {
                        chapter_id: chapter.id.clone(),
                        number: section.number.clone(),
                    });
                }
            }
        }

        Ok(Self { metadata, chapters })
    }

    /// Load the embedded reference edition.
    pub fn reference() -> Result<Self, CatalogError> {
        Self::from_yaml_str(REFERENCE_CATALOG_YAML)
    }

    /// Parse and validate a catalog from a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_yaml::from_str(yaml)?;
        tracing::debug!(
            name = %catalog.metadata.name,
            chapters = catalog.chapter_count(),
            sections = catalog.section_count(),
            "catalog parsed"
        );
        Ok(catalog)
    }

    /// Read, parse, and validate a catalog file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CatalogError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                CatalogError::Io(e)
            }
        })?;
        let catalog: Catalog =
            serde_yaml::from_str(&content).map_err(|e| CatalogError::YamlParse {
                path: path.to_path_buf(),
                source: e,
            })?;
        tracing::info!(
            path = %path.display(),
            chapters = catalog.chapter_count(),
            sections = catalog.section_count(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Edition metadata.
    pub fn metadata(&self) -> &CatalogMetadata {
        &self.metadata
    }

    /// Chapters in display order.
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    /// Look up a chapter by id.
    pub fn chapter(&self, chapter_id: &str) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.id == chapter_id)
    }

    /// Look up a section by its composite key.
    pub fn section(&self, key: &SectionKey) -> Option<&Section> {
        self.chapter(key.chapter_id())?.section(key.number())
    }

    /// Whether the key names a section of this catalog.
    pub fn contains(&self, key: &SectionKey) -> bool {
        self.section(key).is_some()
    }

    /// Every section key, in catalog order.
    pub fn keys(&self) -> impl Iterator<Item = SectionKey> + '_ {
        self.chapters.iter().flat_map(Chapter::keys)
    }

    /// Every `(chapter, section)` pair, in catalog order.
    pub fn sections(&self) -> impl Iterator<Item = (&Chapter, &Section)> {
        self.chapters
            .iter()
            .flat_map(|c| c.sections.iter().map(move |s| (c, s)))
    }

    /// Number of chapters.
    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    /// Number of sections across all chapters.
    pub fn section_count(&self) -> usize {
        self.chapters.iter().map(|c| c.sections.len()).sum()
    }
}

fn validate_identifier(value: &str) -> Result<(), CatalogError> {
    if value.trim().is_empty() {
        return Err(CatalogError::InvalidIdentifier {
            value: value.to_string(),
            reason: "identifier must not be empty".to_string(),
        });
    }
    if value.chars().any(char::is_whitespace) {
        return Err(CatalogError::InvalidIdentifier {
            value: value.to_string(),
            reason: "identifier must not contain whitespace".to_string(),
        });
    }
    Ok(())
}

/// Names and titles are printed one per report line.
fn validate_title(value: &str) -> Result<(), CatalogError> {
    if value.contains(['\n', '\r']) {
        return Err(CatalogError::InvalidTitle {
            value: value.to_string(),
            reason: "titles must not contain line breaks".to_string(),
        });
    }
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn section(number: &str, risk: RiskLevel) -> Section {
        Section {
            number: number.to_string(),
            title: format!("Section {number}"),
            risk,
            overview: "overview".to_string(),
            audit_steps: vec!["step one".to_string()],
        }
    }

    fn chapter(id: &str, sections: Vec<Section>) -> Chapter {
        Chapter {
            id: id.to_string(),
            title: format!("Chapter {id}"),
            sections,
        }
    }

    fn metadata() -> CatalogMetadata {
        CatalogMetadata {
            name: "Test Act".to_string(),
            citation: None,
            compliance_deadline: None,
            version: None,
        }
    }

    #[test]
    fn test_reference_catalog_loads() {
        let catalog = Catalog::reference().unwrap();
        assert_eq!(catalog.chapter_count(), 9);
        assert_eq!(catalog.section_count(), 44);
        assert_eq!(catalog.metadata().name, "DPDP Act 2023");
        assert_eq!(
            catalog.metadata().compliance_deadline,
            NaiveDate::from_ymd_opt(2027, 5, 13)
        );
    }

    #[test]
    fn test_reference_catalog_order_and_content() {
        let catalog = Catalog::reference().unwrap();
        let numbers: Vec<String> = catalog.sections().map(|(_, s)| s.number.clone()).collect();
        let expected: Vec<String> = (1..=44).map(|n| n.to_string()).collect();
        assert_eq!(numbers, expected);

        let ch2 = catalog.chapter("ch2").unwrap();
        assert_eq!(ch2.sections.len(), 8);
        assert_eq!(ch2.count_by_risk(RiskLevel::High), 6);

        let consent = catalog.section(&SectionKey::new("ch2", "6")).unwrap();
        assert_eq!(consent.title, "Consent");
        assert_eq!(consent.risk, RiskLevel::High);
        assert_eq!(consent.audit_steps.len(), 4);
        assert_eq!(consent.label(), "§ 6 — Consent");
    }

    #[test]
    fn test_keys_follow_catalog_order() {
        let catalog = Catalog::new(
            metadata(),
            vec![
                chapter("a", vec![section("2", RiskLevel::High), section("1", RiskLevel::Low)]),
                chapter("b", vec![section("3", RiskLevel::Medium)]),
            ],
        )
        .unwrap();
        let keys: Vec<String> = catalog.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["a-2", "a-1", "b-3"]);
        assert!(catalog.contains(&SectionKey::new("b", "3")));
        assert!(!catalog.contains(&SectionKey::new("a", "3")));
    }

    #[test]
    fn test_empty_catalog_is_valid() {
        let catalog = Catalog::new(metadata(), Vec::new()).unwrap();
        assert_eq!(catalog.section_count(), 0);
        assert_eq!(catalog.keys().count(), 0);
    }

    #[test]
    fn test_duplicate_section_number_rejected() {
        let result = Catalog::new(
            metadata(),
            vec![
                chapter("a", vec![section("1", RiskLevel::High)]),
                chapter("b", vec![section("1", RiskLevel::Low)]),
            ],
        );
        assert!(matches!(result, Err(CatalogError::DuplicateSection { .. })));
    }

    #[test]
    fn test_duplicate_key_within_chapter_rejected() {
        let result = Catalog::new(
            metadata(),
            vec![chapter(
                "a",
                vec![section("1", RiskLevel::High), section("1", RiskLevel::High)],
            )],
        );
        assert!(matches!(result, Err(CatalogError::DuplicateSection { .. })));
    }

    #[test]
    fn test_duplicate_chapter_rejected() {
        let result = Catalog::new(
            metadata(),
            vec![
                chapter("a", vec![section("1", RiskLevel::High)]),
                chapter("a", vec![section("2", RiskLevel::Low)]),
            ],
        );
        assert!(matches!(result, Err(CatalogError::DuplicateChapter { .. })));
    }

    #[test]
    fn test_empty_chapter_rejected() {
        let result = Catalog::new(metadata(), vec![chapter("a", Vec::new())]);
        assert!(matches!(result, Err(CatalogError::EmptyChapter { .. })));
    }

    #[test]
    fn test_missing_audit_steps_rejected() {
        let mut s = section("1", RiskLevel::Low);
        s.audit_steps.clear();
        let result = Catalog::new(metadata(), vec![chapter("a", vec![s])]);
        assert!(matches!(result, Err(CatalogError::MissingAuditSteps { .. })));
    }

    #[test]
    fn test_dash_in_chapter_id_rejected() {
        let result = Catalog::new(metadata(), vec![chapter("ch-1", vec![section("1", RiskLevel::Low)])]);
        assert!(matches!(result, Err(CatalogError::InvalidIdentifier { .. })));
    }

    #[test]
    fn test_blank_identifiers_rejected() {
        let result = Catalog::new(metadata(), vec![chapter(" ", vec![section("1", RiskLevel::Low)])]);
        assert!(matches!(result, Err(CatalogError::InvalidIdentifier { .. })));

        let result = Catalog::new(metadata(), vec![chapter("a", vec![section("", RiskLevel::Low)])]);
        assert!(matches!(result, Err(CatalogError::InvalidIdentifier { .. })));
    }

    #[test]
    fn test_line_break_in_titles_rejected() {
        let mut s = section("1", RiskLevel::Low);
        s.title = "Line one\nline two".to_string();
        let result = Catalog::new(metadata(), vec![chapter("a", vec![s])]);
        assert!(matches!(result, Err(CatalogError::InvalidTitle { .. })));

        let mut c = chapter("a", vec![section("1", RiskLevel::Low)]);
        c.title = "Chapter A\r".to_string();
        let result = Catalog::new(metadata(), vec![c]);
        assert!(matches!(result, Err(CatalogError::InvalidTitle { .. })));

        let mut meta = metadata();
        meta.name = "Test\nAct".to_string();
        let result = Catalog::new(meta, vec![chapter("a", vec![section("1", RiskLevel::Low)])]);
        assert!(matches!(result, Err(CatalogError::InvalidTitle { .. })));
    }

    #[test]
    fn test_multiline_yaml_title_rejected() {
        let yaml = r#"
name: "Test Act"
chapters:
  - id: "a"
    title: "Chapter A"
    sections:
      - number: "1"
        title: "Line one\nline two"
        risk: low
        overview: "o"
        audit_steps: ["s"]
"#;
        let err = Catalog::from_yaml_str(yaml).unwrap_err();
        assert!(err.to_string().contains("line breaks"), "{err}");
    }

    #[test]
    fn test_yaml_deserialization_validates() {
        let yaml = r#"
name: "Broken"
chapters:
  - id: "a"
    title: "A"
    sections: []
"#;
        let err = Catalog::from_yaml_str(yaml).unwrap_err();
        assert!(err.to_string().contains("has no sections"), "{err}");
    }

    #[test]
    fn test_unknown_risk_rejected() {
        let yaml = r#"
name: "Broken"
chapters:
  - id: "a"
    title: "A"
    sections:
      - number: "1"
        title: "One"
        risk: critical
        overview: "x"
        audit_steps: ["y"]
"#;
        assert!(Catalog::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.yaml");
        std::fs::write(&path, REFERENCE_CATALOG_YAML).unwrap();
        let catalog = Catalog::load(&path).unwrap();
        assert_eq!(catalog, Catalog::reference().unwrap());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Catalog::load(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, CatalogError::FileNotFound { .. }));
    }

    #[test]
    fn test_serde_roundtrip_preserves_order() {
        let catalog = Catalog::reference().unwrap();
        let json = serde_json::to_string(&catalog).unwrap();
        let parsed: Catalog = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, catalog);
    }
}
