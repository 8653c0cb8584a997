//! # Catalog API
//!
//! Browses the loaded catalog. Listing omits guidance text; a single
//! section returns its overview and numbered audit procedure.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use dpdp_core::{Chapter, RiskLevel, Section, SectionKey};

use crate::error::AppError;
use crate::state::AppState;

/// Catalog listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogResponse {
    pub name: String,
    pub citation: Option<String>,
    pub compliance_deadline: Option<NaiveDate>,
    pub version: Option<String>,
    pub chapter_count: usize,
    pub section_count: usize,
    pub chapters: Vec<ChapterView>,
}

/// One chapter in the listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChapterView {
    pub id: String,
    pub title: String,
    /// Number of high-risk sections.
    pub high_risk: usize,
    pub sections: Vec<SectionView>,
}

/// One section in the listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct SectionView {
    /// Section key, `chapterId-number`.
    pub key: String,
    pub number: String,
    pub title: String,
    #[schema(value_type = String, example = "high")]
    pub risk: RiskLevel,
    /// Display badge, e.g. "High Risk".
    pub badge: String,
}

/// Audit guidance for one section.
#[derive(Debug, Serialize, ToSchema)]
pub struct SectionGuidance {
    pub key: String,
    pub chapter_id: String,
    pub chapter_title: String,
    pub number: String,
    pub title: String,
    #[schema(value_type = String, example = "high")]
    pub risk: RiskLevel,
    pub badge: String,
    pub overview: String,
    pub audit_steps: Vec<AuditStep>,
}

/// One step of an audit procedure, numbered from 1.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuditStep {
    pub step: usize,
    pub text: String,
}

impl SectionView {
    fn new(chapter: &Chapter, section: &Section) -> Self {
        Self {
            key: SectionKey::new(chapter.id.as_str(), section.number.as_str()).to_string(),
            number: section.number.clone(),
            title: section.title.clone(),
            risk: section.risk,
            badge: section.risk.badge().to_string(),
        }
    }
}

/// Build the catalog router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/catalog", get(get_catalog))
        .route(
            "/v1/catalog/chapters/{chapter_id}/sections/{number}",
            get(get_section),
        )
}

/// GET /v1/catalog — Chapters and sections without guidance text.
#[utoipa::path(
    get,
    path = "/v1/catalog",
    responses(
        (status = 200, description = "Catalog listing", body = CatalogResponse),
    ),
    tag = "catalog"
)]
pub async fn get_catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    let catalog = &state.catalog;
    let meta = catalog.metadata();
    Json(CatalogResponse {
        name: meta.name.clone(),
        citation: meta.citation.clone(),
        compliance_deadline: meta.compliance_deadline,
        version: meta.version.clone(),
        chapter_count: catalog.chapter_count(),
        section_count: catalog.section_count(),
        chapters: catalog
            .chapters()
            .iter()
            .map(|chapter| ChapterView {
                id: chapter.id.clone(),
                title: chapter.title.clone(),
                high_risk: chapter.count_by_risk(RiskLevel::High),
                sections: chapter
                    .sections
                    .iter()
                    .map(|s| SectionView::new(chapter, s))
                    .collect(),
            })
            .collect(),
    })
}

/// GET /v1/catalog/chapters/{chapter_id}/sections/{number} — Audit guidance.
#[utoipa::path(
    get,
    path = "/v1/catalog/chapters/{chapter_id}/sections/{number}",
    params(
        ("chapter_id" = String, Path, description = "Chapter ID"),
        ("number" = String, Path, description = "Section number"),
    ),
    responses(
        (status = 200, description = "Section guidance", body = SectionGuidance),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "catalog"
)]
pub async fn get_section(
    State(state): State<AppState>,
    Path((chapter_id, number)): Path<(String, String)>,
) -> Result<Json<SectionGuidance>, AppError> {
    let chapter = state
        .catalog
        .chapter(&chapter_id)
        .ok_or_else(|| AppError::NotFound(format!("chapter {chapter_id:?} not found")))?;
    let section = chapter.section(&number).ok_or_else(|| {
        AppError::NotFound(format!("section {number:?} not found in chapter {chapter_id:?}"))
    })?;

    Ok(Json(SectionGuidance {
        key: SectionKey::new(chapter.id.as_str(), section.number.as_str()).to_string(),
        chapter_id: chapter.id.clone(),
        chapter_title: chapter.title.clone(),
        number: section.number.clone(),
        title: section.title.clone(),
        risk: section.risk,
        badge: section.risk.badge().to_string(),
        overview: section.overview.clone(),
        audit_steps: section
            .audit_steps
            .iter()
            .enumerate()
            .map(|(i, text)| AuditStep {
                step: i + 1,
                text: text.clone(),
            })
            .collect(),
    }))
}
