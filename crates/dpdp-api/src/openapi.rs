//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "DPDP Audit API",
        version = "0.1.0",
        description = "Section-by-section audit checklist for the Digital Personal Data Protection Act, 2023: catalog, sessions, progress, and report export.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        // Catalog
        crate::routes::catalog::get_catalog,
        crate::routes::catalog::get_section,
        // Sessions
        crate::routes::sessions::create_session,
        crate::routes::sessions::get_session,
        crate::routes::sessions::delete_session,
        crate::routes::sessions::toggle_section,
        crate::routes::sessions::set_chapter_complete,
        crate::routes::sessions::reset_session,
        crate::routes::sessions::get_stats,
        crate::routes::sessions::get_risk_breakdown,
        crate::routes::sessions::download_report,
    ),
    components(schemas(
        crate::state::SessionRecord,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::catalog::CatalogResponse,
        crate::routes::catalog::ChapterView,
        crate::routes::catalog::SectionView,
        crate::routes::catalog::SectionGuidance,
        crate::routes::catalog::AuditStep,
        crate::routes::sessions::SetChapterRequest,
        crate::routes::sessions::ActionResponse,
        crate::routes::sessions::StatsResponse,
        crate::routes::sessions::RiskResponse,
    )),
    tags(
        (name = "catalog", description = "Checklist catalog and audit guidance"),
        (name = "sessions", description = "Audit sessions, progress, and reports"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
