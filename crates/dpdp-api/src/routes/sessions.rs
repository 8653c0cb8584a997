//! # Audit Session API
//!
//! Session lifecycle and the three interaction intents. Every intent runs
//! inside [`Store::try_update`](crate::state::Store::try_update), so the
//! read-then-write of a handler and the stats it returns are computed under
//! one write lock.
//!
//! | Route                                                    | Intent          |
//! |----------------------------------------------------------|-----------------|
//! | `POST /v1/sessions/{id}/sections/{chapter_id}/{n}/toggle` | `ToggleSection` |
//! | `PUT  /v1/sessions/{id}/chapters/{chapter_id}/complete`   | `SetChapter`    |
//! | `POST /v1/sessions/{id}/reset`                            | `ResetAll`      |

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use dpdp_core::{Catalog, RiskLevel, SectionKey, Timestamp};
use dpdp_report::{generate_report, REPORT_CONTENT_TYPE, REPORT_FILENAME};
use dpdp_state::{
    apply, chapter_stats, chapter_summary, overall_stats, risk_breakdown, ChapterStats,
    ChapterSummary, CompletionState, Intent, Outcome, OverallStats, Refresh, RiskBreakdown,
    StateError,
};

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::{AppState, SessionRecord};

// -- DTOs ---------------------------------------------------------------------

/// New value of a chapter's "mark all complete" control.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetChapterRequest {
    pub value: bool,
}

/// Result of an intent plus the stats its refresh scope names.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResponse {
    /// `changed` flag and refresh scope.
    #[schema(value_type = Object)]
    pub outcome: Outcome,
    /// Present unless the refresh scope is `nothing`.
    #[schema(value_type = Option<Object>)]
    pub overall: Option<OverallStats>,
    /// The refreshed chapters: none, the affected one, or all.
    #[schema(value_type = Vec<Object>)]
    pub chapters: Vec<ChapterStats>,
}

/// Full statistics of a session.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    #[schema(value_type = Object)]
    pub overall: OverallStats,
    #[schema(value_type = Vec<Object>)]
    pub chapters: Vec<ChapterStats>,
    /// Per-chapter summary table in catalog order.
    #[schema(value_type = Vec<Object>)]
    pub summary: Vec<ChapterSummary>,
}

/// Completion of one chapter's sections at one risk level.
#[derive(Debug, Serialize, ToSchema)]
pub struct RiskResponse {
    pub chapter_id: String,
    #[schema(value_type = Object)]
    pub breakdown: RiskBreakdown,
}

// -- Router -------------------------------------------------------------------

/// Build the sessions router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/sessions", post(create_session))
        .route("/v1/sessions/{id}", get(get_session).delete(delete_session))
        .route(
            "/v1/sessions/{id}/sections/{chapter_id}/{number}/toggle",
            post(toggle_section),
        )
        .route(
            "/v1/sessions/{id}/chapters/{chapter_id}/complete",
            put(set_chapter_complete),
        )
        .route("/v1/sessions/{id}/reset", post(reset_session))
        .route("/v1/sessions/{id}/stats", get(get_stats))
        .route(
            "/v1/sessions/{id}/chapters/{chapter_id}/risk/{level}",
            get(get_risk_breakdown),
        )
        .route("/v1/sessions/{id}/report", get(download_report))
}

fn session_not_found(id: &Uuid) -> AppError {
    AppError::NotFound(format!("session {id} not found"))
}

/// Apply `intent` to session `id` and collect the refreshed stats, all under
/// the session store's write lock.
fn run_intent(state: &AppState, id: Uuid, intent: Intent) -> Result<ActionResponse, AppError> {
    let catalog = &state.catalog;
    state
        .sessions
        .try_update(&id, |record| {
            let outcome = apply(catalog, &mut record.state, intent)?;
            if outcome.changed {
                record.updated_at = Utc::now();
            }
            refreshed(catalog, &record.state, outcome)
        })
        .ok_or_else(|| session_not_found(&id))?
        .map_err(AppError::from)
}

fn refreshed(
    catalog: &Catalog,
    state: &CompletionState,
    outcome: Outcome,
) -> Result<ActionResponse, StateError> {
    let (overall, chapters) = match &outcome.refresh {
        Refresh::Nothing => (None, Vec::new()),
        Refresh::Chapter(chapter_id) => (
            Some(overall_stats(catalog, state)),
            vec![chapter_stats(catalog, state, chapter_id)?],
        ),
        Refresh::Everything => (Some(overall_stats(catalog, state)), all_chapter_stats(catalog, state)?),
    };
    Ok(ActionResponse {
        outcome,
        overall,
        chapters,
    })
}

fn all_chapter_stats(catalog: &Catalog, state: &CompletionState) -> Result<Vec<ChapterStats>, StateError> {
    catalog
        .chapters()
        .iter()
        .map(|c| chapter_stats(catalog, state, &c.id))
        .collect()
}

// -- Session Lifecycle --------------------------------------------------------

/// POST /v1/sessions — Begin an audit session with every section pending.
#[utoipa::path(
    post,
    path = "/v1/sessions",
    responses(
        (status = 201, description = "Session created", body = SessionRecord),
    ),
    tag = "sessions"
)]
pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionRecord>) {
    let record = SessionRecord::new(&state.catalog);
    state.sessions.insert(record.id, record.clone());
    tracing::info!(session = %record.id, sections = record.state.len(), "session created");
    (StatusCode::CREATED, Json(record))
}

/// GET /v1/sessions/{id} — Current completion flags.
#[utoipa::path(
    get,
    path = "/v1/sessions/{id}",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session found", body = SessionRecord),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "sessions"
)]
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionRecord>, AppError> {
    state
        .sessions
        .get(&id)
        .map(Json)
        .ok_or_else(|| session_not_found(&id))
}

/// DELETE /v1/sessions/{id} — End a session, discarding its state.
#[utoipa::path(
    delete,
    path = "/v1/sessions/{id}",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 204, description = "Session ended"),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "sessions"
)]
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .sessions
        .remove(&id)
        .ok_or_else(|| session_not_found(&id))?;
    tracing::info!(session = %id, "session ended");
    Ok(StatusCode::NO_CONTENT)
}

// -- Intents ------------------------------------------------------------------

/// POST /v1/sessions/{id}/sections/{chapter_id}/{number}/toggle — Flip one section.
#[utoipa::path(
    post,
    path = "/v1/sessions/{id}/sections/{chapter_id}/{number}/toggle",
    params(
        ("id" = Uuid, Path, description = "Session ID"),
        ("chapter_id" = String, Path, description = "Chapter ID"),
        ("number" = String, Path, description = "Section number"),
    ),
    responses(
        (status = 200, description = "Section toggled", body = ActionResponse),
        (status = 404, description = "Session or section not found", body = crate::error::ErrorBody),
    ),
    tag = "sessions"
)]
pub async fn toggle_section(
    State(state): State<AppState>,
    Path((id, chapter_id, number)): Path<(Uuid, String, String)>,
) -> Result<Json<ActionResponse>, AppError> {
    let key = SectionKey::new(chapter_id, number);
    run_intent(&state, id, Intent::ToggleSection { key }).map(Json)
}

/// PUT /v1/sessions/{id}/chapters/{chapter_id}/complete — Move a chapter's
/// "mark all complete" control.
#[utoipa::path(
    put,
    path = "/v1/sessions/{id}/chapters/{chapter_id}/complete",
    params(
        ("id" = Uuid, Path, description = "Session ID"),
        ("chapter_id" = String, Path, description = "Chapter ID"),
    ),
    request_body = SetChapterRequest,
    responses(
        (status = 200, description = "Control applied", body = ActionResponse),
        (status = 400, description = "Malformed body", body = crate::error::ErrorBody),
        (status = 404, description = "Session or chapter not found", body = crate::error::ErrorBody),
    ),
    tag = "sessions"
)]
pub async fn set_chapter_complete(
    State(state): State<AppState>,
    Path((id, chapter_id)): Path<(Uuid, String)>,
    body: Result<Json<SetChapterRequest>, JsonRejection>,
) -> Result<Json<ActionResponse>, AppError> {
    let req = extract_json(body)?;
    run_intent(
        &state,
        id,
        Intent::SetChapter {
            chapter_id,
            value: req.value,
        },
    )
    .map(Json)
}

/// POST /v1/sessions/{id}/reset — Clear every flag.
#[utoipa::path(
    post,
    path = "/v1/sessions/{id}/reset",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session reset", body = ActionResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "sessions"
)]
pub async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ActionResponse>, AppError> {
    run_intent(&state, id, Intent::ResetAll).map(Json)
}

// -- Read Models --------------------------------------------------------------

/// GET /v1/sessions/{id}/stats — Overall, per-chapter, and summary table.
#[utoipa::path(
    get,
    path = "/v1/sessions/{id}/stats",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session statistics", body = StatsResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "sessions"
)]
pub async fn get_stats(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StatsResponse>, AppError> {
    let catalog = &state.catalog;
    let stats = state
        .sessions
        .read(&id, |record| {
            Ok::<_, StateError>(StatsResponse {
                overall: overall_stats(catalog, &record.state),
                chapters: all_chapter_stats(catalog, &record.state)?,
                summary: chapter_summary(catalog, &record.state),
            })
        })
        .ok_or_else(|| session_not_found(&id))??;
    Ok(Json(stats))
}

/// GET /v1/sessions/{id}/chapters/{chapter_id}/risk/{level} — Completion of
/// one chapter's sections at one risk level.
#[utoipa::path(
    get,
    path = "/v1/sessions/{id}/chapters/{chapter_id}/risk/{level}",
    params(
        ("id" = Uuid, Path, description = "Session ID"),
        ("chapter_id" = String, Path, description = "Chapter ID"),
        ("level" = String, Path, description = "Risk level: low, medium, or high"),
    ),
    responses(
        (status = 200, description = "Risk breakdown", body = RiskResponse),
        (status = 400, description = "Unknown risk level", body = crate::error::ErrorBody),
        (status = 404, description = "Session or chapter not found", body = crate::error::ErrorBody),
    ),
    tag = "sessions"
)]
pub async fn get_risk_breakdown(
    State(state): State<AppState>,
    Path((id, chapter_id, level)): Path<(Uuid, String, String)>,
) -> Result<Json<RiskResponse>, AppError> {
    let risk: RiskLevel = level.parse()?;
    let breakdown = state
        .sessions
        .read(&id, |record| risk_breakdown(&state.catalog, &record.state, &chapter_id, risk))
        .ok_or_else(|| session_not_found(&id))??;
    Ok(Json(RiskResponse {
        chapter_id,
        breakdown,
    }))
}

/// GET /v1/sessions/{id}/report — Plain-text audit report as an attachment.
#[utoipa::path(
    get,
    path = "/v1/sessions/{id}/report",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Report text", body = String, content_type = "text/plain"),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "sessions"
)]
pub async fn download_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let generated_at = Timestamp::now();
    let report = state
        .sessions
        .read(&id, |record| generate_report(&state.catalog, &record.state, &generated_at))
        .ok_or_else(|| session_not_found(&id))?;
    tracing::info!(session = %id, bytes = report.len(), "report exported");
    Ok((
        [
            (header::CONTENT_TYPE, REPORT_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{REPORT_FILENAME}\""),
            ),
        ],
        report,
    ))
}
