//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps domain errors from dpdp-core and dpdp-state to HTTP status codes
//! and JSON error bodies with a machine-readable code and a message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use dpdp_core::DpdpError;
use dpdp_state::StateError;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "BAD_REQUEST").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Session, chapter, or section not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Convert completion-state errors to API errors.
///
/// An unknown key or chapter is a client referencing something the catalog
/// does not contain. A key-set mismatch can only come from a corrupted
/// session record.
impl From<StateError> for AppError {
    fn from(err: StateError) -> Self {
        match &err {
            StateError::KeyNotFound { key } => {
                tracing::warn!(%key, "section key not in catalog");
                Self::NotFound(err.to_string())
            }
            StateError::UnknownChapter { chapter_id } => {
                tracing::warn!(%chapter_id, "chapter not in catalog");
                Self::NotFound(err.to_string())
            }
            StateError::KeySetMismatch { .. } => Self::Internal(err.to_string()),
        }
    }
}

/// Convert core parse errors (risk levels, keys) to API errors.
impl From<DpdpError> for AppError {
    fn from(err: DpdpError) -> Self {
        match &err {
            DpdpError::Parse(_) => Self::BadRequest(err.to_string()),
            DpdpError::Catalog(_) => Self::Internal(err.to_string()),
        }
    }
}
