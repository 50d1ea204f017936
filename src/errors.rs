use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chatbot_render::models::ErrorBody;
use thiserror::Error;

/// Top-level error of the development host. Every variant renders as the
/// `{"error": "..."}` body the UI already understands.
#[derive(Debug, Error)]
pub enum AppError {
    // ── Configuration errors ─────────────────────────────────────────────────
    #[error("Invalid value for {key}: '{value}'")]
    InvalidConfig { key: String, value: String },

    // ── Upstream errors ──────────────────────────────────────────────────────
    #[error("Chat backend unavailable at {url}")]
    UpstreamUnavailable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Chat backend request failed: {message}")]
    UpstreamFailed {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    // ── Validation errors ────────────────────────────────────────────────────
    #[error("Field '{field_name}' exceeds max length of {max_length} (actual: {actual_length})")]
    FieldTooLong { field_name: String, max_length: usize, actual_length: usize },

    // ── System errors ────────────────────────────────────────────────────────
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn invalid_config(key: impl Into<String>, value: impl Into<String>) -> Self {
        AppError::InvalidConfig { key: key.into(), value: value.into() }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::FieldTooLong { .. })
    }

    pub fn is_upstream(&self) -> bool {
        matches!(self, AppError::UpstreamUnavailable { .. } | AppError::UpstreamFailed { .. })
    }

    pub fn status_code(&self) -> StatusCode {
        if self.is_validation() {
            StatusCode::BAD_REQUEST
        } else if self.is_upstream() {
            StatusCode::BAD_GATEWAY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}
