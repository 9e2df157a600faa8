use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use rulr_rules::RuleError;
use rulr_store::StoreError;

/// Errors that can occur when running the Rulr server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// An I/O error (e.g. binding the listener).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A rule failed to parse, evaluate, or combine.
    #[error(transparent)]
    Rule(#[from] RuleError),

    /// The rule store rejected or failed an operation.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The request body is missing required fields.
    #[error("{0}")]
    BadRequest(String),

    /// The addressed rule does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The request conflicts with an existing rule.
    #[error("{0}")]
    Conflict(String),
}

impl ServerError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Rule(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Store(e) if e.is_duplicate() => StatusCode::CONFLICT,
            Self::Config(_) | Self::Io(_) | Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = serde_json::json!({ "success": false, "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
