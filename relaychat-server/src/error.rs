//! Request-boundary error type

use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use relaychat_core::ProviderError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Everything that can fail while answering a request.
///
/// Every variant renders as `500 {"error": "..."}`.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Invalid request body: {0}")]
    InvalidRequest(#[from] serde_json::Error),

    #[error("Unreadable request body: {0}")]
    Body(#[from] BytesRejection),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ChatError {
    /// Text placed in the `error` field of the response body
    pub fn public_message(&self) -> String {
        match self {
            ChatError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        match &self {
            ChatError::Internal(source) => error!("Request failed: {:#}", source),
            other => error!("Request failed: {}", other),
        }

        let body = Json(json!({ "error": self.public_message() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
