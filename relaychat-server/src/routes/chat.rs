//! `POST /chat`: one conversation turn relayed to the completion provider

use super::AppState;
use crate::error::ChatError;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::Json;
use relaychat_core::history::normalize;
use relaychat_core::http::{CallKind, RequestOptions};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info_span, Instrument};

/// Body accepted by `POST /chat`
#[derive(Debug, Deserialize)]
pub struct ChatRequestBody {
    /// The new user message
    pub message: String,
    /// Prior exchanges, oldest first; entries are not validated here
    pub history: Vec<Value>,
}

/// Body returned on success
#[derive(Debug, Serialize)]
pub struct ChatResponseBody {
    pub response: String,
}

/// Parse the raw request body.
///
/// The content type is not checked, so clients posting JSON as `text/plain`
/// are still served.
pub fn parse_body(body: &[u8]) -> Result<ChatRequestBody, ChatError> {
    Ok(serde_json::from_slice(body)?)
}

pub async fn handle_chat(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ChatResponseBody>, ChatError> {
    let options = RequestOptions::new(CallKind::Chat);
    let span = info_span!("chat", request_id = %options.request_id);

    async move {
        // Bodies over the default size limit arrive here as a rejection.
        let body = body?;
        let request = parse_body(&body)?;
        let turns = normalize(&request.history, &request.message);
        debug!(
            history_entries = request.history.len(),
            turns = turns.len(),
            "Normalized conversation"
        );

        let response = state
            .aggregator
            .complete_with_options(turns, options)
            .await?;

        Ok(Json(ChatResponseBody { response }))
    }
    .instrument(span)
    .await
}
