//! Streaming support for Groq responses

use crate::http::error::extract_error_message;
use crate::protocol::ChatStreamChunk;
use crate::providers::{ChatStream, ProviderError, ProviderResult};
use bytes::Bytes;
use eventsource_stream::Eventsource;
use futures::{future, Stream, StreamExt};
use serde_json::Value;

/// Data payload that marks the end of the stream
pub const DONE_MARKER: &str = "[DONE]";

/// Parse a Server-Sent Events body into decoded chunks.
///
/// The stream ends at `data: [DONE]` or when the body closes. Keep-alive
/// events with no data are dropped.
pub fn parse_stream(
    stream: impl Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
) -> ChatStream {
    let events = stream
        .eventsource()
        .take_while(|result| {
            future::ready(!matches!(result, Ok(event) if event.data.trim() == DONE_MARKER))
        })
        .filter_map(|result| async move {
            match result {
                Ok(event) if event.data.trim().is_empty() => None,
                Ok(event) => Some(decode_chunk(&event.data)),
                Err(e) => Some(Err(ProviderError::Stream(e.to_string()))),
            }
        });

    Box::pin(events)
}

/// Decode one SSE data payload.
///
/// A payload with an `error` object is a provider-reported failure.
pub fn decode_chunk(data: &str) -> ProviderResult<ChatStreamChunk> {
    let value: Value = serde_json::from_str(data)
        .map_err(|e| ProviderError::ParseError(format!("Invalid stream chunk: {}: {}", e, data)))?;

    if value.get("error").is_some() {
        let message = extract_error_message(&value)
            .unwrap_or_else(|| "An error occurred during streaming".to_string());
        tracing::error!("Provider reported a stream error: {}", message);
        return Err(ProviderError::Stream(message));
    }

    serde_json::from_value(value)
        .map_err(|e| ProviderError::ParseError(format!("Unexpected stream chunk shape: {}", e)))
}
