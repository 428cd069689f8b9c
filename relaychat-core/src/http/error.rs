//! HTTP error mapping utilities

use crate::providers::error::ProviderError;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use serde_json::Value;
use uuid::Uuid;

/// Map an HTTP status code and response body to a ProviderError
pub fn map_http_error(
    status: StatusCode,
    headers: Option<&HeaderMap>,
    body: Option<String>,
    request_id: Uuid,
) -> ProviderError {
    let error_details = body
        .as_ref()
        .and_then(|b| serde_json::from_str::<Value>(b).ok())
        .and_then(|v| extract_error_details(&v));

    let error_message = error_details
        .as_ref()
        .map(|d| d.message.clone())
        .or_else(|| body.clone().filter(|b| !b.trim().is_empty()))
        .unwrap_or_else(|| format!("HTTP error {}", status.as_u16()));

    // Include request ID in error message
    let message_with_id = format!("{} [request_id: {}]", error_message, request_id);

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ProviderError::Authentication(message_with_id)
        }

        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after_secs = headers
                .and_then(|h| h.get(RETRY_AFTER))
                .and_then(|v| v.to_str().ok())
                .and_then(parse_retry_after);

            ProviderError::RateLimit {
                message: message_with_id,
                retry_after_secs,
            }
        }

        StatusCode::NOT_FOUND => ProviderError::ModelNotFound(message_with_id),

        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            ProviderError::InvalidRequest(message_with_id)
        }

        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            ProviderError::ServiceUnavailable(message_with_id)
        }

        status if status.is_server_error() => ProviderError::ServiceUnavailable(message_with_id),

        _ => ProviderError::Api {
            code: error_details
                .and_then(|d| d.code)
                .unwrap_or_else(|| format!("HTTP_{}", status.as_u16())),
            message: message_with_id,
        },
    }
}

/// Error details extracted from response body
struct ErrorDetails {
    message: String,
    code: Option<String>,
}

/// Extract error details from a JSON error body.
///
/// Also used on stream events, which carry the same `error` object.
pub fn extract_error_message(json: &Value) -> Option<String> {
    extract_error_details(json).map(|d| d.message)
}

fn extract_error_details(json: &Value) -> Option<ErrorDetails> {
    // OpenAI-compatible format: { "error": { "message": "...", "type": "...", "code": "..." } }
    if let Some(error) = json.get("error") {
        if let Some(message) = error.get("message").and_then(|v| v.as_str()) {
            let code = error
                .get("code")
                .and_then(|v| v.as_str())
                .or_else(|| error.get("type").and_then(|v| v.as_str()))
                .map(str::to_string);
            return Some(ErrorDetails {
                message: message.to_string(),
                code,
            });
        }

        if let Some(message) = error.as_str() {
            return Some(ErrorDetails {
                message: message.to_string(),
                code: None,
            });
        }
    }

    // Generic format: { "message": "..." }
    if let Some(message) = json.get("message").and_then(|v| v.as_str()) {
        return Some(ErrorDetails {
            message: message.to_string(),
            code: None,
        });
    }

    None
}

/// Parse Retry-After header value given in seconds
pub fn parse_retry_after(header_value: &str) -> Option<u64> {
    header_value.trim().parse::<u64>().ok()
}
