//! HTTP plumbing shared by provider clients
//!
//! This module implements the HTTP layer for relaychat, handling:
//! - Connection pooling and client construction
//! - Error mapping from status codes and provider error bodies
//! - Request ID generation and correlation

pub mod client;
pub mod error;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type of API call being made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallKind {
    /// Chat completion request
    Chat,
}

impl CallKind {
    /// Get the endpoint path for this call kind
    pub fn endpoint(&self) -> &str {
        match self {
            CallKind::Chat => "/chat/completions",
        }
    }
}

/// Per-call options that travel alongside a request
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// Type of API call
    pub call_kind: CallKind,

    /// Unique request ID for correlation
    pub request_id: Uuid,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            call_kind: CallKind::Chat,
            request_id: Uuid::new_v4(),
        }
    }
}

impl RequestOptions {
    /// Create new request options with a generated request ID
    pub fn new(call_kind: CallKind) -> Self {
        Self {
            call_kind,
            ..Default::default()
        }
    }

    /// Reuse an ID assigned upstream, e.g. by the HTTP front end
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }
}
