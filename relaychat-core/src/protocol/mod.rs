//! Protocol module for chat completion request/response structures
//!
//! These structures follow the OpenAI-compatible chat completion format that
//! the relay speaks with its provider:
//! - Role-tagged turns, oldest first
//! - Streaming delta chunks
//! - Serde-friendly and forward-compatible with unknown fields

pub mod types;

pub use types::{
    ChatRequest, ChatStreamChunk, CompletionUsage, MessageDelta, Role, StreamChoice, Turn,
};
