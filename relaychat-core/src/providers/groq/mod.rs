//! Groq provider implementation
//!
//! Groq exposes an OpenAI-compatible chat completions endpoint. This module
//! opens streaming calls against it and decodes the event stream into
//! relaychat's protocol chunks.

mod client;
pub mod streaming;

pub use client::GroqProvider;
