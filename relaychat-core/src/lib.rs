//! Relaychat Core Library
//!
//! This crate turns a browser chat request into a streaming completion call
//! and reduces the streamed answer to a single string:
//! - [`history`] reshapes caller-supplied exchanges into ordered turns
//! - [`completion`] drives the streaming call and aggregates fragments
//! - [`providers`] holds the provider seam and the Groq client

pub mod completion;
pub mod config;
pub mod history;
pub mod http;
pub mod protocol;
pub mod providers;

pub use completion::{drain_stream, CompletionAggregator, CompletionSettings};
pub use history::{normalize, Exchange};
pub use protocol::{Role, Turn};
pub use providers::{ChatStream, CompletionProvider, GroqProvider, ProviderError, ProviderResult};

/// Returns the version of the Relaychat Core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
