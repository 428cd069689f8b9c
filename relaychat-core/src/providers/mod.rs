//! Provider abstraction
//!
//! This module defines the seam to the external completion service and the
//! concrete Groq client behind it.

pub mod adapter;
pub mod error;
pub mod groq;

pub use adapter::{ChatStream, CompletionProvider};
pub use error::{ProviderError, ProviderResult};

// Re-export concrete providers
pub use groq::GroqProvider;
