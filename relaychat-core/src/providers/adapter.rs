//! Provider adapter trait
//!
//! Defines the seam between the relay and a streaming completion service.
//! The relay holds one provider for the lifetime of the process and hands it
//! to every request; tests substitute their own implementation.

use crate::http::RequestOptions;
use crate::protocol::{ChatRequest, ChatStreamChunk};
use crate::providers::error::ProviderResult;
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

/// Lazy, finite, non-restartable sequence of decoded stream chunks
pub type ChatStream = Pin<Box<dyn Stream<Item = ProviderResult<ChatStreamChunk>> + Send>>;

/// Core trait that a streaming completion provider implements
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Get the provider's name
    fn name(&self) -> &str;

    /// Open a streaming chat completion.
    ///
    /// Fails if the call cannot be established or the provider rejects it.
    /// Errors that occur after the stream is open are yielded as stream items.
    async fn stream_chat(
        &self,
        request: ChatRequest,
        options: RequestOptions,
    ) -> ProviderResult<ChatStream>;
}
