//! Completion aggregation
//!
//! Issues one streaming completion call and reduces the stream to a single
//! string. Text is only returned once the provider signals the end of the
//! stream; any failure along the way discards what was accumulated.

use crate::config::CompletionConfig;
use crate::http::{CallKind, RequestOptions};
use crate::protocol::{ChatRequest, Turn};
use crate::providers::{ChatStream, CompletionProvider, ProviderError, ProviderResult};
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "llama3-70b-8192";

/// Sampling temperature used when none is configured
pub const DEFAULT_TEMPERATURE: f32 = 1.0;

/// Output token limit used when none is configured
pub const DEFAULT_MAX_TOKENS: usize = 1024;

/// Nucleus sampling parameter used when none is configured
pub const DEFAULT_TOP_P: f32 = 1.0;

/// Deadline for one completion call, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Parameters attached to every completion call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionSettings {
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum output tokens
    pub max_tokens: usize,
    /// Nucleus sampling parameter
    pub top_p: f32,
    /// Stop sequences; empty sends none
    pub stop: Vec<String>,
    /// Bound on open + drain; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            top_p: DEFAULT_TOP_P,
            stop: Vec::new(),
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        }
    }
}

impl From<&CompletionConfig> for CompletionSettings {
    fn from(config: &CompletionConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            top_p: config.top_p,
            stop: config.stop.clone(),
            timeout: config.timeout_secs.map(Duration::from_secs),
        }
    }
}

impl CompletionSettings {
    /// Set the completion deadline
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Drives streaming completions against an injected provider
#[derive(Clone)]
pub struct CompletionAggregator {
    provider: Arc<dyn CompletionProvider>,
    settings: CompletionSettings,
}

impl CompletionAggregator {
    /// Create an aggregator around a shared provider handle
    pub fn new(provider: Arc<dyn CompletionProvider>, settings: CompletionSettings) -> Self {
        Self { provider, settings }
    }

    /// Name of the underlying provider
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Parameters used for each call
    pub fn settings(&self) -> &CompletionSettings {
        &self.settings
    }

    /// Build the streaming request for a turn sequence
    pub fn build_request(&self, turns: Vec<Turn>) -> ChatRequest {
        ChatRequest::new(self.settings.model.clone(), turns)
            .with_temperature(self.settings.temperature)
            .with_max_tokens(self.settings.max_tokens)
            .with_top_p(self.settings.top_p)
            .with_stop(self.settings.stop.clone())
            .with_streaming()
    }

    /// Run one completion with a freshly generated request ID
    pub async fn complete(&self, turns: Vec<Turn>) -> ProviderResult<String> {
        self.complete_with_options(turns, RequestOptions::new(CallKind::Chat))
            .await
    }

    /// Run one completion and return the full response text
    pub async fn complete_with_options(
        &self,
        turns: Vec<Turn>,
        options: RequestOptions,
    ) -> ProviderResult<String> {
        let request_id = options.request_id;
        let request = self.build_request(turns);

        info!(
            "Sending request to {} [request_id: {}]",
            self.provider.name(),
            request_id
        );

        let call = async {
            let stream = self.provider.stream_chat(request, options).await?;
            drain_stream(stream).await
        };

        let result = match self.settings.timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => Err(ProviderError::Timeout(limit)),
            },
            None => call.await,
        };

        match &result {
            Ok(text) => info!(
                "Received response from {} ({} chars) [request_id: {}]",
                self.provider.name(),
                text.len(),
                request_id
            ),
            Err(e) => error!(
                "Completion failed on {} [request_id: {}]: {}",
                self.provider.name(),
                request_id,
                e
            ),
        }

        result
    }
}

/// Consume a stream to completion, concatenating fragment text in order.
///
/// Empty fragments contribute nothing. The first error item aborts the
/// drain and is returned as-is.
pub async fn drain_stream(mut stream: ChatStream) -> ProviderResult<String> {
    let mut text = String::new();
    let mut fragments = 0usize;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if let Some(fragment) = chunk.fragment().filter(|f| !f.is_empty()) {
            text.push_str(fragment);
            fragments += 1;
        }
        if let Some(reason) = chunk.finish_reason() {
            debug!("Stream finished with reason: {}", reason);
        }
    }

    debug!("Drained {} fragments", fragments);
    Ok(text)
}
