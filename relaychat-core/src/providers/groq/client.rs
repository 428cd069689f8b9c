//! Groq client implementation

use super::streaming::parse_stream;
use crate::config::{ConnectionConfig, ProviderConfig, SecretString};
use crate::http::client::build_client;
use crate::http::error::map_http_error;
use crate::http::RequestOptions;
use crate::protocol::ChatRequest;
use crate::providers::{ChatStream, CompletionProvider, ProviderError, ProviderResult};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response};
use tracing::{debug, info, warn};

/// Content type of a Server-Sent Events body
const EVENT_STREAM: &str = "text/event-stream";

/// Groq provider speaking the OpenAI-compatible chat completions API
pub struct GroqProvider {
    name: String,
    base_url: String,
    api_key: SecretString,
    client: Client,
}

impl GroqProvider {
    /// Create a new provider with its own connection pool
    pub fn new(config: &ProviderConfig, connection: &ConnectionConfig) -> ProviderResult<Self> {
        let client = build_client(connection)?;
        Ok(Self::with_client(config, client))
    }

    /// Create a provider around an existing HTTP client
    pub fn with_client(config: &ProviderConfig, client: Client) -> Self {
        Self {
            name: config.name.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            client,
        }
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build request headers
    fn build_headers(&self, options: &RequestOptions) -> ProviderResult<HeaderMap> {
        let mut headers = HeaderMap::new();

        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key.expose_secret()))
            .map_err(|_| {
                ProviderError::Configuration("API key contains invalid header characters".to_string())
            })?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static(EVENT_STREAM));

        if let Ok(id) = HeaderValue::from_str(&options.request_id.to_string()) {
            headers.insert("X-Request-ID", id);
        }

        Ok(headers)
    }

    /// Reject success responses that are not an event stream
    fn validate_content_type(response: &Response) -> ProviderResult<()> {
        if let Some(content_type) = response.headers().get(CONTENT_TYPE) {
            let content_type = content_type.to_str().unwrap_or("").to_lowercase();

            if !content_type.contains(EVENT_STREAM) {
                return Err(ProviderError::Api {
                    code: "INVALID_CONTENT_TYPE".to_string(),
                    message: format!("Expected {}, got: {}", EVENT_STREAM, content_type),
                });
            }
        }

        Ok(())
    }
}

#[async_trait]
impl CompletionProvider for GroqProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn stream_chat(
        &self,
        request: ChatRequest,
        options: RequestOptions,
    ) -> ProviderResult<ChatStream> {
        let request_id = options.request_id;
        let url = format!("{}{}", self.base_url, options.call_kind.endpoint());

        let mut request = request;
        request.stream = Some(true);

        info!(
            "Sending streaming request to {} [request_id: {}]",
            self.name, request_id
        );
        debug!(
            "Request URL: {} model={} turns={}",
            url,
            request.model,
            request.messages.len()
        );

        let response = self
            .client
            .post(&url)
            .headers(self.build_headers(&options)?)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        debug!("Response status: {} [request_id: {}]", status, request_id);

        if !status.is_success() {
            let headers = response.headers().clone();
            let body = response.text().await.ok();

            warn!(
                "Request failed with status {} for {} [request_id: {}]",
                status, self.name, request_id
            );

            return Err(map_http_error(status, Some(&headers), body, request_id));
        }

        Self::validate_content_type(&response)?;

        Ok(parse_stream(response.bytes_stream()))
    }
}
