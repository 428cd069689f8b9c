//! Configuration schema structures with serde support

use super::error::{ValidationError, ValidationErrorKind};
use super::secrets::{SafeLogging, SecretString};
use crate::completion::{
    DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS, DEFAULT_TOP_P,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Supported configuration schema version
pub const CONFIG_VERSION: &str = "0.1";

/// Root configuration structure for relaychat
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    /// Schema version (required - no default)
    pub version: String,

    /// HTTP front end settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Completion provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Parameters sent with every completion call
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Outbound connection settings
    #[serde(default)]
    pub connection: ConnectionConfig,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            server: ServerConfig::default(),
            provider: ProviderConfig::default(),
            completion: CompletionConfig::default(),
            connection: ConnectionConfig::default(),
        }
    }
}

/// HTTP front end configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Directory served under `/static`
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// Landing page served at `/`; the built-in page is used when unset
    #[serde(default)]
    pub index_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            static_dir: default_static_dir(),
            index_path: None,
        }
    }
}

/// Completion provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Provider name used in logs
    #[serde(default = "default_provider_name")]
    pub name: String,

    /// API key (supports environment variable interpolation).
    /// Falls back to `GROQ_API_KEY` when left empty; not validated.
    #[serde(default)]
    pub api_key: SecretString,

    /// Base URL for the provider API
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            api_key: SecretString::default(),
            base_url: default_base_url(),
        }
    }
}

/// Parameters for each completion call
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CompletionConfig {
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum output tokens
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Nucleus sampling parameter
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Stop sequences; empty sends none
    #[serde(default)]
    pub stop: Vec<String>,

    /// Deadline for one whole completion (open + drain); `null` disables it
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: Option<u64>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            top_p: default_top_p(),
            stop: Vec::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Connection configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionConfig {
    /// Connection timeout in milliseconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,

    /// Maximum idle connections per host
    #[serde(default = "default_max_idle")]
    pub max_idle_per_host: usize,

    /// Keep-alive timeout in seconds
    #[serde(default = "default_keepalive")]
    pub keepalive_secs: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: default_connect_timeout(),
            max_idle_per_host: default_max_idle(),
            keepalive_secs: default_keepalive(),
        }
    }
}

// Default value functions for serde
fn default_bind_addr() -> String { "127.0.0.1:5000".to_string() }
fn default_static_dir() -> PathBuf { PathBuf::from("static") }
fn default_provider_name() -> String { "groq".to_string() }
fn default_base_url() -> String { "https://api.groq.com/openai/v1".to_string() }
fn default_model() -> String { DEFAULT_MODEL.to_string() }
fn default_temperature() -> f32 { DEFAULT_TEMPERATURE }
fn default_max_tokens() -> usize { DEFAULT_MAX_TOKENS }
fn default_top_p() -> f32 { DEFAULT_TOP_P }
fn default_timeout_secs() -> Option<u64> { Some(DEFAULT_TIMEOUT_SECS) }
fn default_connect_timeout() -> u64 { 10000 }
fn default_max_idle() -> usize { 10 }
fn default_keepalive() -> u64 { 90 }

impl RelayConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.version.is_empty() {
            return Err(ValidationError::required("version"));
        }

        if self.version != CONFIG_VERSION {
            return Err(ValidationError::new(
                "version",
                ValidationErrorKind::InvalidVersion {
                    expected: CONFIG_VERSION.to_string(),
                    actual: self.version.clone(),
                },
            ));
        }

        self.server.validate("server")?;
        self.provider.validate("provider")?;
        self.completion.validate("completion")?;
        self.connection.validate("connection")?;

        Ok(())
    }
}

impl ServerConfig {
    /// Validate server configuration
    pub fn validate(&self, path: &str) -> Result<(), ValidationError> {
        if self.bind_addr.parse::<SocketAddr>().is_err() {
            return Err(ValidationError::invalid_format(
                format!("{}.bind_addr", path),
                format!("expected host:port, got '{}'", self.bind_addr),
            ));
        }

        Ok(())
    }
}

impl ProviderConfig {
    /// Validate provider configuration.
    ///
    /// The API key is deliberately not checked: a missing key surfaces as an
    /// authentication error on the first provider call.
    pub fn validate(&self, path: &str) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::required(format!("{}.name", path)));
        }

        if self.base_url.is_empty() {
            return Err(ValidationError::required(format!("{}.base_url", path)));
        }

        match url::Url::parse(&self.base_url) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    return Err(ValidationError::new(
                        format!("{}.base_url", path),
                        ValidationErrorKind::InvalidUrl {
                            message: format!("URL scheme must be http or https, got: {}", url.scheme()),
                        },
                    ));
                }
            }
            Err(e) => {
                return Err(ValidationError::new(
                    format!("{}.base_url", path),
                    ValidationErrorKind::InvalidUrl {
                        message: e.to_string(),
                    },
                ));
            }
        }

        Ok(())
    }
}

impl CompletionConfig {
    /// Validate completion parameters
    pub fn validate(&self, path: &str) -> Result<(), ValidationError> {
        if self.model.is_empty() {
            return Err(ValidationError::required(format!("{}.model", path)));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::out_of_range(
                format!("{}.temperature", path),
                "Must be between 0.0 and 2.0",
            ));
        }

        if self.max_tokens == 0 {
            return Err(ValidationError::out_of_range(
                format!("{}.max_tokens", path),
                "Must be greater than 0",
            ));
        }

        if !(self.top_p > 0.0 && self.top_p <= 1.0) {
            return Err(ValidationError::out_of_range(
                format!("{}.top_p", path),
                "Must be in (0.0, 1.0]",
            ));
        }

        if self.timeout_secs == Some(0) {
            return Err(ValidationError::out_of_range(
                format!("{}.timeout_secs", path),
                "Must be greater than 0",
            )
            .with_context("use null to disable the deadline"));
        }

        Ok(())
    }
}

impl ConnectionConfig {
    /// Validate connection settings
    pub fn validate(&self, path: &str) -> Result<(), ValidationError> {
        if self.connect_timeout_ms == 0 {
            return Err(ValidationError::out_of_range(
                format!("{}.connect_timeout_ms", path),
                "Must be greater than 0",
            ));
        }

        Ok(())
    }
}

impl SafeLogging for RelayConfig {
    fn safe_for_logging(&self) -> String {
        format!(
            "bind={} static_dir={} provider={} base_url={} api_key={} model={} timeout={}",
            self.server.bind_addr,
            self.server.static_dir.display(),
            self.provider.name,
            self.provider.base_url,
            self.provider.api_key.partial_redact(),
            self.completion.model,
            self.completion
                .timeout_secs
                .map(|s| format!("{}s", s))
                .unwrap_or_else(|| "none".to_string()),
        )
    }
}
