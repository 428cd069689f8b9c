//! Shared reqwest client construction

use crate::config::ConnectionConfig;
use crate::providers::error::{ProviderError, ProviderResult};
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Default user agent
const USER_AGENT: &str = concat!("relaychat/", env!("CARGO_PKG_VERSION"));

/// Build a pooled HTTP client for provider calls.
///
/// Only the connect phase is bounded here. A total request timeout would cut
/// long streams short, so the completion deadline is enforced by the caller.
pub fn build_client(connection: &ConnectionConfig) -> ProviderResult<Client> {
    ClientBuilder::new()
        .pool_max_idle_per_host(connection.max_idle_per_host)
        .pool_idle_timeout(Duration::from_secs(connection.keepalive_secs))
        .connect_timeout(Duration::from_millis(connection.connect_timeout_ms))
        .user_agent(USER_AGENT)
        .gzip(true)
        .build()
        .map_err(|e| ProviderError::Configuration(format!("Failed to create HTTP client: {}", e)))
}
