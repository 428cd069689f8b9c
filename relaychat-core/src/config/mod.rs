//! Configuration module for relaychat
//!
//! Configuration comes from a YAML or JSON file, or from the environment
//! alone when no file is given. `${VAR}` placeholders in files are expanded
//! before parsing.

mod env;
mod error;
mod schema;
mod secrets;

pub use env::{api_key_from_env, API_KEY_VAR};
pub use error::{ConfigError, ConfigResult, ValidationError, ValidationErrorKind};
pub use schema::{
    CompletionConfig, ConnectionConfig, ProviderConfig, RelayConfig, ServerConfig, CONFIG_VERSION,
};
pub use secrets::{SafeLogging, SecretString};

use std::fs;
use std::path::Path;

/// Load a configuration from a YAML file
pub fn load_from_yaml<P: AsRef<Path>>(path: P) -> ConfigResult<RelayConfig> {
    let path = path.as_ref();
    let content = read_config(path)?;

    let interpolated = env::interpolate_env_vars(&content)?;

    let config: RelayConfig =
        serde_yaml::from_str(&interpolated).map_err(|e| ConfigError::ParseError {
            path: path.to_string_lossy().to_string(),
            line: e.location().map(|l| l.line()),
            column: e.location().map(|l| l.column()),
            message: e.to_string(),
        })?;

    finish(config)
}

/// Load a configuration from a JSON file
pub fn load_from_json<P: AsRef<Path>>(path: P) -> ConfigResult<RelayConfig> {
    let path = path.as_ref();
    let content = read_config(path)?;

    let interpolated = env::interpolate_env_vars(&content)?;

    let config: RelayConfig =
        serde_json::from_str(&interpolated).map_err(|e| ConfigError::ParseError {
            path: path.to_string_lossy().to_string(),
            line: Some(e.line()),
            column: Some(e.column()),
            message: e.to_string(),
        })?;

    finish(config)
}

/// Load a configuration file, picking the format from its extension
pub fn load_from_path<P: AsRef<Path>>(path: P) -> ConfigResult<RelayConfig> {
    let path = path.as_ref();
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => load_from_yaml(path),
        Some("json") => load_from_json(path),
        _ => Err(ConfigError::UnsupportedFormat {
            path: path.to_string_lossy().to_string(),
        }),
    }
}

impl RelayConfig {
    /// Defaults plus the API key from the environment
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.provider.api_key = SecretString::new(api_key_from_env());
        config
    }
}

fn read_config(path: &Path) -> ConfigResult<String> {
    fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.to_string_lossy().to_string(),
        source: e,
    })
}

fn finish(mut config: RelayConfig) -> ConfigResult<RelayConfig> {
    if config.provider.api_key.is_empty() {
        config.provider.api_key = SecretString::new(api_key_from_env());
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_yaml() {
        let yaml = r#"
version: "0.1"
completion:
  model: llama3-8b-8192
"#;
        let config: RelayConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.completion.model, "llama3-8b-8192");
        assert_eq!(config.completion.max_tokens, 1024);
        assert_eq!(config.provider.name, "groq");
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let yaml = r#"
version: "0.1"
provider:
  retries: 3
"#;
        assert!(serde_yaml::from_str::<RelayConfig>(yaml).is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        let result = load_from_path("relaychat.toml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat { .. })));
    }
}
