//! Environment variable interpolation for configuration

use super::error::ConfigError;
use regex::Regex;
use std::env;
use std::sync::LazyLock;

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("valid env var pattern"));

/// Environment variable holding the provider API key
pub const API_KEY_VAR: &str = "GROQ_API_KEY";

/// Interpolate `${VAR}` references in a configuration string.
///
/// A reference to an unset variable is an error.
pub fn interpolate_env_vars(content: &str) -> Result<String, ConfigError> {
    let mut result = content.to_string();

    for cap in ENV_VAR_PATTERN.captures_iter(content) {
        let full_match = &cap[0];
        let var_name = &cap[1];

        match env::var(var_name) {
            Ok(value) => {
                result = result.replace(full_match, &value);
            }
            Err(_) => {
                return Err(ConfigError::EnvVarNotFound {
                    var: var_name.to_string(),
                });
            }
        }
    }

    Ok(result)
}

/// Read the API key from the environment; unset means empty.
pub fn api_key_from_env() -> String {
    env::var(API_KEY_VAR).unwrap_or_default()
}
