//! Connection configuration for the AAP controller.
//!
//! All values come from the process environment and are immutable after
//! startup. The config is plainly cloned into whatever needs it.

use thiserror::Error;

pub const ENV_URL: &str = "AAP_URL";
pub const ENV_TOKEN: &str = "AAP_TOKEN";
pub const ENV_PROJECT_ID: &str = "AAP_PROJECT_ID";
pub const ENV_VERIFY_SSL: &str = "AAP_VERIFY_SSL";
pub const ENV_TIMEOUT: &str = "AAP_TIMEOUT";
pub const ENV_MAX_RETRIES: &str = "AAP_MAX_RETRIES";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {var}: {value:?} ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Connection settings for the AAP controller API.
#[derive(Debug, Clone)]
pub struct AapConfig {
    /// Base URL of the controller, e.g. "https://aap.example.com".
    pub url: String,
    /// Bearer token for API authentication.
    pub token: String,
    /// Default project id used when a tool call does not override it.
    pub project_id: String,
    /// Whether to verify the controller's TLS certificate.
    pub verify_ssl: bool,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Number of retries for transient failures (attempts = retries + 1).
    pub max_retries: u32,
}

impl AapConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through a variable lookup function.
    ///
    /// Factored out of [`from_env`](Self::from_env) so tests can supply
    /// values without mutating process-wide environment state.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let required = |var: &'static str| {
            lookup(var)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingVar(var))
        };

        let url = required(ENV_URL)?.trim_end_matches('/').to_string();
        let token = required(ENV_TOKEN)?;
        let project_id = required(ENV_PROJECT_ID)?;

        let verify_ssl = match lookup(ENV_VERIFY_SSL) {
            None => true,
            Some(raw) => parse_bool(ENV_VERIFY_SSL, &raw)?,
        };

        let timeout_secs = match lookup(ENV_TIMEOUT) {
            None => DEFAULT_TIMEOUT_SECS,
            Some(raw) => parse_number(ENV_TIMEOUT, &raw)?,
        };

        let max_retries = match lookup(ENV_MAX_RETRIES) {
            None => DEFAULT_MAX_RETRIES,
            Some(raw) => parse_number(ENV_MAX_RETRIES, &raw)?,
        };

        Ok(AapConfig {
            url,
            token,
            project_id,
            verify_ssl,
            timeout_secs,
            max_retries,
        })
    }
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: raw.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}

fn parse_number<T: std::str::FromStr>(var: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        var,
        value: raw.to_string(),
        reason: "expected a non-negative integer".to_string(),
    })
}
