use std::env;
use std::fmt;
use std::time::Duration;

use serde_json::{json, Value};
use tracing::debug;
use validator::Validate;

use super::runner_config_input::RunnerConfigInput;
use crate::errors::AppError;

pub const DEFAULT_BASE_URL: &str = "https://api.mackerelio.com";

const ENV_API_KEY: &str = "MACKEREL_API_KEY";
const ENV_BASE_URL: &str = "MACKEREL_BASE_URL";
const ENV_DISCOVER_HOSTS: &str = "MACKEREL_DISCOVER_HOSTS";
const ENV_TIMEOUT_MS: &str = "MACKEREL_TIMEOUT_MS";

/// Validated, read-only runner configuration.
#[derive(Clone)]
pub struct RunnerConfig {
    /// Secret API key sent as `X-Api-Key`.
    api_key: String,
    /// API root without a trailing slash.
    pub base_url: String,
    /// Whether schema discovery also walks `/hosts`.
    pub discover_hosts: bool,
    /// Per-request timeout for outbound calls.
    pub timeout_ms: Option<u64>,
}

impl RunnerConfig {
    /// Validate host-provided settings once; the result never changes afterwards.
    pub fn load(input: RunnerConfigInput) -> Result<Self, AppError> {
        let input = input.normalized();
        input
            .validate()
            .map_err(|e| AppError::ConfigurationError(e.to_string()))?;

        let api_key = input
            .api_key
            .ok_or_else(|| AppError::ConfigurationError("api_key is required".into()))?;

        let base_url = input
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            api_key,
            base_url,
            discover_hosts: input.discover_hosts.unwrap_or(true),
            timeout_ms: input.timeout_ms,
        })
    }

    /// Build from `MACKEREL_*` environment variables, reading `.env` first when present.
    pub fn from_env() -> Result<Self, AppError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from a variable lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let discover_hosts = match lookup(ENV_DISCOVER_HOSTS) {
            Some(raw) => Some(parse_bool(&raw).ok_or_else(|| {
                AppError::ConfigurationError(format!("{ENV_DISCOVER_HOSTS} must be a boolean, got {raw:?}"))
            })?),
            None => None,
        };

        let timeout_ms = match lookup(ENV_TIMEOUT_MS) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|e| {
                AppError::ConfigurationError(format!("{ENV_TIMEOUT_MS} is not a number: {e}"))
            })?),
            None => None,
        };

        Self::load(RunnerConfigInput {
            api_key: lookup(ENV_API_KEY),
            base_url: lookup(ENV_BASE_URL),
            discover_hosts,
            timeout_ms,
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Mask the key for safe display (keeps last 4 chars).
    pub fn masked_api_key(&self) -> String {
        if self.api_key.chars().count() <= 8 {
            "***".into()
        } else {
            let mut tail: Vec<char> = self.api_key.chars().rev().take(4).collect();
            tail.reverse();
            format!("***{}", tail.into_iter().collect::<String>())
        }
    }

    /// Static description of the settings, in the shape the host renders as a form.
    pub fn configuration_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "api_key": {
                    "type": "string",
                    "title": "API Key"
                },
                "base_url": {
                    "type": "string",
                    "title": "API Base URL",
                    "default": DEFAULT_BASE_URL
                },
                "discover_hosts": {
                    "type": "boolean",
                    "title": "List hosts in schema browser",
                    "default": true
                },
                "timeout_ms": {
                    "type": "number",
                    "title": "Request timeout (ms)"
                }
            },
            "order": ["api_key", "base_url", "discover_hosts", "timeout_ms"],
            "required": ["api_key"],
            "secret": ["api_key"]
        })
    }
}

impl fmt::Debug for RunnerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunnerConfig")
            .field("api_key", &self.masked_api_key())
            .field("base_url", &self.base_url)
            .field("discover_hosts", &self.discover_hosts)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
