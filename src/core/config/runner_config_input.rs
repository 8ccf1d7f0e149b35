use serde::{Deserialize, Serialize};
use validator::Validate;

/// Raw settings as handed over by the host framework (or read from env).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RunnerConfigInput {
    pub api_key: Option<String>,
    #[validate(url)]
    pub base_url: Option<String>,
    pub discover_hosts: Option<bool>,
    #[validate(range(min = 1))]
    pub timeout_ms: Option<u64>,
}

impl RunnerConfigInput {
    /// Blank strings count as "not set".
    pub fn normalized(self) -> Self {
        Self {
            api_key: self.api_key.and_then(normalize_string),
            base_url: self.base_url.and_then(normalize_string),
            ..self
        }
    }
}

fn normalize_string(v: String) -> Option<String> {
    let s = v.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
