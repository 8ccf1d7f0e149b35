//! Response bodies of the Mackerel `/api/v0` endpoints we read.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct ServicesResponse {
    #[serde(default)]
    pub services: Vec<ServiceDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceDto {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HostsResponse {
    #[serde(default)]
    pub hosts: Vec<HostDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HostDto {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl HostDto {
    /// Display name, falling back to the id for unnamed hosts.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricNamesResponse {
    #[serde(default)]
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsResponse {
    #[serde(default)]
    pub metrics: Vec<MetricPoint>,
}

/// One `(time, value)` sample, time in epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub time: i64,
    pub value: f64,
}
