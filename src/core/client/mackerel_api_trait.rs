use async_trait::async_trait;

use super::mackerel_dto::{HostDto, MetricPoint, ServiceDto};
use crate::errors::TransportError;

/// Outbound calls the runner makes against the Mackerel API.
#[async_trait]
pub trait MackerelApi: Send + Sync {
    async fn list_services(&self) -> Result<Vec<ServiceDto>, TransportError>;

    async fn list_hosts(&self) -> Result<Vec<HostDto>, TransportError>;

    async fn service_metric_names(&self, service_name: &str) -> Result<Vec<String>, TransportError>;

    async fn host_metric_names(&self, host_id: &str) -> Result<Vec<String>, TransportError>;

    /// `request_path` is everything after the base URL, query string included.
    async fn fetch_metric(&self, request_path: &str) -> Result<Vec<MetricPoint>, TransportError>;

    /// Lightweight GET against the base URL; true only for a 2xx answer.
    async fn ping(&self) -> bool;
}
