//! Helpers shared by the in-module test suites.
use std::sync::Mutex;

use async_trait::async_trait;
use axum::Router;

use crate::core::client::mackerel_api_trait::MackerelApi;
use crate::core::client::mackerel_client::API_PREFIX;
use crate::core::client::mackerel_dto::{HostDto, MetricPoint, ServiceDto};
use crate::errors::TransportError;

/// Serve `router` on an ephemeral localhost port and return its base URL.
pub async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// In-memory Mackerel that records every request path it sees.
#[derive(Default)]
pub struct FakeMackerel {
    services: Vec<(String, Vec<String>)>,
    hosts: Vec<(HostDto, Vec<String>)>,
    metrics: Vec<(String, Vec<MetricPoint>)>,
    failures: Vec<(String, u16)>,
    reachable: bool,
    requested: Mutex<Vec<String>>,
}

impl FakeMackerel {
    pub fn with_service(mut self, name: &str, metrics: &[&str]) -> Self {
        self.services
            .push((name.into(), metrics.iter().map(|m| m.to_string()).collect()));
        self
    }

    pub fn with_host(mut self, id: &str, name: Option<&str>, metrics: &[&str]) -> Self {
        let host = HostDto {
            id: id.into(),
            name: name.map(String::from),
        };
        self.hosts
            .push((host, metrics.iter().map(|m| m.to_string()).collect()));
        self
    }

    /// Samples returned for a metric path line, whatever the window.
    pub fn with_metric(mut self, line: &str, points: &[(i64, f64)]) -> Self {
        self.metrics.push((
            line.into(),
            points
                .iter()
                .map(|&(time, value)| MetricPoint { time, value })
                .collect(),
        ));
        self
    }

    /// Answer `status` for every request path starting with `prefix`.
    pub fn failing_on(mut self, prefix: &str, status: u16) -> Self {
        self.failures.push((prefix.into(), status));
        self
    }

    pub fn reachable(mut self) -> Self {
        self.reachable = true;
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }

    fn record(&self, path: &str) -> Result<(), TransportError> {
        self.requested.lock().unwrap().push(path.to_string());
        match self.failures.iter().find(|(prefix, _)| path.starts_with(prefix.as_str())) {
            Some((_, status)) => Err(TransportError::Status {
                url: format!("http://fake{}", path),
                status: *status,
                body: "{\"error\":{\"message\":\"fake failure\"}}".into(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MackerelApi for FakeMackerel {
    async fn list_services(&self) -> Result<Vec<ServiceDto>, TransportError> {
        self.record(&format!("{API_PREFIX}/services"))?;
        Ok(self
            .services
            .iter()
            .map(|(name, _)| ServiceDto { name: name.clone() })
            .collect())
    }

    async fn list_hosts(&self) -> Result<Vec<HostDto>, TransportError> {
        self.record(&format!("{API_PREFIX}/hosts"))?;
        Ok(self.hosts.iter().map(|(host, _)| host.clone()).collect())
    }

    async fn service_metric_names(&self, service_name: &str) -> Result<Vec<String>, TransportError> {
        self.record(&format!("{API_PREFIX}/services/{service_name}/metric-names"))?;
        Ok(self
            .services
            .iter()
            .find(|(name, _)| name == service_name)
            .map(|(_, metrics)| metrics.clone())
            .unwrap_or_default())
    }

    async fn host_metric_names(&self, host_id: &str) -> Result<Vec<String>, TransportError> {
        self.record(&format!("{API_PREFIX}/hosts/{host_id}/metric-names"))?;
        Ok(self
            .hosts
            .iter()
            .find(|(host, _)| host.id == host_id)
            .map(|(_, metrics)| metrics.clone())
            .unwrap_or_default())
    }

    async fn fetch_metric(&self, request_path: &str) -> Result<Vec<MetricPoint>, TransportError> {
        self.record(request_path)?;
        Ok(self
            .metrics
            .iter()
            .find(|(line, _)| request_path.starts_with(&format!("{API_PREFIX}{line}&")))
            .map(|(_, points)| points.clone())
            .unwrap_or_default())
    }

    async fn ping(&self) -> bool {
        self.requested.lock().unwrap().push("/".into());
        self.reachable
    }
}
