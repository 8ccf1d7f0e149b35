use async_trait::async_trait;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::mackerel_api_trait::MackerelApi;
use super::mackerel_dto::{
    HostDto, HostsResponse, MetricNamesResponse, MetricPoint, MetricsResponse, ServiceDto,
    ServicesResponse,
};
use crate::core::config::runner_config_entity::RunnerConfig;
use crate::errors::{AppError, TransportError};

pub const API_KEY_HEADER: &str = "x-api-key";
pub const API_PREFIX: &str = "/api/v0";

const ERROR_BODY_LIMIT: usize = 512;

/// reqwest client bound to one base URL, with the API key as a default header.
#[derive(Clone)]
pub struct MackerelClient {
    client: Client,
    base_url: String,
}

impl MackerelClient {
    pub fn new(config: &RunnerConfig) -> Result<Self, AppError> {
        let mut api_key = HeaderValue::from_str(config.api_key()).map_err(|_| {
            AppError::ConfigurationError("api_key contains characters not allowed in a header".into())
        })?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(API_KEY_HEADER), api_key);

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| AppError::ConfigurationError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, TransportError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| TransportError::Request { url: url.clone(), source })?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|source| TransportError::Request { url: url.clone(), source })?;

        if !status.is_success() {
            return Err(TransportError::Status {
                url,
                status: status.as_u16(),
                body: trim_str(&text, ERROR_BODY_LIMIT),
            });
        }

        serde_json::from_str(&text).map_err(|source| TransportError::Decode { url, source })
    }
}

#[async_trait]
impl MackerelApi for MackerelClient {
    async fn list_services(&self) -> Result<Vec<ServiceDto>, TransportError> {
        let resp: ServicesResponse = self.get_json(&format!("{API_PREFIX}/services")).await?;
        Ok(resp.services)
    }

    async fn list_hosts(&self) -> Result<Vec<HostDto>, TransportError> {
        let resp: HostsResponse = self.get_json(&format!("{API_PREFIX}/hosts")).await?;
        Ok(resp.hosts)
    }

    async fn service_metric_names(&self, service_name: &str) -> Result<Vec<String>, TransportError> {
        let path = format!(
            "{API_PREFIX}/services/{}/metric-names",
            urlencoding::encode(service_name)
        );
        let resp: MetricNamesResponse = self.get_json(&path).await?;
        Ok(resp.names)
    }

    async fn host_metric_names(&self, host_id: &str) -> Result<Vec<String>, TransportError> {
        let path = format!("{API_PREFIX}/hosts/{}/metric-names", urlencoding::encode(host_id));
        let resp: MetricNamesResponse = self.get_json(&path).await?;
        Ok(resp.names)
    }

    async fn fetch_metric(&self, request_path: &str) -> Result<Vec<MetricPoint>, TransportError> {
        let resp: MetricsResponse = self.get_json(request_path).await?;
        Ok(resp.metrics)
    }

    async fn ping(&self) -> bool {
        match self.client.get(&self.base_url).send().await {
            Ok(resp) => {
                let status = resp.status();
                debug!(%status, "Connection check answered");
                status.is_success()
            }
            Err(err) => {
                warn!(error = %err, "Connection check failed");
                false
            }
        }
    }
}

fn trim_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len).collect();
        format!("{}...<truncated>", head)
    }
}
