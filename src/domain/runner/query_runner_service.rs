use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::core::client::mackerel_api_trait::MackerelApi;
use crate::core::client::mackerel_client::MackerelClient;
use crate::core::config::runner_config_entity::RunnerConfig;
use crate::domain::observer::query_observer::{QueryObserver, TracingObserver};
use crate::domain::query::query_translator::translate;
use crate::domain::query::result_assembler::assemble;
use crate::domain::schema::schema_service::{self, SchemaEntry};
use crate::errors::{internal_error, AppError};

/// `(data, error)` pair the host expects back from a query run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryOutcome {
    pub data: Option<String>,
    pub error: Option<String>,
}

impl QueryOutcome {
    pub fn succeeded(data: String) -> Self {
        Self { data: Some(data), error: None }
    }

    pub fn failed(error: String) -> Self {
        Self { data: None, error: Some(error) }
    }
}

/// Data source facade: everything the host framework calls.
pub struct QueryRunner<C: MackerelApi = MackerelClient> {
    config: Arc<RunnerConfig>,
    client: C,
    observer: Arc<dyn QueryObserver>,
}

impl QueryRunner<MackerelClient> {
    pub fn new(config: RunnerConfig) -> Result<Self, AppError> {
        let client = MackerelClient::new(&config)?;
        Ok(Self::with_client(config, client, Arc::new(TracingObserver)))
    }
}

impl<C: MackerelApi> QueryRunner<C> {
    pub fn with_client(config: RunnerConfig, client: C, observer: Arc<dyn QueryObserver>) -> Self {
        Self {
            config: Arc::new(config),
            client,
            observer,
        }
    }

    pub fn configuration_schema() -> Value {
        RunnerConfig::configuration_schema()
    }

    /// Query text must reach the runner untouched; the host may not prepend comments.
    pub fn annotate_query() -> bool {
        false
    }

    pub async fn test_connection(&self) -> bool {
        self.client.ping().await
    }

    pub async fn get_schema(&self) -> Result<Vec<SchemaEntry>, AppError> {
        let catalog = schema_service::discover(&self.client, self.config.discover_hosts).await?;
        self.observer.catalog_assembled(&catalog);
        Ok(catalog)
    }

    /// Transport failures come back as `QueryOutcome::failed`; anything else is an `Err`.
    pub async fn run_query(&self, query: &str, user: Option<&str>) -> Result<QueryOutcome, AppError> {
        self.run_query_at(query, user, Utc::now()).await
    }

    pub(crate) async fn run_query_at(
        &self,
        query: &str,
        user: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<QueryOutcome, AppError> {
        let query_id = Uuid::new_v4();
        let plan = translate(query, now);
        self.observer
            .window_resolved(query_id, &plan.window, plan.metrics.len(), user);

        let mut series = Vec::with_capacity(plan.metrics.len());
        for metric in plan.metrics {
            let request_path = metric.request_path(&plan.window);
            self.observer.request_issued(query_id, &request_path);

            match self.client.fetch_metric(&request_path).await {
                Ok(points) => series.push((metric, points)),
                Err(err) => {
                    self.observer.query_failed(query_id, &err);
                    return Ok(QueryOutcome::failed(err.to_string()));
                }
            }
        }

        let table = assemble(&series);
        let data = table.to_json().map_err(internal_error)?;
        self.observer
            .query_completed(query_id, table.columns.len(), table.rows.len());

        Ok(QueryOutcome::succeeded(data))
    }
}
