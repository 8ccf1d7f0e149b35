use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::query::query_translator::TimeWindow;
use crate::domain::schema::schema_service::SchemaEntry;
use crate::errors::TransportError;

/// Receives runner events. Nothing handed to an observer carries the API key.
pub trait QueryObserver: Send + Sync {
    fn window_resolved(&self, _query_id: Uuid, _window: &TimeWindow, _metrics: usize, _user: Option<&str>) {}

    fn request_issued(&self, _query_id: Uuid, _request_path: &str) {}

    fn query_completed(&self, _query_id: Uuid, _columns: usize, _rows: usize) {}

    fn query_failed(&self, _query_id: Uuid, _error: &TransportError) {}

    fn catalog_assembled(&self, _catalog: &[SchemaEntry]) {}
}

/// Default observer: structured `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl QueryObserver for TracingObserver {
    fn window_resolved(&self, query_id: Uuid, window: &TimeWindow, metrics: usize, user: Option<&str>) {
        info!(
            %query_id,
            from = window.from,
            to = window.to,
            metrics,
            user = user.unwrap_or("-"),
            "Running Mackerel query"
        );
    }

    fn request_issued(&self, query_id: Uuid, request_path: &str) {
        debug!(%query_id, request_path, "Fetching metric");
    }

    fn query_completed(&self, query_id: Uuid, columns: usize, rows: usize) {
        info!(%query_id, columns, rows, "Query finished");
    }

    fn query_failed(&self, query_id: Uuid, error: &TransportError) {
        warn!(%query_id, error = %error, "Query aborted");
    }

    fn catalog_assembled(&self, catalog: &[SchemaEntry]) {
        let columns: usize = catalog.iter().map(|e| e.columns.len()).sum();
        info!(sources = catalog.len(), columns, "Schema discovered");
        debug!(catalog = ?catalog, "Schema catalog");
    }
}
