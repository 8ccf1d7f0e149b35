use chrono::{DateTime, Utc};

use super::query_directive::{classify_line, QueryDirective};
use crate::core::client::mackerel_client::API_PREFIX;

pub const DEFAULT_WINDOW_SECS: i64 = 3600;
pub const METRIC_NAME_MARKER: &str = "metrics?name=";

/// Shared `[from, to)` range, epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub from: i64,
    pub to: i64,
}

impl TimeWindow {
    pub fn ending_at(now: DateTime<Utc>) -> Self {
        let to = now.timestamp();
        Self {
            from: to - DEFAULT_WINDOW_SECS,
            to,
        }
    }
}

/// One metric line of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricRequest {
    /// Path as written, appended to `/api/v0`.
    pub path: String,
    /// Column label; the query line as written.
    pub friendly_name: String,
    /// Record key; the line without the `metrics?name=` marker.
    pub short_name: String,
}

impl MetricRequest {
    pub fn from_line(line: &str) -> Self {
        Self {
            path: line.to_string(),
            friendly_name: line.to_string(),
            short_name: line.replace(METRIC_NAME_MARKER, ""),
        }
    }

    pub fn request_path(&self, window: &TimeWindow) -> String {
        format!(
            "{}{}&from={}&to={}",
            API_PREFIX, self.path, window.from, window.to
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    pub window: TimeWindow,
    pub metrics: Vec<MetricRequest>,
}

/// Resolve the whole window first, then list metric requests in line order.
pub fn translate(query: &str, now: DateTime<Utc>) -> QueryPlan {
    let mut window = TimeWindow::ending_at(now);
    let mut metrics: Vec<MetricRequest> = Vec::new();

    let directives = query
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(classify_line);

    for directive in directives {
        match directive {
            QueryDirective::TimeFrom(from) => window.from = from,
            QueryDirective::TimeTo(to) => window.to = to,
            QueryDirective::MetricPath(path) => {
                let request = MetricRequest::from_line(&path);
                // one column per record key
                if !metrics.iter().any(|m| m.short_name == request.short_name) {
                    metrics.push(request);
                }
            }
        }
    }

    QueryPlan { window, metrics }
}
