use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use super::query_translator::MetricRequest;
use crate::core::client::mackerel_dto::MetricPoint;

pub const TIMESTAMP_COLUMN: &str = "timestamp";

pub type MetricSeries = Vec<MetricPoint>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Datetime,
    Float,
    String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultColumn {
    pub name: String,
    pub friendly_name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

/// The `{columns, rows}` document handed back to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultTable {
    pub columns: Vec<ResultColumn>,
    pub rows: Vec<Map<String, Value>>,
}

impl ResultTable {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Merge per-metric series into one row per distinct timestamp, ascending,
/// carrying each metric's last value forward (0.0 until its first sample).
pub fn assemble(series: &[(MetricRequest, MetricSeries)]) -> ResultTable {
    let mut columns = Vec::with_capacity(series.len() + 1);
    columns.push(ResultColumn {
        name: TIMESTAMP_COLUMN.into(),
        friendly_name: TIMESTAMP_COLUMN.into(),
        column_type: ColumnType::Datetime,
    });
    columns.extend(series.iter().map(|(req, _)| ResultColumn {
        name: req.short_name.clone(),
        friendly_name: req.friendly_name.clone(),
        column_type: ColumnType::Float,
    }));

    let mut merged: BTreeMap<i64, HashMap<&str, f64>> = BTreeMap::new();
    for (req, points) in series {
        for point in points {
            merged
                .entry(point.time)
                .or_default()
                .insert(req.short_name.as_str(), point.value);
        }
    }

    let mut last: Vec<f64> = vec![0.0; series.len()];
    let rows = merged
        .into_iter()
        .map(|(time, values)| {
            let mut row = Map::new();
            row.insert(TIMESTAMP_COLUMN.into(), timestamp_value(time));
            for (idx, (req, _)) in series.iter().enumerate() {
                if let Some(v) = values.get(req.short_name.as_str()) {
                    last[idx] = *v;
                }
                row.insert(req.short_name.clone(), Value::from(last[idx]));
            }
            row
        })
        .collect();

    ResultTable { columns, rows }
}

fn timestamp_value(time: i64) -> Value {
    DateTime::<Utc>::from_timestamp(time, 0)
        .map(|dt| Value::String(dt.to_rfc3339_opts(SecondsFormat::Secs, true)))
        .unwrap_or_else(|| Value::from(time))
}
