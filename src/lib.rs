//! Mackerel data source for dashboard/query tools: turns a small line-based
//! query language into Mackerel API calls and returns a `{columns, rows}` table.

pub mod api;
pub mod app_state;
pub mod core;
pub mod domain;
pub mod errors;
pub mod routes;

#[cfg(test)]
pub(crate) mod test_support;
