//! Runner API DTOs
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RunQueryRequest {
    #[validate(length(min = 1))]
    pub query: String,
    #[validate(length(min = 1))]
    pub user: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TestConnectionResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize)]
pub struct ConfigurationSchemaResponse {
    pub schema: serde_json::Value,
    pub annotate_query: bool,
}
