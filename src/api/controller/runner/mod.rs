use axum::extract::State;
use axum::Json;
use validator::Validate;

use crate::api::dto::runner_dto::{ConfigurationSchemaResponse, RunQueryRequest, TestConnectionResponse};
use crate::api::dto::ApiResponse;
use crate::api::util::json::to_json;
use crate::app_state::AppState;
use crate::domain::runner::query_runner_service::{QueryOutcome, QueryRunner};
use crate::domain::schema::schema_service::SchemaEntry;
use crate::errors::AppError;

pub struct RunnerController;

impl RunnerController {
    pub async fn configuration_schema() -> Result<Json<ApiResponse<ConfigurationSchemaResponse>>, AppError> {
        to_json(Ok(ConfigurationSchemaResponse {
            schema: <QueryRunner>::configuration_schema(),
            annotate_query: <QueryRunner>::annotate_query(),
        }))
    }

    pub async fn test_connection(
        State(state): State<AppState>,
    ) -> Result<Json<ApiResponse<TestConnectionResponse>>, AppError> {
        let ok = state.runner.test_connection().await;
        to_json(Ok(TestConnectionResponse { ok }))
    }

    pub async fn get_schema(
        State(state): State<AppState>,
    ) -> Result<Json<ApiResponse<Vec<SchemaEntry>>>, AppError> {
        to_json(state.runner.get_schema().await)
    }

    pub async fn run_query(
        State(state): State<AppState>,
        Json(payload): Json<RunQueryRequest>,
    ) -> Result<Json<ApiResponse<QueryOutcome>>, AppError> {
        payload
            .validate()
            .map_err(|e| AppError::BodyParsingError(e.to_string()))?;
        to_json(
            state
                .runner
                .run_query(&payload.query, payload.user.as_deref())
                .await,
        )
    }
}
