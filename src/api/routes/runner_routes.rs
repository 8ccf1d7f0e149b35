//! Runner routes (e.g., /api/v1/runner/*)

use axum::{routing::{get, post}, Router};
use crate::api::controller::runner::RunnerController;
use crate::app_state::AppState;

pub fn runner_routes() -> Router<AppState> {
    Router::new()
        .route("/configuration-schema", get(RunnerController::configuration_schema))
        .route("/test-connection", get(RunnerController::test_connection))
        .route("/schema", get(RunnerController::get_schema))
        .route("/query", post(RunnerController::run_query))
}
