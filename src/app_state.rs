use std::sync::Arc;

use crate::core::config::runner_config_entity::RunnerConfig;
use crate::domain::runner::query_runner_service::QueryRunner;
use crate::errors::AppError;

#[derive(Clone)]
pub struct AppState {
    pub runner: Arc<QueryRunner>,
}

pub fn build_app_state(config: RunnerConfig) -> Result<AppState, AppError> {
    Ok(AppState {
        runner: Arc::new(QueryRunner::new(config)?),
    })
}
