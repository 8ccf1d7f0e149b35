use std::env;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mackerel_query_runner::app_state::build_app_state;
use mackerel_query_runner::core::config::runner_config_entity::RunnerConfig;
use mackerel_query_runner::routes::app_router;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let (writer, _guard) = tracing_appender::non_blocking(std::io::stdout());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(writer)
        .with_target(true)
        .with_level(true)
        .init();

    let config = RunnerConfig::from_env().context("invalid runner configuration")?;
    info!(config = ?config, "Configuration loaded");

    let state = build_app_state(config).context("failed to build runner")?;
    let app = app_router().with_state(state);

    let addr = env::var("RUNNER_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(?err, "Failed to listen for shutdown signal");
    }
}
