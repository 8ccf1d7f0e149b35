use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use crate::app_state::AppState;

/// Build the main application router
pub fn app_router() -> Router<AppState> {
    let api_v1 = Router::new()
        .nest("/runner", crate::api::routes::runner_routes::runner_routes());

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", api_v1)
        .fallback(handler_404)
        .layer(CorsLayer::very_permissive())
}

async fn root() -> &'static str {
    "Mackerel query runner is running!"
}

async fn health_check() -> &'static str {
    "OK"
}

async fn handler_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        "The requested resource was not found",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::build_app_state;
    use crate::core::config::runner_config_entity::RunnerConfig;
    use crate::core::config::runner_config_input::RunnerConfigInput;
    use crate::test_support::spawn_stub;
    use axum::extract::RawQuery;
    use axum::Json;
    use serde_json::{json, Value};

    fn vendor() -> Router {
        Router::new()
            .route("/", get(|| async { StatusCode::OK }))
            .route(
                "/api/v0/services",
                get(|| async { Json(json!({ "services": [{ "name": "web" }] })) }),
            )
            .route(
                "/api/v0/services/{name}/metric-names",
                get(|| async { Json(json!({ "names": ["custom.rps"] })) }),
            )
            .route(
                "/api/v0/hosts/{id}/metrics",
                get(|RawQuery(q): RawQuery| async move {
                    if q.as_deref().unwrap_or_default().starts_with("name=cpu&") {
                        (
                            StatusCode::OK,
                            Json(json!({ "metrics": [{ "time": 1609459200, "value": 42.0 }] })),
                        )
                    } else {
                        (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            Json(json!({ "error": { "message": "internal" } })),
                        )
                    }
                }),
            )
    }

    async fn spawn_app() -> String {
        let vendor_url = spawn_stub(vendor()).await;
        let config = RunnerConfig::load(RunnerConfigInput {
            api_key: Some("route-test-key-9999".into()),
            base_url: Some(vendor_url),
            discover_hosts: Some(false),
            ..Default::default()
        })
        .unwrap();
        let app = app_router().with_state(build_app_state(config).unwrap());
        spawn_stub(app).await
    }

    #[tokio::test]
    async fn health_and_fallback() {
        let base = spawn_app().await;
        let client = reqwest::Client::new();

        let health = client.get(format!("{base}/health")).send().await.unwrap();
        assert_eq!(health.status(), StatusCode::OK);

        let missing = client.get(format!("{base}/nope")).send().await.unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn runner_endpoints_end_to_end() {
        let base = spawn_app().await;
        let client = reqwest::Client::new();

        let ok: Value = client
            .get(format!("{base}/api/v1/runner/test-connection"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(ok["data"]["ok"], json!(true));

        let schema: Value = client
            .get(format!("{base}/api/v1/runner/schema"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(
            schema["data"],
            json!([{ "name": "web", "columns": ["/services/web/metrics?name=custom.rps"] }])
        );

        let cfg: Value = client
            .get(format!("{base}/api/v1/runner/configuration-schema"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(cfg["data"]["annotate_query"], json!(false));
        assert_eq!(cfg["data"]["schema"]["required"], json!(["api_key"]));
    }

    #[tokio::test]
    async fn query_success_and_vendor_failure() {
        let base = spawn_app().await;
        let client = reqwest::Client::new();

        let done: Value = client
            .post(format!("{base}/api/v1/runner/query"))
            .json(&json!({ "query": "from=1609459200\nto=1609462800\n/hosts/abc/metrics?name=cpu" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let table: Value = serde_json::from_str(done["data"]["data"].as_str().unwrap()).unwrap();
        assert_eq!(
            table["rows"],
            json!([{ "timestamp": "2021-01-01T00:00:00Z", "/hosts/abc/cpu": 42.0 }])
        );

        let failed: Value = client
            .post(format!("{base}/api/v1/runner/query"))
            .json(&json!({ "query": "/hosts/abc/metrics?name=cpu\n/hosts/abc/metrics?name=disk" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(failed["data"]["data"], Value::Null);
        assert!(failed["data"]["error"].as_str().unwrap().contains("500"));
    }

    #[tokio::test]
    async fn empty_query_is_rejected() {
        let base = spawn_app().await;
        let resp = reqwest::Client::new()
            .post(format!("{base}/api/v1/runner/query"))
            .json(&json!({ "query": "" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
