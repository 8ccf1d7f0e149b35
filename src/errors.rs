use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// Failure talking to the Mackerel API: network, status or payload.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Mackerel returned {status} for {url}: {body}")]
    Status { url: String, status: u16, body: String },

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Schema enumeration aborted on the first failed call.
#[derive(Debug, Error)]
#[error("Schema discovery failed: {0}")]
pub struct DiscoveryError(#[from] pub TransportError);

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Transport error: {0}")]
    TransportError(#[from] TransportError),

    #[error("{0}")]
    DiscoveryError(#[from] DiscoveryError),

    #[error("Body parsing error: {0}")]
    BodyParsingError(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

/// Helper for mapping any unknown error into internal error
pub fn internal_error<E: ToString>(err: E) -> AppError {
    AppError::InternalServerError(err.to_string())
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            AppError::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::TransportError(_) => StatusCode::BAD_GATEWAY,
            AppError::DiscoveryError(_) => StatusCode::BAD_GATEWAY,
            AppError::BodyParsingError(_) => StatusCode::BAD_REQUEST,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "is_successful": false,
            "error_msg": self.to_string()
        }));

        (status, body).into_response()
    }
}
