use axum::Json;

use crate::api::dto::ApiResponse;
use crate::errors::AppError;

/// Map a domain Result<T> into Json<ApiResponse<T>>, leaving AppError to pick the status.
pub fn to_json<T: serde::Serialize>(
    result: Result<T, AppError>,
) -> Result<Json<ApiResponse<T>>, AppError> {
    result.map(|value| Json(ApiResponse::ok(value)))
}
