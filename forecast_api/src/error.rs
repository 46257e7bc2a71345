//! HTTP error mapping.

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;
use tracing::error;

use crate::{preprocess::PreprocessError, rollout::ForecastError};

/// Error surface of the HTTP handlers.
///
/// A series too short for the model is the caller's fault (400); everything
/// else is ours (500). Bodies carry a `detail` field either way.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl From<ForecastError> for ApiError {
    fn from(err: ForecastError) -> Self {
        match err {
            ForecastError::Preprocess(PreprocessError::InsufficientData { required, actual }) => {
                ApiError::BadRequest(format!(
                    "Not enough data. Need at least {required} values, got {actual}."
                ))
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, detail) = match self {
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail),
            ApiError::Internal(detail) => {
                error!(%detail, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, detail)
            }
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
