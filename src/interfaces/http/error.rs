use crate::error::BotError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

/// Bridges the crate error taxonomy to HTTP responses.
#[derive(Debug)]
pub struct ApiError(pub BotError);

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl From<BotError> for ApiError {
    fn from(err: BotError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            BotError::Validation(_) => StatusCode::BAD_REQUEST,
            BotError::NotFound(_) => StatusCode::NOT_FOUND,
            BotError::Provider(_) | BotError::Oracle(_) => StatusCode::BAD_GATEWAY,
            BotError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(status = %status, error = %self.0, "request failed");
        }
        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
