use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("{0}")]
    InvalidPayload(String),
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl SinkError {
    fn status_code(&self) -> StatusCode {
        match self {
            SinkError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for SinkError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::debug!(error = %self, "rejected request");
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
