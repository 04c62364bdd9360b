//! HTTP error response handling for the API
//!
//! Converts batch-level errors into HTTP responses with the mapped status code
//! and a JSON [`ApiError`](crate::error::ApiError) body.

use crate::error::{ApiError, Error, ToHttpStatus};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        tracing::error!(error = %self, status = status_code.as_u16(), "batch request failed");

        let api_error: ApiError = self.into();

        (status_code, Json(api_error)).into_response()
    }
}
