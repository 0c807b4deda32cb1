/**
 * Error to HTTP Response Conversion
 *
 * Implements `IntoResponse` for `BackendError` so handlers can return
 * `Result<Json<T>, BackendError>` directly. Every error becomes a JSON body
 * of the form `{"error": "..."}` with the status code from
 * `BackendError::status_code()`.
 */
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::backend::error::BackendError;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("[Error] {}", self);
        } else {
            tracing::debug!("[Error] {} -> {}", self, status);
        }
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_status() {
        let response = BackendError::not_found("list").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation_response_status() {
        let response = BackendError::validation("title", "missing").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
