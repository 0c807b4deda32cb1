/**
 * Backend Error Types
 *
 * This module defines the error taxonomy for the server:
 *
 * - `NotFound` - a CRUD operation referenced a nonexistent list/task id;
 *   surfaced as 404, never retried.
 * - `Validation` - a required field was missing or empty; surfaced as 400,
 *   the caller must correct the input.
 * - `Database` - sqlx failures. Callers treat these as transient I/O: the
 *   client discards any optimistic change and reloads the list.
 * - `Serialization` - JSON encode/decode failures, a server bug if seen.
 *
 * Unknown-connection races in the presence registry are deliberately NOT an
 * error variant: referencing a connection that already disconnected is an
 * expected race and is handled as a logged no-op at the registry.
 */
use axum::http::StatusCode;
use thiserror::Error;

/// Backend-specific error types.
#[derive(Debug, Error)]
pub enum BackendError {
    /// A list or task lookup matched nothing.
    #[error("{entity} not found")]
    NotFound {
        /// What was looked up ("list", "task").
        entity: &'static str,
    },

    /// A request carried missing or invalid input.
    #[error("validation failed for {field}: {message}")]
    Validation { field: &'static str, message: String },

    /// The data store failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// JSON serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BackendError {
    /// Create a not-found error for the given entity kind.
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    /// Create a validation error.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Database(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        let error = BackendError::not_found("task");
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(error.to_string(), "task not found");
    }

    #[test]
    fn test_validation_status() {
        let error = BackendError::validation("title", "must not be empty");
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert!(error.to_string().contains("title"));
    }

    #[test]
    fn test_row_not_found_maps_to_404() {
        let error = BackendError::from(sqlx::Error::RowNotFound);
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
    }
}
