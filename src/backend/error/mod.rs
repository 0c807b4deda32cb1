//! Backend error handling.
//!
//! One taxonomy covers the whole server: not-found lookups, input
//! validation, database failures, and serialization. The conversion module
//! maps each variant onto an HTTP response with a JSON error body.

pub mod conversion;
pub mod types;

pub use types::BackendError;

/// Convenience result alias used throughout the backend.
pub type BackendResult<T> = Result<T, BackendError>;
