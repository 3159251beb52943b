//! Common error types shared across crates.

use thiserror::Error;
use token_vault::VaultError;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::RecordRejected`] → 422
/// - [`ServiceError::Internal`] → 500
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed: a bad context, an unknown key version or bad encoding.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The token record failed authentication and cannot be trusted.
    #[error("token record rejected")]
    RecordRejected,

    /// An unexpected internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::RecordRejected => 422,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Short machine-readable code for the error response body.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::RecordRejected => "record_rejected",
            ServiceError::Internal(_) => "internal_error",
        }
    }
}

impl From<VaultError> for ServiceError {
    fn from(e: VaultError) -> Self {
        match e {
            VaultError::InputValidation(msg) | VaultError::Encoding(msg) => {
                ServiceError::BadRequest(msg)
            }
            VaultError::AuthenticationFailure => ServiceError::RecordRejected,
        }
    }
}
