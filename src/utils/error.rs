//! Error handling module
//!
//! Defines the application error taxonomy and the provider-call error
//! classification

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application error taxonomy
///
/// Every failure surfaced to a caller is one of these three
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed or incomplete request, rejected before the engine runs
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Primary and fallback model calls both failed
    #[error("Both primary and fallback models failed.")]
    ProviderFailure,

    /// Any other unexpected failure
    #[error("Unexpected server error")]
    Internal(String),
}

/// Errors classified at the provider-call boundary
///
/// Kept narrow on purpose: the engine maps an exhausted primary/fallback
/// pair of any of these onto `AppError::ProviderFailure`
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Transport-level failure (connect, timeout, broken stream)
    #[error("provider network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Upstream returned HTTP 429
    #[error("provider rate limit exceeded")]
    RateLimit,

    /// Upstream returned a non-success status
    #[error("provider API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Upstream body could not be decoded
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

/// Error response envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error information
    pub error: ErrorInfo,
}

/// Error information
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Error type
    #[serde(rename = "type")]
    pub error_type: String,
    /// Error message
    pub message: String,
    /// Whether the caller may retry
    pub retryable: bool,
}

impl AppError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ProviderFailure => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error type string
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::ProviderFailure => "provider_failure",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// Whether the caller may retry the request
    pub fn retryable(&self) -> bool {
        !matches!(self, AppError::Validation(_))
    }

    /// Message safe to surface to callers
    ///
    /// Internal detail stays in the server log
    pub fn public_message(&self) -> String {
        match self {
            AppError::Internal(_) => "Unexpected server error".to_string(),
            other => other.to_string(),
        }
    }

    /// Build the response envelope for this error
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorInfo {
                error_type: self.error_type().to_string(),
                message: self.public_message(),
                retryable: self.retryable(),
            },
        }
    }
}

/// Implement IntoResponse so handlers can return errors directly
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            AppError::Validation(detail) => {
                tracing::warn!("Client error: {} - Status code: {}", detail, status)
            }
            AppError::ProviderFailure => {
                tracing::error!("Provider failure - Status code: {}", status)
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {} - Status code: {}", detail, status)
            }
        }

        (status, Json(self.to_error_response())).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;
