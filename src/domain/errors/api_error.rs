//! HTTP transport error types.

use thiserror::Error;

/// Request transport error variants.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ApiError {
    #[error("your session has expired, please log in again")]
    SessionExpired,

    #[error("you do not have permission to perform this action")]
    PermissionDenied,

    #[error("request rejected by CSRF protection: {message}")]
    CsrfRejected { message: String },

    #[error("request failed with status {status}: {message}")]
    RequestFailed { status: u16, message: String },

    #[error("network error: {message}")]
    Network { message: String },

    #[error("invalid response from server: {message}")]
    InvalidResponse { message: String },

    #[error("no credential available")]
    NoCredential,

    #[error("credential storage error: {message}")]
    Storage { message: String },

    #[error("unexpected error: {message}")]
    Unexpected { message: String },
}

impl ApiError {
    /// Creates a CSRF rejection error.
    #[must_use]
    pub fn csrf(message: impl Into<String>) -> Self {
        Self::CsrfRejected {
            message: message.into(),
        }
    }

    /// Creates a normalized request failure.
    #[must_use]
    pub fn request_failed(status: u16, message: impl Into<String>) -> Self {
        Self::RequestFailed {
            status,
            message: message.into(),
        }
    }

    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates an invalid-response error.
    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Creates a storage error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates an unexpected error.
    #[must_use]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Whether retrying later could succeed without user action.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::RequestFailed { .. })
    }

    /// Whether the caller must re-authenticate.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(self, Self::SessionExpired | Self::NoCredential)
    }
}
