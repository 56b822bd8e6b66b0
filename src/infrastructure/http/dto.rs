//! Backend HTTP wire DTOs.

use serde::{Deserialize, Serialize};

use crate::domain::entities::AdminUser;

/// Error payload shape shared by backend endpoints.
///
/// The backend is inconsistent about which field carries the message, so
/// all known spellings are accepted.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    /// DRF-style detail message.
    #[serde(default)]
    pub detail: Option<String>,
    /// Free-form message field.
    #[serde(default)]
    pub message: Option<String>,
    /// Legacy error field.
    #[serde(default)]
    pub error: Option<String>,
    /// Machine-readable error code.
    #[serde(default)]
    pub code: Option<String>,
}

impl ErrorBody {
    /// Parses an error body, returning an empty one when the payload is not
    /// JSON at all.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_default()
    }

    /// Best human-readable message, falling back to the given default.
    #[must_use]
    pub fn normalized_message(&self, fallback: &str) -> String {
        self.detail
            .clone()
            .or_else(|| self.message.clone())
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| fallback.to_string())
    }

    /// Whether the body reports an anti-forgery failure.
    #[must_use]
    pub fn is_csrf_failure(&self) -> bool {
        self.detail
            .as_deref()
            .is_some_and(|detail| detail.contains("CSRF"))
    }

    /// Whether the body reports a stale access token outside of a 401.
    #[must_use]
    pub fn is_stale_token(&self) -> bool {
        self.code.as_deref() == Some("token_not_valid")
            || self
                .detail
                .as_deref()
                .is_some_and(|detail| detail.contains("token not valid"))
    }
}

/// Refresh request body.
#[derive(Debug, Serialize)]
pub struct RefreshRequest<'a> {
    /// Stored refresh token.
    pub refresh: &'a str,
}

/// Refresh response body.
#[derive(Debug, Deserialize)]
pub struct RefreshResponse {
    /// Newly minted access token.
    pub access: String,
}

/// Login request body.
#[derive(Debug, Serialize)]
pub struct LoginBody<'a> {
    /// Admin email.
    pub email: &'a str,
    /// Admin password.
    pub password: &'a str,
}

/// Login response body.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    /// Access token.
    pub access: String,
    /// Refresh token.
    pub refresh: String,
    /// Authenticated user profile.
    pub user: AdminUser,
}
