//! Authentication DTOs.

use crate::domain::entities::AdminUser;

/// Login request carrying admin credentials.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    /// Admin login email.
    pub email: String,
    /// Admin password.
    pub password: String,
}

impl LoginRequest {
    /// Creates a new login request.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Authenticated user profile.
    pub user: AdminUser,
    /// Whether the credential pair was persisted to durable storage.
    pub credential_persisted: bool,
}

impl LoginOutcome {
    /// Creates a new login outcome.
    #[must_use]
    pub const fn new(user: AdminUser, credential_persisted: bool) -> Self {
        Self {
            user,
            credential_persisted,
        }
    }
}
