//! Authentication port definition.

use async_trait::async_trait;

use crate::domain::entities::{AdminUser, Credential};
use crate::domain::errors::ApiError;

/// Port for backend authentication operations.
#[async_trait]
pub trait AuthPort: Send + Sync {
    /// Authenticates with admin credentials, returning the token pair and
    /// the user profile.
    async fn login(&self, email: &str, password: &str) -> Result<(Credential, AdminUser), ApiError>;

    /// Invalidates the server-side session. Best effort; callers clear
    /// local state regardless of the outcome.
    async fn logout(&self) -> Result<(), ApiError>;
}
