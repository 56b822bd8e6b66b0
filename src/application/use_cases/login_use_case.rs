//! Login and logout use case implementation.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::dto::{LoginOutcome, LoginRequest};
use crate::domain::errors::ApiError;
use crate::domain::ports::{AuthPort, CredentialStorePort};

/// Handles the admin authentication workflow.
#[derive(Clone)]
pub struct LoginUseCase {
    auth_port: Arc<dyn AuthPort>,
    store_port: Arc<dyn CredentialStorePort>,
}

impl LoginUseCase {
    /// Creates new login use case.
    #[must_use]
    pub const fn new(
        auth_port: Arc<dyn AuthPort>,
        store_port: Arc<dyn CredentialStorePort>,
    ) -> Self {
        Self {
            auth_port,
            store_port,
        }
    }

    /// Executes login with the provided request.
    ///
    /// # Errors
    /// Returns an error if the backend rejects the credentials.
    pub async fn execute(&self, request: LoginRequest) -> Result<LoginOutcome, ApiError> {
        debug!(email = %request.email, "Attempting admin login");

        let (credential, user) = self
            .auth_port
            .login(&request.email, &request.password)
            .await
            .map_err(|e| {
                warn!(error = %e, "Login rejected");
                e
            })?;

        info!(user_id = user.id(), email = %user.email(), "Successfully authenticated");

        let credential_persisted = match self.store_port.set(&credential).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "Failed to persist credential pair");
                false
            }
        };

        Ok(LoginOutcome::new(user, credential_persisted))
    }

    /// Whether a stored credential exists with an unexpired access token.
    ///
    /// # Errors
    /// Returns an error when the credential store cannot be read.
    pub async fn is_authenticated(&self) -> Result<bool, ApiError> {
        Ok(self
            .store_port
            .get()
            .await?
            .is_some_and(|credential| !credential.is_access_expired()))
    }

    /// Logs out: invalidates the server-side session best-effort and always
    /// clears local credentials.
    ///
    /// # Errors
    /// Returns an error only when local clearing fails.
    pub async fn logout(&self) -> Result<(), ApiError> {
        if let Err(e) = self.auth_port.logout().await {
            // Server-side invalidation is best effort.
            warn!(error = %e, "Logout request failed, clearing local session anyway");
        }

        self.store_port.clear().await?;
        info!("Local session cleared");
        Ok(())
    }
}
