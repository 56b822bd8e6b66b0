//! Credential store port definition.

use async_trait::async_trait;

use crate::domain::entities::Credential;
use crate::domain::errors::ApiError;

/// Port for persisting the session credential pair.
///
/// The store is shared, process-wide state; writers replace the whole pair
/// and the last writer wins.
#[async_trait]
pub trait CredentialStorePort: Send + Sync {
    /// Retrieves the stored credential pair.
    async fn get(&self) -> Result<Option<Credential>, ApiError>;

    /// Stores a credential pair, replacing any previous one.
    async fn set(&self, credential: &Credential) -> Result<(), ApiError>;

    /// Deletes the stored credential pair.
    async fn clear(&self) -> Result<(), ApiError>;

    /// Checks whether a credential pair exists.
    async fn has_credential(&self) -> Result<bool, ApiError> {
        Ok(self.get().await?.is_some())
    }
}
