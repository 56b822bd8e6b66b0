//! In-memory credential storage.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::entities::Credential;
use crate::domain::errors::ApiError;
use crate::domain::ports::CredentialStorePort;

/// Process-local credential store.
///
/// Used when the system keyring is unavailable and as the store of choice
/// in tests; the credential does not survive the process.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    credential: RwLock<Option<Credential>>,
}

impl MemoryCredentialStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store preloaded with a credential pair.
    #[must_use]
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            credential: RwLock::new(Some(credential)),
        }
    }
}

#[async_trait]
impl CredentialStorePort for MemoryCredentialStore {
    async fn get(&self) -> Result<Option<Credential>, ApiError> {
        Ok(self.credential.read().await.clone())
    }

    async fn set(&self, credential: &Credential) -> Result<(), ApiError> {
        *self.credential.write().await = Some(credential.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), ApiError> {
        *self.credential.write().await = None;
        Ok(())
    }
}
