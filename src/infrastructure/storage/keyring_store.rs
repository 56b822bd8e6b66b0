//! Keyring-backed credential storage.

use async_trait::async_trait;
use keyring::Entry;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::entities::Credential;
use crate::domain::errors::ApiError;
use crate::domain::ports::CredentialStorePort;

const KEYRING_SERVICE: &str = "courierdesk";
const KEYRING_USER: &str = "session";

/// The pair is stored as one JSON secret so both tokens are replaced
/// atomically.
#[derive(Serialize, Deserialize)]
struct StoredPair {
    access: String,
    refresh: String,
}

/// System keyring credential storage adapter.
pub struct KeyringCredentialStore {
    service: String,
    user: String,
}

impl KeyringCredentialStore {
    /// Creates a store with default names.
    #[must_use]
    pub fn new() -> Self {
        Self {
            service: KEYRING_SERVICE.to_string(),
            user: KEYRING_USER.to_string(),
        }
    }

    /// Creates a store with custom names.
    #[must_use]
    pub fn with_names(service: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            user: user.into(),
        }
    }

    fn entry(&self) -> Result<Entry, ApiError> {
        Entry::new(&self.service, &self.user)
            .map_err(|e| ApiError::storage(format!("failed to access keyring: {e}")))
    }
}

impl Default for KeyringCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStorePort for KeyringCredentialStore {
    async fn get(&self) -> Result<Option<Credential>, ApiError> {
        debug!(service = %self.service, "Retrieving credential from keyring");

        let entry = self.entry()?;

        match entry.get_password() {
            Ok(secret) => {
                let pair: StoredPair = serde_json::from_str(&secret)
                    .map_err(|e| ApiError::storage(format!("stored credential corrupt: {e}")))?;
                Ok(Some(Credential::new(pair.access, pair.refresh)))
            }
            Err(keyring::Error::NoEntry) => {
                debug!("No credential stored in keyring");
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "Failed to retrieve credential from keyring");
                Err(ApiError::storage(e.to_string()))
            }
        }
    }

    async fn set(&self, credential: &Credential) -> Result<(), ApiError> {
        debug!(service = %self.service, "Storing credential in keyring");

        let entry = self.entry()?;
        let secret = serde_json::to_string(&StoredPair {
            access: credential.access().to_string(),
            refresh: credential.refresh().to_string(),
        })
        .map_err(|e| ApiError::storage(e.to_string()))?;

        entry.set_password(&secret).map_err(|e| {
            warn!(error = %e, "Failed to store credential in keyring");
            ApiError::storage(e.to_string())
        })?;

        debug!("Credential stored successfully");
        Ok(())
    }

    async fn clear(&self) -> Result<(), ApiError> {
        debug!(service = %self.service, "Deleting credential from keyring");

        let entry = self.entry()?;

        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => {
                debug!("No credential to delete");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to delete credential from keyring");
                Err(ApiError::storage(e.to_string()))
            }
        }
    }
}
