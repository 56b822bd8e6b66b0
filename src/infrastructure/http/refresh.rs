//! Single-flight credential refresh coordinator.
//!
//! The HTTP 401 path and the feed's token-expired close path both need a
//! silent refresh and can race on the same expired credential. All callers
//! go through one coordinator: a refresh that already replaced the observed
//! access token is reused instead of repeated.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::entities::Credential;
use crate::domain::errors::ApiError;
use crate::domain::ports::CredentialStorePort;

use super::dto::{RefreshRequest, RefreshResponse};

/// Serializes credential refresh calls process-wide.
pub struct RefreshCoordinator {
    http: reqwest::Client,
    refresh_url: String,
    store: Arc<dyn CredentialStorePort>,
    flight: Mutex<()>,
}

impl RefreshCoordinator {
    /// Creates a coordinator that refreshes against the given endpoint.
    #[must_use]
    pub fn new(
        http: reqwest::Client,
        refresh_url: impl Into<String>,
        store: Arc<dyn CredentialStorePort>,
    ) -> Self {
        Self {
            http,
            refresh_url: refresh_url.into(),
            store,
            flight: Mutex::new(()),
        }
    }

    /// Refreshes the stored credential pair, joining an in-flight refresh
    /// when one already replaced `observed_access`.
    ///
    /// # Errors
    /// Returns `ApiError::SessionExpired` when no refresh token is stored or
    /// the refresh endpoint rejects the request; the caller decides whether
    /// to clear the store.
    pub async fn refresh(&self, observed_access: &str) -> Result<Credential, ApiError> {
        let _flight = self.flight.lock().await;

        let current = self.store.get().await?.ok_or(ApiError::SessionExpired)?;

        if current.access() != observed_access {
            debug!("Credential already refreshed by another caller");
            return Ok(current);
        }

        debug!("Requesting new access token");

        let response = self
            .http
            .post(&self.refresh_url)
            .json(&RefreshRequest {
                refresh: current.refresh(),
            })
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Refresh request failed to reach the backend");
                ApiError::network(e.to_string())
            })?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "Refresh token rejected");
            return Err(ApiError::SessionExpired);
        }

        let body: RefreshResponse = response
            .json()
            .await
            .map_err(|e| ApiError::invalid_response(format!("refresh response: {e}")))?;

        let renewed = current.with_access(body.access);
        self.store.set(&renewed).await?;

        info!("Access token refreshed");
        Ok(renewed)
    }
}
