//! Admin session credential pair value object.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Access/refresh token pair for an authenticated admin session.
///
/// Exactly one logical pair exists per session; it is created at login,
/// replaced on refresh, and destroyed on logout or unrecoverable auth
/// failure.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Credential {
    access: String,
    refresh: String,
}

#[derive(Deserialize)]
struct AccessClaims {
    exp: i64,
}

impl Credential {
    /// Creates a new credential pair.
    #[must_use]
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: refresh.into(),
        }
    }

    /// Returns the short-lived bearer token.
    #[must_use]
    pub fn access(&self) -> &str {
        &self.access
    }

    /// Returns the long-lived refresh token.
    #[must_use]
    pub fn refresh(&self) -> &str {
        &self.refresh
    }

    /// Returns a copy with the access token replaced, keeping the refresh
    /// token. Used after a successful silent refresh.
    #[must_use]
    pub fn with_access(&self, access: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: self.refresh.clone(),
        }
    }

    /// Whether the access token's `exp` claim lies in the past.
    ///
    /// Tokens whose payload cannot be decoded count as expired.
    #[must_use]
    pub fn is_access_expired(&self) -> bool {
        Self::expiry_of(&self.access)
            .is_none_or(|exp| exp <= chrono::Utc::now().timestamp())
    }

    fn expiry_of(token: &str) -> Option<i64> {
        let payload = token.split('.').nth(1)?;
        let decoded = URL_SAFE_NO_PAD.decode(payload).ok()?;
        let claims: AccessClaims = serde_json::from_slice(&decoded).ok()?;
        Some(claims.exp)
    }

    /// Returns a masked access token for display.
    #[must_use]
    pub fn masked(&self) -> String {
        mask(&self.access)
    }
}

fn mask(value: &str) -> String {
    if value.len() <= 10 {
        return "*".repeat(value.len());
    }

    let visible_prefix = &value[..4];
    let visible_suffix = &value[value.len() - 4..];
    format!("{visible_prefix}...{visible_suffix}")
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access", &self.masked())
            .field("refresh", &mask(&self.refresh))
            .finish()
    }
}
