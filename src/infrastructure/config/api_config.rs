//! Backend endpoint configuration.
//!
//! All HTTP paths resolve under the configured root forced to end with the
//! `/api` segment; WebSocket URLs are derived from the same root by scheme
//! substitution.

/// Login endpoint, relative to the API base.
pub const LOGIN_ENDPOINT: &str = "/user/admin/login/";
/// Logout endpoint, relative to the API base.
pub const LOGOUT_ENDPOINT: &str = "/auth/logout/";
/// Token refresh endpoint, relative to the API base.
pub const REFRESH_ENDPOINT: &str = "/token/refresh/";

/// Primary activity feed route.
pub const FEED_ENDPOINT: &str = "/ws/admin/activity/";
/// Alternative feed route kept for backend deployments that mount the
/// consumer without the `/ws` prefix.
pub const FEED_ENDPOINT_ALT: &str = "/admin/activity/";

/// Default backend root used when no configuration is present.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Resolved backend endpoint set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    /// Creates a configuration from a backend root URL.
    ///
    /// The root is cleaned (trailing slashes stripped); it may or may not
    /// already carry the `/api` suffix.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url: String = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// Returns the cleaned root without the API prefix applied.
    #[must_use]
    pub fn clean_base(&self) -> &str {
        &self.base_url
    }

    /// Returns the root with the `/api` segment applied exactly once.
    #[must_use]
    pub fn api_base(&self) -> String {
        if self.base_url.ends_with("/api") {
            self.base_url.clone()
        } else {
            format!("{}/api", self.base_url)
        }
    }

    /// Returns the WebSocket root derived by scheme substitution.
    #[must_use]
    pub fn ws_base(&self) -> String {
        let base = self
            .base_url
            .strip_suffix("/api")
            .unwrap_or(&self.base_url);
        if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            base.to_string()
        }
    }

    /// Resolves a path against the API base without producing double
    /// slashes. Absolute URLs pass through untouched.
    #[must_use]
    pub fn api_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        let base = self.api_base();
        let separator = if path.starts_with('/') { "" } else { "/" };
        format!("{base}{separator}{path}")
    }

    /// Builds the candidate feed URLs, primary first, each carrying the
    /// access token as a query parameter.
    #[must_use]
    pub fn feed_urls(&self, access_token: &str) -> [String; 2] {
        let ws_base = self.ws_base();
        [
            format!("{ws_base}{FEED_ENDPOINT}?token={access_token}"),
            format!("{ws_base}{FEED_ENDPOINT_ALT}?token={access_token}"),
        ]
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}
