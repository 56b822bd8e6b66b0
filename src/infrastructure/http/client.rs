//! Authenticated backend HTTP client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, Method, StatusCode, Url, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::domain::entities::{AdminUser, Credential};
use crate::domain::errors::ApiError;
use crate::domain::ports::{AuthPort, CredentialStorePort, SessionEventsPort};
use crate::infrastructure::config::ApiConfig;
use crate::infrastructure::config::api_config::{
    LOGIN_ENDPOINT, LOGOUT_ENDPOINT, REFRESH_ENDPOINT,
};

use super::dto::{ErrorBody, LoginBody, LoginResponse};
use super::refresh::RefreshCoordinator;

const CSRF_HEADER: &str = "X-CSRFToken";
const CSRF_COOKIE: &str = "csrftoken";
const REQUESTED_WITH_HEADER: &str = "X-Requested-With";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Parsed body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiBody {
    /// Response declared a JSON content type.
    Json(serde_json::Value),
    /// Binary or empty body, returned unparsed.
    Raw(Vec<u8>),
}

impl ApiBody {
    /// Deserializes a JSON body into the requested type.
    ///
    /// # Errors
    /// Returns `ApiError::InvalidResponse` for raw or mismatching bodies.
    pub fn json<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        match self {
            Self::Json(value) => serde_json::from_value(value)
                .map_err(|e| ApiError::invalid_response(e.to_string())),
            Self::Raw(_) => Err(ApiError::invalid_response(
                "expected JSON body, got raw bytes",
            )),
        }
    }
}

/// Session-events adapter that only logs; suitable for headless hosts that
/// poll `requires_login` errors instead.
#[derive(Debug, Default)]
pub struct TracingSessionEvents;

impl SessionEventsPort for TracingSessionEvents {
    fn on_session_expired(&self) {
        warn!("Session expired, re-authentication required");
    }
}

/// Backend HTTP client with the console's header contract and
/// refresh-and-retry recovery.
pub struct ApiClient {
    http: Client,
    jar: Arc<Jar>,
    config: ApiConfig,
    api_root: Url,
    store: Arc<dyn CredentialStorePort>,
    session_events: Arc<dyn SessionEventsPort>,
    refresh: Arc<RefreshCoordinator>,
}

impl ApiClient {
    /// Creates a client for the configured backend.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built or the API root
    /// is not a valid URL.
    pub fn new(
        config: ApiConfig,
        store: Arc<dyn CredentialStorePort>,
        session_events: Arc<dyn SessionEventsPort>,
    ) -> Result<Self, ApiError> {
        let jar = Arc::new(Jar::default());

        let http = Client::builder()
            .cookie_provider(jar.clone())
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::unexpected(format!("failed to create HTTP client: {e}")))?;

        let api_root = Url::parse(&config.api_base())
            .map_err(|e| ApiError::unexpected(format!("invalid API root: {e}")))?;

        let refresh = Arc::new(RefreshCoordinator::new(
            http.clone(),
            config.api_url(REFRESH_ENDPOINT),
            store.clone(),
        ));

        Ok(Self {
            http,
            jar,
            config,
            api_root,
            store,
            session_events,
            refresh,
        })
    }

    /// Returns the shared refresh coordinator for the feed client.
    #[must_use]
    pub fn refresh_coordinator(&self) -> Arc<RefreshCoordinator> {
        self.refresh.clone()
    }

    /// Returns the endpoint configuration.
    #[must_use]
    pub const fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Performs a GET and decodes the JSON body.
    ///
    /// # Errors
    /// See [`Self::execute`].
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(Method::GET, path, None).await?.json()
    }

    /// Performs a POST with a JSON body and decodes the JSON response.
    ///
    /// # Errors
    /// See [`Self::execute`].
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::unexpected(format!("unserializable body: {e}")))?;
        self.execute(Method::POST, path, Some(body)).await?.json()
    }

    /// Performs an authenticated request with the full header contract and
    /// single-shot recovery from CSRF and authorization failures.
    ///
    /// # Errors
    /// - `ApiError::SessionExpired` when the credential could not be
    ///   refreshed; the store is cleared and the session-events port
    ///   notified before this returns.
    /// - `ApiError::PermissionDenied` for non-CSRF 403 responses.
    /// - `ApiError::RequestFailed` for other non-2xx responses, carrying the
    ///   normalized backend message.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<ApiBody, ApiError> {
        let url = self.config.api_url(path);
        let mut retry_used = false;

        loop {
            let bearer = self.store.get().await?;
            let response = self
                .send_once(&method, &url, body.as_ref(), bearer.as_ref())
                .await?;
            let status = response.status();

            if status.is_success() {
                return Self::parse_success(response).await;
            }

            let raw = response.text().await.unwrap_or_default();
            let error_body = ErrorBody::parse(&raw);

            if status == StatusCode::FORBIDDEN && error_body.is_csrf_failure() {
                if retry_used {
                    return Err(ApiError::csrf(error_body.normalized_message("CSRF failed")));
                }

                debug!(url = %url, "CSRF rejection, re-acquiring anti-forgery token");
                self.acquire_csrf_cookie().await?;
                retry_used = true;
                continue;
            }

            if status == StatusCode::UNAUTHORIZED || error_body.is_stale_token() {
                if retry_used {
                    self.force_logout().await;
                    return Err(ApiError::SessionExpired);
                }

                let observed = bearer.as_ref().map_or("", Credential::access);
                match self.refresh.refresh(observed).await {
                    Ok(_) => {
                        debug!(url = %url, "Access token refreshed, retrying request");
                        retry_used = true;
                        continue;
                    }
                    Err(e) => {
                        warn!(url = %url, error = %e, "Silent refresh failed");
                        self.force_logout().await;
                        return Err(ApiError::SessionExpired);
                    }
                }
            }

            if status == StatusCode::FORBIDDEN {
                return Err(ApiError::PermissionDenied);
            }

            let fallback = format!("request failed with status {status}");
            let message = error_body.normalized_message(if raw.is_empty() {
                &fallback
            } else if error_body.detail.is_none()
                && error_body.message.is_none()
                && error_body.error.is_none()
            {
                // Non-JSON body: surface the text itself.
                &raw
            } else {
                &fallback
            });

            warn!(url = %url, status = %status, message = %message, "Request failed");
            return Err(ApiError::request_failed(status.as_u16(), message));
        }
    }

    async fn send_once(
        &self,
        method: &Method,
        url: &str,
        body: Option<&serde_json::Value>,
        bearer: Option<&Credential>,
    ) -> Result<reqwest::Response, ApiError> {
        let mut request = self
            .http
            .request(method.clone(), url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(REQUESTED_WITH_HEADER, "XMLHttpRequest");

        if let Some(token) = self.csrf_token() {
            request = request.header(CSRF_HEADER, token);
        }

        if let Some(credential) = bearer {
            request = request.bearer_auth(credential.access());
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        request.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::network("request timed out")
            } else if e.is_connect() {
                ApiError::network("failed to connect to backend")
            } else {
                ApiError::network(e.to_string())
            }
        })
    }

    async fn parse_success(response: reqwest::Response) -> Result<ApiBody, ApiError> {
        let is_json = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("application/json"));

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;

        if is_json {
            serde_json::from_slice(&bytes)
                .map(ApiBody::Json)
                .map_err(|e| ApiError::invalid_response(e.to_string()))
        } else {
            Ok(ApiBody::Raw(bytes.to_vec()))
        }
    }

    /// Re-acquires the anti-forgery cookie via a side-effect-free GET to the
    /// API root.
    async fn acquire_csrf_cookie(&self) -> Result<(), ApiError> {
        self.http
            .get(self.api_root.clone())
            .header(REQUESTED_WITH_HEADER, "XMLHttpRequest")
            .send()
            .await
            .map_err(|e| ApiError::network(format!("failed to refresh CSRF token: {e}")))?;
        Ok(())
    }

    fn csrf_token(&self) -> Option<String> {
        let cookies = self.jar.cookies(&self.api_root)?;
        let cookies = cookies.to_str().ok()?;

        cookies.split(';').find_map(|cookie| {
            let (name, value) = cookie.trim().split_once('=')?;
            (name == CSRF_COOKIE).then(|| value.to_string())
        })
    }

    async fn force_logout(&self) {
        if let Err(e) = self.store.clear().await {
            warn!(error = %e, "Failed to clear stored credentials");
        }
        self.session_events.on_session_expired();
    }
}

#[async_trait]
impl AuthPort for ApiClient {
    async fn login(&self, email: &str, password: &str) -> Result<(Credential, AdminUser), ApiError> {
        let url = self.config.api_url(LOGIN_ENDPOINT);
        debug!(url = %url, "Logging in");

        let mut request = self
            .http
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&LoginBody { email, password });

        if let Some(token) = self.csrf_token() {
            request = request.header(CSRF_HEADER, token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;
        let status = response.status();
        let raw = response.text().await.unwrap_or_default();

        if !status.is_success() {
            let message = ErrorBody::parse(&raw).normalized_message("login failed");
            return Err(ApiError::request_failed(status.as_u16(), message));
        }

        let body: LoginResponse = serde_json::from_str(&raw)
            .map_err(|e| ApiError::invalid_response(format!("login response: {e}")))?;

        Ok((Credential::new(body.access, body.refresh), body.user))
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.execute(Method::POST, LOGOUT_ENDPOINT, None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockSessionEventsPort;
    use crate::infrastructure::storage::MemoryCredentialStore;

    fn make_client() -> ApiClient {
        let store = Arc::new(MemoryCredentialStore::new());
        let session_events = Arc::new(MockSessionEventsPort::new());
        ApiClient::new(
            ApiConfig::new("http://127.0.0.1:8000"),
            store,
            session_events,
        )
        .unwrap()
    }

    #[test]
    fn test_client_creation() {
        let client = make_client();
        assert_eq!(client.config().clean_base(), "http://127.0.0.1:8000");
    }

    #[test]
    fn test_csrf_token_read_from_jar() {
        let client = make_client();
        assert_eq!(client.csrf_token(), None);

        let url = Url::parse("http://127.0.0.1:8000/api").unwrap();
        client
            .jar
            .add_cookie_str("csrftoken=abc123; Path=/", &url);

        assert_eq!(client.csrf_token().as_deref(), Some("abc123"));
    }

    #[test]
    fn test_api_body_json_decode() {
        let body = ApiBody::Json(serde_json::json!({"access": "A2"}));
        let parsed: super::super::dto::RefreshResponse = body.json().unwrap();
        assert_eq!(parsed.access, "A2");

        let raw = ApiBody::Raw(vec![1, 2, 3]);
        assert!(matches!(
            raw.json::<serde_json::Value>(),
            Err(ApiError::InvalidResponse { .. })
        ));
    }
}
