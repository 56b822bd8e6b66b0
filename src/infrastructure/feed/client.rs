//! Activity feed supervisor.
//!
//! Owns the reconnect policy: primary/alternate endpoint fallback,
//! exponential backoff on abnormal closures, a single refresh-and-retry
//! on token expiry, and the degraded fallback after the startup window.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::Utc;
use futures_util::FutureExt;
use parking_lot::Mutex;
use tokio::sync::{Notify, mpsc};
use tracing::{debug, error, info, trace, warn};

use crate::domain::entities::ActivityEvent;
use crate::domain::ports::CredentialStorePort;
use crate::infrastructure::config::{ApiConfig, FEED_ENDPOINT, FEED_ENDPOINT_ALT, FeedSection};
use crate::infrastructure::http::RefreshCoordinator;

use super::connection::{FeedConnection, FeedConnector, WebSocketConnector};
use super::constants::{
    CLOSE_NORMAL, FALLBACK_TIMEOUT, MAX_RECONNECT_ATTEMPTS, RECONNECT_DELAY_BASE,
    REFRESH_RECONNECT_DELAY,
};
use super::error::{CloseClass, FeedError};
use super::fallback::synthetic_activities;
use super::messages::FeedMessage;
use super::state::FeedHandle;

/// Tunable knobs for the supervisor.
#[derive(Debug, Clone)]
pub struct FeedClientConfig {
    /// Backoff reconnect attempts before giving up.
    pub max_reconnect_attempts: u32,
    /// First backoff delay; doubles per consumed attempt.
    pub reconnect_delay_base: Duration,
    /// Window after which the degraded fallback kicks in.
    pub fallback_timeout: Duration,
    /// Pause before reconnecting with a refreshed credential.
    pub refresh_reconnect_delay: Duration,
}

impl Default for FeedClientConfig {
    fn default() -> Self {
        Self {
            max_reconnect_attempts: MAX_RECONNECT_ATTEMPTS,
            reconnect_delay_base: RECONNECT_DELAY_BASE,
            fallback_timeout: FALLBACK_TIMEOUT,
            refresh_reconnect_delay: REFRESH_RECONNECT_DELAY,
        }
    }
}

impl From<&FeedSection> for FeedClientConfig {
    fn from(section: &FeedSection) -> Self {
        Self {
            max_reconnect_attempts: section.max_reconnect_attempts,
            reconnect_delay_base: Duration::from_millis(section.reconnect_delay_ms),
            fallback_timeout: Duration::from_millis(section.fallback_timeout_ms),
            refresh_reconnect_delay: REFRESH_RECONNECT_DELAY,
        }
    }
}

/// Notifications emitted to the host while the feed runs.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// A channel was established on the given route.
    Connected {
        /// Endpoint path that accepted the connection
        route: String,
    },
    /// A live activity entry arrived.
    Activity(ActivityEvent),
    /// The channel closed.
    Disconnected {
        /// Close code, 1006 for transport failures
        code: u16,
        /// Closure description
        reason: String,
    },
    /// A backoff reconnect was scheduled.
    Reconnecting {
        /// Attempt number, starting at 1
        attempt: u32,
        /// Delay before the attempt fires
        delay: Duration,
    },
    /// The degraded fallback replaced the projection with placeholder data.
    Degraded,
    /// The feed gave up or hit an unrecoverable error.
    Error {
        /// Failure description
        message: String,
    },
}

/// Long-running activity feed client.
pub struct FeedClient {
    config: FeedClientConfig,
    api_config: ApiConfig,
    store: Arc<dyn CredentialStorePort>,
    refresh: Arc<RefreshCoordinator>,
    connector: Arc<dyn FeedConnector>,
    handle: FeedHandle,
    running: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
    event_tx: Mutex<Option<mpsc::UnboundedSender<FeedEvent>>>,
}

impl FeedClient {
    /// Creates a client over the real WebSocket transport.
    #[must_use]
    pub fn new(
        config: FeedClientConfig,
        api_config: ApiConfig,
        store: Arc<dyn CredentialStorePort>,
        refresh: Arc<RefreshCoordinator>,
    ) -> Self {
        Self::with_connector(config, api_config, store, refresh, Arc::new(WebSocketConnector))
    }

    /// Creates a client with a custom channel factory.
    #[must_use]
    pub fn with_connector(
        config: FeedClientConfig,
        api_config: ApiConfig,
        store: Arc<dyn CredentialStorePort>,
        refresh: Arc<RefreshCoordinator>,
        connector: Arc<dyn FeedConnector>,
    ) -> Self {
        Self {
            config,
            api_config,
            store,
            refresh,
            connector,
            handle: FeedHandle::new(),
            running: Arc::new(AtomicBool::new(false)),
            shutdown: Arc::new(Notify::new()),
            event_tx: Mutex::new(None),
        }
    }

    /// Handle onto the shared feed state.
    #[must_use]
    pub fn handle(&self) -> FeedHandle {
        self.handle.clone()
    }

    /// Whether the supervisor loop is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Starts the supervisor loop.
    ///
    /// # Errors
    /// Returns `FeedError::AlreadyConnected` when the loop is running.
    pub fn start(&self) -> Result<mpsc::UnboundedReceiver<FeedEvent>, FeedError> {
        if self.running.load(Ordering::SeqCst) {
            return Err(FeedError::AlreadyConnected);
        }

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        *self.event_tx.lock() = Some(event_tx.clone());
        self.spawn_loop(event_tx);
        Ok(event_rx)
    }

    /// Forces a fresh connection cycle after the loop has given up.
    /// A no-op while the loop is still running.
    ///
    /// # Errors
    /// Returns `FeedError::NotConnected` when the feed was never started.
    pub fn retry(&self) -> Result<(), FeedError> {
        if self.running.load(Ordering::SeqCst) {
            debug!("Retry requested while the feed loop is active");
            return Ok(());
        }

        let event_tx = self.event_tx.lock().clone().ok_or(FeedError::NotConnected)?;
        self.handle.reset_reconnect();
        self.spawn_loop(event_tx);
        Ok(())
    }

    /// Stops the supervisor loop and cancels any pending timers.
    pub fn disconnect(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.shutdown.notify_waiters();
    }

    /// Checks reachability of both feed endpoints without touching the
    /// shared state or scheduling reconnects.
    pub async fn probe_endpoints(&self) -> Vec<(String, bool)> {
        let token = match self.store.get().await {
            Ok(Some(credential)) => credential.access().to_string(),
            _ => String::new(),
        };
        let urls = self.api_config.feed_urls(&token);
        let routes = [FEED_ENDPOINT, FEED_ENDPOINT_ALT];

        let mut results = Vec::with_capacity(urls.len());
        for (url, route) in urls.iter().zip(routes) {
            let mut connection = self.connector.create();
            let reachable = connection.open(url).await.is_ok();
            if reachable {
                connection.close().await;
                info!(route, "Feed endpoint reachable");
            } else {
                warn!(route, "Feed endpoint unreachable");
            }
            results.push((route.to_string(), reachable));
        }
        results
    }

    fn spawn_loop(&self, event_tx: mpsc::UnboundedSender<FeedEvent>) {
        self.running.store(true, Ordering::SeqCst);

        let ctx = LoopContext {
            config: self.config.clone(),
            api_config: self.api_config.clone(),
            store: Arc::clone(&self.store),
            refresh: Arc::clone(&self.refresh),
            connector: Arc::clone(&self.connector),
            handle: self.handle.clone(),
            running: Arc::clone(&self.running),
            shutdown: Arc::clone(&self.shutdown),
            event_tx: event_tx.clone(),
        };
        let running = Arc::clone(&self.running);

        tokio::spawn(async move {
            let result = std::panic::AssertUnwindSafe(run_feed_loop(ctx));

            if let Err(panic_info) = result.catch_unwind().await {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    (*s).to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };

                error!(panic = %panic_msg, "Feed task panicked");
                let _ = event_tx.send(FeedEvent::Error {
                    message: format!("Feed task panicked: {panic_msg}"),
                });
            }
            running.store(false, Ordering::SeqCst);
        });
    }
}

struct LoopContext {
    config: FeedClientConfig,
    api_config: ApiConfig,
    store: Arc<dyn CredentialStorePort>,
    refresh: Arc<RefreshCoordinator>,
    connector: Arc<dyn FeedConnector>,
    handle: FeedHandle,
    running: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
    event_tx: mpsc::UnboundedSender<FeedEvent>,
}

async fn run_feed_loop(ctx: LoopContext) {
    spawn_degraded_watchdog(&ctx);

    while ctx.running.load(Ordering::SeqCst) {
        let credential = match ctx.store.get().await {
            Ok(Some(credential)) => credential,
            Ok(None) => {
                warn!("No stored credential; feed cannot authenticate");
                ctx.handle.mark_error();
                let _ = ctx.event_tx.send(FeedEvent::Error {
                    message: FeedError::NoCredential.to_string(),
                });
                break;
            }
            Err(e) => {
                error!(error = %e, "Credential store failure stopped the feed");
                ctx.handle.mark_error();
                let _ = ctx.event_tx.send(FeedEvent::Error {
                    message: e.to_string(),
                });
                break;
            }
        };

        ctx.handle.mark_connecting();
        let urls = ctx.api_config.feed_urls(credential.access());
        let mut connection = ctx.connector.create();

        match open_with_fallback(connection.as_mut(), &urls).await {
            Ok(route) => {
                info!(route, "Activity feed connected");
                ctx.handle.mark_connected();
                let _ = ctx.event_tx.send(FeedEvent::Connected {
                    route: route.to_string(),
                });

                let Some(close_err) = read_frames(connection.as_mut(), &ctx).await else {
                    // Deliberate stop via disconnect().
                    break;
                };

                match close_err.close_class() {
                    CloseClass::Normal => {
                        info!("Feed closed normally");
                        ctx.handle.mark_disconnected();
                        let _ = ctx.event_tx.send(FeedEvent::Disconnected {
                            code: CLOSE_NORMAL,
                            reason: close_err.to_string(),
                        });
                        break;
                    }
                    CloseClass::TokenExpired => {
                        info!("Feed token expired, refreshing credential");
                        ctx.handle.mark_disconnected();
                        match ctx.refresh.refresh(credential.access()).await {
                            Ok(_) => {
                                if !wait_or_shutdown(&ctx, ctx.config.refresh_reconnect_delay).await
                                {
                                    break;
                                }
                                ctx.handle.reset_reconnect();
                            }
                            Err(e) => {
                                error!(error = %e, "Credential refresh for the feed failed");
                                ctx.handle.mark_error();
                                let _ = ctx.event_tx.send(FeedEvent::Error {
                                    message: e.to_string(),
                                });
                                break;
                            }
                        }
                    }
                    CloseClass::Abnormal => {
                        warn!(error = %close_err, "Feed channel dropped");
                        ctx.handle.mark_disconnected();
                        let _ = ctx.event_tx.send(FeedEvent::Disconnected {
                            code: close_err.close_code().unwrap_or(1006),
                            reason: close_err.to_string(),
                        });
                        if !schedule_backoff(&ctx).await {
                            break;
                        }
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Both feed endpoints refused the connection");
                ctx.handle.mark_error();
                let _ = ctx.event_tx.send(FeedEvent::Error {
                    message: e.to_string(),
                });
                if !schedule_backoff(&ctx).await {
                    break;
                }
            }
        }
    }

    ctx.running.store(false, Ordering::SeqCst);
    debug!("Feed loop ended");
}

/// Arms the one-shot degraded fallback. Fires only if no connection has
/// ever succeeded by the end of the window; cancelled by `disconnect()`.
fn spawn_degraded_watchdog(ctx: &LoopContext) {
    let handle = ctx.handle.clone();
    let event_tx = ctx.event_tx.clone();
    let shutdown = Arc::clone(&ctx.shutdown);
    let window = ctx.config.fallback_timeout;

    tokio::spawn(async move {
        tokio::select! {
            () = tokio::time::sleep(window) => {
                if !handle.ever_connected() {
                    warn!("No feed connection within the fallback window, showing placeholder data");
                    handle.enter_degraded(synthetic_activities(Utc::now()));
                    let _ = event_tx.send(FeedEvent::Degraded);
                }
            }
            () = shutdown.notified() => {}
        }
    });
}

async fn open_with_fallback(
    connection: &mut dyn FeedConnection,
    urls: &[String; 2],
) -> Result<&'static str, FeedError> {
    match connection.open(&urls[0]).await {
        Ok(()) => Ok(FEED_ENDPOINT),
        Err(primary_err) => {
            debug!(error = %primary_err, "Primary feed endpoint failed, trying alternate");
            connection.open(&urls[1]).await.map(|()| FEED_ENDPOINT_ALT)
        }
    }
}

/// Reads frames until the channel fails or the loop is stopped.
/// `None` means a deliberate stop; `Some` carries the closure error.
async fn read_frames(connection: &mut dyn FeedConnection, ctx: &LoopContext) -> Option<FeedError> {
    loop {
        if !ctx.running.load(Ordering::SeqCst) {
            connection.close().await;
            return None;
        }

        tokio::select! {
            () = ctx.shutdown.notified() => {
                connection.close().await;
                return None;
            }
            frame = connection.next_text() => match frame {
                Ok(Some(text)) => dispatch_frame(&text, ctx),
                Ok(None) => {}
                Err(e) => return Some(e),
            },
        }
    }
}

fn dispatch_frame(text: &str, ctx: &LoopContext) {
    match FeedMessage::parse(text) {
        Ok(message) => {
            trace!(kind = message.kind(), "Feed frame received");
            match &message {
                FeedMessage::ConnectionEstablished => debug!("Feed handshake acknowledged"),
                FeedMessage::Unknown { .. } => {
                    debug!(kind = message.kind(), "Dropping unknown feed message");
                }
                _ => {}
            }
            if let Some(event) = message.into_event(Utc::now()) {
                ctx.handle.push(event.clone());
                let _ = ctx.event_tx.send(FeedEvent::Activity(event));
            }
        }
        Err(e) => warn!(error = %e, "Dropping malformed feed frame"),
    }
}

/// Schedules the next backoff reconnect. Returns `false` when the attempt
/// budget is exhausted or the loop was stopped while waiting.
async fn schedule_backoff(ctx: &LoopContext) -> bool {
    let state = ctx.handle.reconnect_state();
    if state.attempt >= ctx.config.max_reconnect_attempts {
        warn!(
            attempts = state.attempt,
            "Feed reconnect attempts exhausted"
        );
        return false;
    }

    let delay = ctx
        .config
        .reconnect_delay_base
        .saturating_mul(2_u32.saturating_pow(state.attempt));
    let attempt = ctx.handle.mark_reconnecting();

    info!(attempt, delay = ?delay, "Scheduling feed reconnect");
    let _ = ctx.event_tx.send(FeedEvent::Reconnecting { attempt, delay });

    wait_or_shutdown(ctx, delay).await
}

async fn wait_or_shutdown(ctx: &LoopContext, delay: Duration) -> bool {
    tokio::select! {
        () = tokio::time::sleep(delay) => ctx.running.load(Ordering::SeqCst),
        () = ctx.shutdown.notified() => false,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;

    use async_trait::async_trait;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::time::Instant;

    use crate::domain::connection::ConnectionStatus;
    use crate::domain::entities::Credential;
    use crate::infrastructure::storage::MemoryCredentialStore;

    use super::*;

    /// One scripted connection lifetime: open results are consumed per
    /// endpoint attempt, then frames are replayed in order. An exhausted
    /// frame script leaves the channel open forever.
    struct Session {
        opens: VecDeque<Result<(), FeedError>>,
        frames: VecDeque<Result<Option<String>, FeedError>>,
    }

    impl Session {
        fn accepting(frames: Vec<Result<Option<String>, FeedError>>) -> Self {
            Self {
                opens: VecDeque::from(vec![Ok(())]),
                frames: VecDeque::from(frames),
            }
        }

        fn refusing() -> Self {
            Self {
                opens: VecDeque::from(vec![
                    Err(FeedError::connection_failed("refused")),
                    Err(FeedError::connection_failed("refused")),
                ]),
                frames: VecDeque::new(),
            }
        }

        fn closing_with(code: u16) -> Self {
            Self::accepting(vec![Err(FeedError::Closed {
                code,
                reason: "scripted".to_string(),
            })])
        }

        fn staying_open() -> Self {
            Self::accepting(Vec::new())
        }
    }

    #[derive(Clone)]
    struct ScriptedConnector {
        sessions: Arc<StdMutex<VecDeque<Session>>>,
        opens: Arc<StdMutex<Vec<(String, Instant)>>>,
    }

    impl ScriptedConnector {
        fn new(sessions: Vec<Session>) -> Self {
            Self {
                sessions: Arc::new(StdMutex::new(VecDeque::from(sessions))),
                opens: Arc::new(StdMutex::new(Vec::new())),
            }
        }

        fn open_log(&self) -> Vec<(String, Instant)> {
            self.opens.lock().unwrap().clone()
        }
    }

    impl FeedConnector for ScriptedConnector {
        fn create(&self) -> Box<dyn FeedConnection> {
            let session = self
                .sessions
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(Session::refusing);
            Box::new(ScriptedConnection {
                session,
                opens: Arc::clone(&self.opens),
                open: false,
            })
        }
    }

    struct ScriptedConnection {
        session: Session,
        opens: Arc<StdMutex<Vec<(String, Instant)>>>,
        open: bool,
    }

    #[async_trait]
    impl FeedConnection for ScriptedConnection {
        async fn open(&mut self, url: &str) -> Result<(), FeedError> {
            self.opens
                .lock()
                .unwrap()
                .push((url.to_string(), Instant::now()));
            let result = self
                .session
                .opens
                .pop_front()
                .unwrap_or_else(|| Err(FeedError::connection_failed("script exhausted")));
            self.open = result.is_ok();
            result
        }

        async fn next_text(&mut self) -> Result<Option<String>, FeedError> {
            match self.session.frames.pop_front() {
                Some(frame) => frame,
                None => futures_util::future::pending().await,
            }
        }

        async fn close(&mut self) {
            self.open = false;
        }

        fn is_open(&self) -> bool {
            self.open
        }
    }

    fn client_with(
        sessions: Vec<Session>,
        config: FeedClientConfig,
        store: Arc<MemoryCredentialStore>,
    ) -> (FeedClient, ScriptedConnector) {
        let api_config = ApiConfig::new("http://127.0.0.1:8000");
        let refresh = Arc::new(RefreshCoordinator::new(
            reqwest::Client::new(),
            "http://127.0.0.1:1/api/token/refresh/",
            store.clone() as Arc<dyn CredentialStorePort>,
        ));
        let connector = ScriptedConnector::new(sessions);
        let client = FeedClient::with_connector(
            config,
            api_config,
            store as Arc<dyn CredentialStorePort>,
            refresh,
            Arc::new(connector.clone()),
        );
        (client, connector)
    }

    fn stored_credential() -> Arc<MemoryCredentialStore> {
        Arc::new(MemoryCredentialStore::with_credential(Credential::new(
            "A1", "R1",
        )))
    }

    #[tokio::test(start_paused = true)]
    async fn falls_back_to_alternate_endpoint() {
        let sessions = vec![Session {
            opens: VecDeque::from(vec![
                Err(FeedError::connection_failed("primary down")),
                Ok(()),
            ]),
            frames: VecDeque::new(),
        }];
        let (client, connector) =
            client_with(sessions, FeedClientConfig::default(), stored_credential());

        let mut events = client.start().unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(client.handle().status(), ConnectionStatus::Connected);
        assert_eq!(client.handle().reconnect_state().attempt, 0);

        let log = connector.open_log();
        assert_eq!(log.len(), 2);
        assert!(log[0].0.contains(FEED_ENDPOINT));
        assert!(log[1].0.contains(FEED_ENDPOINT_ALT));
        assert_eq!(
            events.recv().await,
            Some(FeedEvent::Connected {
                route: FEED_ENDPOINT_ALT.to_string()
            })
        );

        client.disconnect();
    }

    #[tokio::test(start_paused = true)]
    async fn abnormal_closures_back_off_exponentially_until_the_cap() {
        let sessions = vec![
            Session::closing_with(1006),
            Session::closing_with(1006),
            Session::closing_with(1006),
            Session::closing_with(1006),
        ];
        let config = FeedClientConfig {
            max_reconnect_attempts: 3,
            ..FeedClientConfig::default()
        };
        let (client, connector) = client_with(sessions, config, stored_credential());

        let _events = client.start().unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;

        let log = connector.open_log();
        assert_eq!(log.len(), 4);
        let start = log[0].1;
        assert_eq!(log[1].1 - start, Duration::from_secs(1));
        assert_eq!(log[2].1 - start, Duration::from_secs(3));
        assert_eq!(log[3].1 - start, Duration::from_secs(7));

        assert_eq!(client.handle().status(), ConnectionStatus::Disconnected);
        assert_eq!(client.handle().reconnect_state().attempt, 3);
        assert!(!client.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn normal_closure_stops_without_reconnecting() {
        let sessions = vec![Session::closing_with(1000)];
        let (client, connector) =
            client_with(sessions, FeedClientConfig::default(), stored_credential());

        let _events = client.start().unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert_eq!(connector.open_log().len(), 1);
        assert_eq!(client.handle().status(), ConnectionStatus::Disconnected);
        assert!(!client.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn missing_credential_surfaces_as_error() {
        let (client, connector) = client_with(
            vec![Session::staying_open()],
            FeedClientConfig::default(),
            Arc::new(MemoryCredentialStore::new()),
        );

        let _events = client.start().unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(client.handle().status(), ConnectionStatus::Error);
        assert!(connector.open_log().is_empty());
        assert!(!client.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn degraded_fallback_populates_placeholder_data() {
        let config = FeedClientConfig {
            max_reconnect_attempts: 2,
            ..FeedClientConfig::default()
        };
        let (client, _connector) = client_with(Vec::new(), config, stored_credential());

        let _events = client.start().unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;

        let handle = client.handle();
        assert_eq!(handle.status(), ConnectionStatus::Degraded);
        let activities = handle.activities();
        assert_eq!(activities.len(), 5);
        assert!(activities.iter().all(|e| e.synthetic));
    }

    #[tokio::test(start_paused = true)]
    async fn activity_frames_land_in_the_projection() {
        let frame = r#"{"type": "vendor.approved", "data": {"business_name": "Suya Spot"}}"#;
        let sessions = vec![Session::accepting(vec![Ok(Some(frame.to_string()))])];
        let (client, _connector) =
            client_with(sessions, FeedClientConfig::default(), stored_credential());

        let _events = client.start().unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        let activities = client.handle().activities();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].title, "Vendor Approved");
        assert!(!activities[0].synthetic);

        client.disconnect();
    }

    /// Minimal HTTP responder for the refresh endpoint.
    async fn spawn_refresh_server(access: &'static str) -> (String, Arc<StdMutex<u32>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(StdMutex::new(0_u32));
        let hits_clone = Arc::clone(&hits);

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                *hits_clone.lock().unwrap() += 1;
                let mut buf = vec![0_u8; 4096];
                let _ = socket.read(&mut buf).await;
                let body = format!(r#"{{"access": "{access}"}}"#);
                let response = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });

        (format!("http://{addr}/api/token/refresh/"), hits)
    }

    #[tokio::test(start_paused = true)]
    async fn token_expiry_refreshes_and_reconnects_once() {
        let (refresh_url, hits) = spawn_refresh_server("A2").await;
        let store = stored_credential();
        let refresh = Arc::new(RefreshCoordinator::new(
            reqwest::Client::new(),
            refresh_url,
            store.clone() as Arc<dyn CredentialStorePort>,
        ));
        let connector = ScriptedConnector::new(vec![
            Session::closing_with(4002),
            Session::staying_open(),
        ]);
        let client = FeedClient::with_connector(
            FeedClientConfig::default(),
            ApiConfig::new("http://127.0.0.1:8000"),
            store.clone() as Arc<dyn CredentialStorePort>,
            refresh,
            Arc::new(connector.clone()),
        );

        let _events = client.start().unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;

        let log = connector.open_log();
        assert_eq!(log.len(), 2);
        assert!(log[0].0.contains("token=A1"));
        assert!(log[1].0.contains("token=A2"));
        assert_eq!(*hits.lock().unwrap(), 1);

        assert_eq!(client.handle().status(), ConnectionStatus::Connected);
        assert_eq!(client.handle().reconnect_state().attempt, 0);
        assert_eq!(
            store.get().await.unwrap().unwrap().access(),
            "A2"
        );

        client.disconnect();
    }
}
