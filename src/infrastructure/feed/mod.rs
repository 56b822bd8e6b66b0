//! Real-time activity feed: WebSocket transport, reconnect supervision,
//! and the degraded fallback.

pub mod client;
pub mod connection;
pub mod constants;
pub mod error;
pub mod fallback;
pub mod messages;
pub mod state;

pub use client::{FeedClient, FeedClientConfig, FeedEvent};
pub use connection::{FeedConnection, FeedConnector, WebSocketConnector};
pub use constants::{FALLBACK_TIMEOUT, MAX_RECONNECT_ATTEMPTS, RECONNECT_DELAY_BASE};
pub use error::{CloseClass, FeedError};
pub use fallback::synthetic_activities;
pub use messages::FeedMessage;
pub use state::{FeedHandle, ReconnectState};
