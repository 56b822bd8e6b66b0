//! Infrastructure adapters: configuration, HTTP transport, the live
//! activity feed, and credential storage.

pub mod config;
pub mod feed;
pub mod http;
pub mod storage;

pub use config::{ApiConfig, AppConfig, CliArgs};
pub use feed::{FeedClient, FeedClientConfig, FeedEvent, FeedHandle};
pub use http::{ApiClient, RefreshCoordinator};
pub use storage::{KeyringCredentialStore, MemoryCredentialStore};
