//! Port definitions.

/// Backend authentication port.
pub mod auth_port;
/// Credential persistence port.
pub mod credential_store_port;
/// Forced-logout notification port.
pub mod session_events_port;

pub use auth_port::AuthPort;
pub use credential_store_port::CredentialStorePort;
pub use session_events_port::SessionEventsPort;

#[cfg(test)]
pub use session_events_port::MockSessionEventsPort;
