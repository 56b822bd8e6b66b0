//! Domain layer with core business entities and port definitions.

/// Connection status definitions.
pub mod connection;
/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use connection::ConnectionStatus;
pub use entities::{ActivityEvent, ActivityLog, AdminUser, Credential};
pub use errors::ApiError;
pub use ports::{AuthPort, CredentialStorePort, SessionEventsPort};
