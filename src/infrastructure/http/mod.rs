//! Backend HTTP transport.

/// Authenticated request client.
pub mod client;
/// Wire DTOs.
pub mod dto;
/// Single-flight refresh coordination.
pub mod refresh;

pub use client::{ApiBody, ApiClient, TracingSessionEvents};
pub use refresh::RefreshCoordinator;
