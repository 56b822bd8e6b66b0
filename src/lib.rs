//! Courierdesk - headless client for a delivery marketplace admin console.
//!
//! This crate provides the resilient transport layer of the console: an
//! authenticated HTTP client with silent token refresh and a reconnecting
//! WebSocket activity feed with degraded-mode fallback.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing use cases and DTOs.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "courierdesk";
