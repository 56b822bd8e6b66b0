//! Application layer containing use cases and DTOs.

/// Data transfer objects.
pub mod dto;
/// Use case implementations.
pub mod use_cases;

pub use dto::{LoginOutcome, LoginRequest};
pub use use_cases::LoginUseCase;
