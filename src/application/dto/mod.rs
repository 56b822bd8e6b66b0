//! Application DTOs.

mod auth_dto;

pub use auth_dto::{LoginOutcome, LoginRequest};
