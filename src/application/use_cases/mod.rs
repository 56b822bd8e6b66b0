//! Application use cases.

mod login_use_case;

pub use login_use_case::LoginUseCase;
