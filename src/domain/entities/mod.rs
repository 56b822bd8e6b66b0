//! Entity definitions.

/// Activity feed events and log.
pub mod activity;
/// Session credential pair.
pub mod credential;
/// Admin user profile.
pub mod user;

pub use activity::{
    ACTIVITY_LOG_CAPACITY, ActivityEvent, ActivityLog, ColorHint, IconKind, RelatedUser,
    RelatedVendor,
};
pub use credential::Credential;
pub use user::AdminUser;
