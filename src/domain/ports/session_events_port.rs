//! Session events port definition.

/// Port notified when the session is irrecoverably lost.
///
/// In the browser console this is where the redirect to the login page
/// happens; headless hosts decide what a forced logout means for them.
#[cfg_attr(test, mockall::automock)]
pub trait SessionEventsPort: Send + Sync {
    /// Called after stored credentials were cleared because a silent
    /// refresh failed or no refresh token existed.
    fn on_session_expired(&self);
}
