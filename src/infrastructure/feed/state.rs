//! Shared feed state: connection status, reconnect progress, and the
//! bounded activity projection.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::domain::connection::ConnectionStatus;
use crate::domain::entities::{ActivityEvent, ActivityLog};

/// Reconnect bookkeeping for the supervisor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconnectState {
    /// Backoff attempts consumed since the last successful connection.
    pub attempt: u32,
    /// Whether a reconnect is currently scheduled or in flight.
    pub is_reconnecting: bool,
}

#[derive(Debug, Default)]
struct FeedStateInner {
    status: ConnectionStatus,
    log: ActivityLog,
    reconnect: ReconnectState,
    ever_connected: bool,
}

/// Cheaply cloneable handle onto the live feed state.
///
/// The supervisor writes through this handle; callers read status and
/// activity snapshots from their own clones.
#[derive(Debug, Clone, Default)]
pub struct FeedHandle {
    inner: Arc<RwLock<FeedStateInner>>,
}

impl FeedHandle {
    /// Creates a handle with empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current connection status.
    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        self.inner.read().status
    }

    /// Current reconnect bookkeeping.
    #[must_use]
    pub fn reconnect_state(&self) -> ReconnectState {
        self.inner.read().reconnect
    }

    /// Whether any connection has ever succeeded on this handle.
    #[must_use]
    pub fn ever_connected(&self) -> bool {
        self.inner.read().ever_connected
    }

    /// Snapshot of the projection, newest-first.
    #[must_use]
    pub fn activities(&self) -> Vec<ActivityEvent> {
        self.inner.read().log.snapshot()
    }

    /// Number of entries currently in the projection.
    #[must_use]
    pub fn activity_count(&self) -> usize {
        self.inner.read().log.len()
    }

    /// Marks a connection attempt as in flight.
    ///
    /// A degraded projection stays visibly degraded through background
    /// attempts; only a successful connection leaves that state.
    pub fn mark_connecting(&self) {
        let mut inner = self.inner.write();
        if inner.status != ConnectionStatus::Degraded {
            inner.status = ConnectionStatus::Connecting;
        }
    }

    /// Marks the channel as established. Resets the reconnect counter and
    /// evicts any synthetic entries in favor of live data.
    pub fn mark_connected(&self) {
        let mut inner = self.inner.write();
        inner.status = ConnectionStatus::Connected;
        inner.reconnect = ReconnectState::default();
        inner.ever_connected = true;
        inner.log.drop_synthetic();
    }

    /// Marks the channel as closed without scheduling anything.
    pub fn mark_disconnected(&self) {
        let mut inner = self.inner.write();
        if inner.status != ConnectionStatus::Degraded {
            inner.status = ConnectionStatus::Disconnected;
        }
        inner.reconnect.is_reconnecting = false;
    }

    /// Marks the feed as failed.
    pub fn mark_error(&self) {
        let mut inner = self.inner.write();
        if inner.status != ConnectionStatus::Degraded {
            inner.status = ConnectionStatus::Error;
        }
    }

    /// Consumes one reconnect attempt and returns the new attempt count.
    pub fn mark_reconnecting(&self) -> u32 {
        let mut inner = self.inner.write();
        inner.reconnect.attempt += 1;
        inner.reconnect.is_reconnecting = true;
        inner.reconnect.attempt
    }

    /// Resets the reconnect counter without touching the status.
    pub fn reset_reconnect(&self) {
        self.inner.write().reconnect = ReconnectState::default();
    }

    /// Switches to degraded mode, replacing the projection with the given
    /// placeholder entries.
    pub fn enter_degraded(&self, placeholder: Vec<ActivityEvent>) {
        let mut inner = self.inner.write();
        inner.status = ConnectionStatus::Degraded;
        inner.log.replace(placeholder);
    }

    /// Prepends a live event to the projection.
    pub fn push(&self, event: ActivityEvent) {
        self.inner.write().log.push(event);
    }

    /// Empties the projection.
    pub fn clear_activities(&self) {
        self.inner.write().log.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::domain::entities::{ColorHint, IconKind};

    fn event(id: i64) -> ActivityEvent {
        ActivityEvent::new(
            id,
            "t",
            "d",
            IconKind::ShoppingCart,
            ColorHint::Info,
            Utc::now(),
        )
    }

    #[test]
    fn connection_resets_attempts_and_evicts_synthetic_entries() {
        let handle = FeedHandle::new();
        handle.enter_degraded(vec![event(1).synthetic(), event(2).synthetic()]);
        handle.mark_reconnecting();
        handle.mark_reconnecting();

        handle.mark_connected();

        assert_eq!(handle.status(), ConnectionStatus::Connected);
        assert_eq!(handle.reconnect_state(), ReconnectState::default());
        assert!(handle.ever_connected());
        assert_eq!(handle.activity_count(), 0);
    }

    #[test]
    fn degraded_status_survives_background_attempts() {
        let handle = FeedHandle::new();
        handle.enter_degraded(vec![event(1).synthetic()]);

        handle.mark_connecting();
        assert_eq!(handle.status(), ConnectionStatus::Degraded);

        handle.mark_disconnected();
        assert_eq!(handle.status(), ConnectionStatus::Degraded);

        handle.mark_error();
        assert_eq!(handle.status(), ConnectionStatus::Degraded);
    }

    #[test]
    fn reconnect_attempts_accumulate() {
        let handle = FeedHandle::new();
        assert_eq!(handle.mark_reconnecting(), 1);
        assert_eq!(handle.mark_reconnecting(), 2);
        assert!(handle.reconnect_state().is_reconnecting);

        handle.reset_reconnect();
        assert_eq!(handle.reconnect_state().attempt, 0);
    }

    #[test]
    fn live_events_prepend() {
        let handle = FeedHandle::new();
        handle.push(event(1));
        handle.push(event(2));
        let snapshot = handle.activities();
        assert_eq!(snapshot[0].id, 2);
        assert_eq!(snapshot[1].id, 1);
    }
}
