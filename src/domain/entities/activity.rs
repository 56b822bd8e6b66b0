//! Activity feed events and the bounded activity log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximum number of events retained by the log.
pub const ACTIVITY_LOG_CAPACITY: usize = 50;

/// Icon displayed next to an activity entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconKind {
    /// Order placed.
    ShoppingCart,
    /// Approval or completion.
    CheckCircle,
    /// Rejection.
    XCircle,
    /// Courier-related entry.
    Truck,
    /// Vendor-related entry.
    Store,
    /// Icon the console has no mapping for.
    #[serde(other)]
    Other,
}

impl IconKind {
    /// Returns the icon name used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ShoppingCart => "shopping-cart",
            Self::CheckCircle => "check-circle",
            Self::XCircle => "x-circle",
            Self::Truck => "truck",
            Self::Store => "store",
            Self::Other => "other",
        }
    }
}

/// Colour accent for an activity entry.
///
/// The backend sends raw hex values; only the three accents the console
/// actually renders are distinguished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorHint {
    /// Green accent used for approvals and completed orders.
    #[serde(rename = "#10B981")]
    Success,
    /// Blue accent used for registrations.
    #[serde(rename = "#3B82F6")]
    Info,
    /// Red accent used for rejections.
    #[serde(rename = "#EF4444")]
    Danger,
    /// Any other colour value.
    #[serde(other)]
    Other,
}

impl ColorHint {
    /// Returns the hex value rendered by the console.
    #[must_use]
    pub const fn as_hex(self) -> &'static str {
        match self {
            Self::Success => "#10B981",
            Self::Info => "#3B82F6",
            Self::Danger => "#EF4444",
            Self::Other => "#9CA3AF",
        }
    }
}

/// User referenced by an activity entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedUser {
    /// User id.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Login email.
    #[serde(default)]
    pub email: String,
}

/// Vendor referenced by an activity entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedVendor {
    /// Vendor id.
    pub id: u64,
    /// Business name.
    pub name: String,
}

/// A single entry in the admin activity feed. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    /// Event id assigned by the backend, or a timestamp-derived id for
    /// events synthesized client-side.
    pub id: i64,
    /// Short headline.
    pub title: String,
    /// Human-readable description.
    pub description: String,
    /// Icon to render.
    pub icon: IconKind,
    /// Colour accent.
    pub color: ColorHint,
    /// Order amount, when the event concerns an order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// Event time in UTC.
    pub timestamp: DateTime<Utc>,
    /// Related user, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<RelatedUser>,
    /// Related vendor, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<RelatedVendor>,
    /// True for fabricated degraded-mode entries. Not part of the wire
    /// shape; lets consumers tell placeholder data from live data.
    #[serde(skip)]
    pub synthetic: bool,
}

impl ActivityEvent {
    /// Creates a new event with the required fields.
    #[must_use]
    pub fn new(
        id: i64,
        title: impl Into<String>,
        description: impl Into<String>,
        icon: IconKind,
        color: ColorHint,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            icon,
            color,
            amount: None,
            timestamp,
            user: None,
            vendor: None,
            synthetic: false,
        }
    }

    /// Attaches an order amount.
    #[must_use]
    pub const fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Attaches a related user.
    #[must_use]
    pub fn with_user(mut self, user: RelatedUser) -> Self {
        self.user = Some(user);
        self
    }

    /// Attaches a related vendor.
    #[must_use]
    pub fn with_vendor(mut self, vendor: RelatedVendor) -> Self {
        self.vendor = Some(vendor);
        self
    }

    /// Marks the event as fabricated degraded-mode data.
    #[must_use]
    pub const fn synthetic(mut self) -> Self {
        self.synthetic = true;
        self
    }
}

/// Bounded, newest-first log of activity events.
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    entries: VecDeque<ActivityEvent>,
}

impl ActivityLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepends an event; the oldest entry is dropped once the cap is hit.
    pub fn push(&mut self, event: ActivityEvent) {
        self.entries.push_front(event);
        self.entries.truncate(ACTIVITY_LOG_CAPACITY);
    }

    /// Replaces the whole log contents, newest-first.
    pub fn replace(&mut self, events: impl IntoIterator<Item = ActivityEvent>) {
        self.entries = events.into_iter().take(ACTIVITY_LOG_CAPACITY).collect();
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drops fabricated entries, keeping live ones.
    pub fn drop_synthetic(&mut self) {
        self.entries.retain(|event| !event.synthetic);
    }

    /// Returns a newest-first snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ActivityEvent> {
        self.entries.iter().cloned().collect()
    }

    /// Number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_event(id: i64) -> ActivityEvent {
        ActivityEvent::new(
            id,
            format!("Order #{id}"),
            "test entry",
            IconKind::ShoppingCart,
            ColorHint::Success,
            Utc::now(),
        )
    }

    #[test]
    fn test_log_is_newest_first() {
        let mut log = ActivityLog::new();
        log.push(make_event(1));
        log.push(make_event(2));

        let snapshot = log.snapshot();
        assert_eq!(snapshot[0].id, 2);
        assert_eq!(snapshot[1].id, 1);
    }

    #[test]
    fn test_log_never_exceeds_capacity() {
        let mut log = ActivityLog::new();
        for id in 0..200 {
            log.push(make_event(id));
        }

        assert_eq!(log.len(), ACTIVITY_LOG_CAPACITY);
        assert_eq!(log.snapshot()[0].id, 199);
    }

    #[test]
    fn test_drop_synthetic_keeps_live_entries() {
        let mut log = ActivityLog::new();
        log.push(make_event(1).synthetic());
        log.push(make_event(2));
        log.drop_synthetic();

        let snapshot = log.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, 2);
    }

    #[test]
    fn test_icon_and_color_wire_names() {
        let json = serde_json::to_string(&IconKind::ShoppingCart).unwrap();
        assert_eq!(json, "\"shopping-cart\"");

        let color: ColorHint = serde_json::from_str("\"#EF4444\"").unwrap();
        assert_eq!(color, ColorHint::Danger);

        let unknown: ColorHint = serde_json::from_str("\"#123456\"").unwrap();
        assert_eq!(unknown, ColorHint::Other);
    }

    #[test]
    fn test_event_roundtrip_skips_provenance() {
        let event = make_event(7).synthetic();
        let json = serde_json::to_string(&event).unwrap();
        assert!(!json.contains("synthetic"));

        let parsed: ActivityEvent = serde_json::from_str(&json).unwrap();
        assert!(!parsed.synthetic);
    }
}
