//! Placeholder activity shown when the feed never comes up.

use chrono::{DateTime, Duration, Utc};

use crate::domain::entities::{ActivityEvent, ColorHint, IconKind, RelatedUser, RelatedVendor};

/// Builds the fixed placeholder dataset, newest-first, back-dated
/// relative to `now`. Every entry carries the synthetic flag so it is
/// evicted the moment live data arrives.
#[must_use]
pub fn synthetic_activities(now: DateTime<Utc>) -> Vec<ActivityEvent> {
    vec![
        ActivityEvent::new(
            1,
            "New Order #1001",
            "User John Doe ordered from Tasty Bites",
            IconKind::ShoppingCart,
            ColorHint::Success,
            now - Duration::minutes(5),
        )
        .with_amount(25.50)
        .with_user(RelatedUser {
            id: 1,
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
        })
        .with_vendor(RelatedVendor {
            id: 2,
            name: "Tasty Bites".to_string(),
        })
        .synthetic(),
        ActivityEvent::new(
            2,
            "Vendor Approved",
            "Vendor \"Pizza Palace\" has been approved",
            IconKind::CheckCircle,
            ColorHint::Success,
            now - Duration::minutes(15),
        )
        .with_vendor(RelatedVendor {
            id: 3,
            name: "Pizza Palace".to_string(),
        })
        .synthetic(),
        ActivityEvent::new(
            3,
            "New Courier Registered",
            "Courier \"Mike Johnson\" has registered",
            IconKind::Truck,
            ColorHint::Info,
            now - Duration::minutes(30),
        )
        .with_user(RelatedUser {
            id: 4,
            name: "Mike Johnson".to_string(),
            email: "mike@example.com".to_string(),
        })
        .synthetic(),
        ActivityEvent::new(
            4,
            "Order Completed",
            "Order #999 has been completed successfully",
            IconKind::CheckCircle,
            ColorHint::Success,
            now - Duration::minutes(45),
        )
        .with_amount(45.00)
        .with_user(RelatedUser {
            id: 5,
            name: "Sarah Wilson".to_string(),
            email: "sarah@example.com".to_string(),
        })
        .synthetic(),
        ActivityEvent::new(
            5,
            "Vendor Rejected",
            "Vendor \"Burger King\" has been rejected",
            IconKind::XCircle,
            ColorHint::Danger,
            now - Duration::minutes(60),
        )
        .with_vendor(RelatedVendor {
            id: 6,
            name: "Burger King".to_string(),
        })
        .synthetic(),
    ]
}
