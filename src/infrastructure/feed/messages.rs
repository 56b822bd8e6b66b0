//! Decoding of inbound activity feed frames.
//!
//! A frame is a JSON object `{"type": "...", "data": {...}}`. The string
//! discriminant is matched exactly once, here; everything downstream works
//! with the [`FeedMessage`] sum type.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::entities::{ActivityEvent, ColorHint, IconKind};

use super::error::FeedError;

/// A decoded inbound feed message.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedMessage {
    /// Handshake acknowledgement from the backend.
    ConnectionEstablished,
    /// A fully formed activity entry.
    ActivityUpdate(ActivityEvent),
    /// A vendor signed up.
    VendorRegistered {
        /// Vendor business name
        business_name: String,
    },
    /// A vendor application was approved.
    VendorApproved {
        /// Vendor business name
        business_name: String,
    },
    /// A vendor application was rejected.
    VendorRejected {
        /// Vendor business name
        business_name: String,
    },
    /// A courier signed up.
    CourierRegistered {
        /// Courier display name
        name: String,
    },
    /// A courier application was approved.
    CourierApproved {
        /// Courier display name
        name: String,
    },
    /// A courier application was rejected.
    CourierRejected {
        /// Courier display name
        name: String,
    },
    /// A message kind this client does not know.
    Unknown {
        /// The unrecognized discriminant
        kind: String,
    },
}

#[derive(Debug, Deserialize)]
struct RawFrame {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct VendorData {
    #[serde(default)]
    business_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CourierData {
    #[serde(default)]
    name: Option<String>,
}

fn vendor_name(data: Option<serde_json::Value>) -> String {
    data.and_then(|value| serde_json::from_value::<VendorData>(value).ok())
        .and_then(|data| data.business_name)
        .unwrap_or_else(|| "Unknown".to_string())
}

fn courier_name(data: Option<serde_json::Value>) -> String {
    data.and_then(|value| serde_json::from_value::<CourierData>(value).ok())
        .and_then(|data| data.name)
        .unwrap_or_else(|| "Unknown".to_string())
}

impl FeedMessage {
    /// Decodes a raw text frame into a message.
    ///
    /// Unrecognized discriminants decode to [`FeedMessage::Unknown`].
    ///
    /// # Errors
    /// Returns `FeedError::Decode` only for malformed JSON or an
    /// `activity_update` frame whose payload does not fit the event shape.
    pub fn parse(raw: &str) -> Result<Self, FeedError> {
        let frame: RawFrame =
            serde_json::from_str(raw).map_err(|e| FeedError::decode(e.to_string()))?;
        Ok(match frame.kind.as_str() {
            "connection.established" => Self::ConnectionEstablished,
            "activity_update" => {
                let data = frame
                    .data
                    .ok_or_else(|| FeedError::decode("activity_update frame without data"))?;
                let event: ActivityEvent =
                    serde_json::from_value(data).map_err(|e| FeedError::decode(e.to_string()))?;
                Self::ActivityUpdate(event)
            }
            "vendor.registered" => Self::VendorRegistered {
                business_name: vendor_name(frame.data),
            },
            "vendor.approved" => Self::VendorApproved {
                business_name: vendor_name(frame.data),
            },
            "vendor.rejected" => Self::VendorRejected {
                business_name: vendor_name(frame.data),
            },
            "courier.registered" => Self::CourierRegistered {
                name: courier_name(frame.data),
            },
            "courier.approved" => Self::CourierApproved {
                name: courier_name(frame.data),
            },
            "courier.rejected" => Self::CourierRejected {
                name: courier_name(frame.data),
            },
            other => Self::Unknown {
                kind: other.to_string(),
            },
        })
    }

    /// The discriminant this message was decoded from, for logging.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::ConnectionEstablished => "connection.established",
            Self::ActivityUpdate(_) => "activity_update",
            Self::VendorRegistered { .. } => "vendor.registered",
            Self::VendorApproved { .. } => "vendor.approved",
            Self::VendorRejected { .. } => "vendor.rejected",
            Self::CourierRegistered { .. } => "courier.registered",
            Self::CourierApproved { .. } => "courier.approved",
            Self::CourierRejected { .. } => "courier.rejected",
            Self::Unknown { kind } => kind,
        }
    }

    /// Converts the message into a projection entry, if it produces one.
    ///
    /// Lifecycle notifications are synthesized into entries with a fixed
    /// icon and color per kind; handshakes and unknown kinds produce none.
    #[must_use]
    pub fn into_event(self, now: DateTime<Utc>) -> Option<ActivityEvent> {
        let id = now.timestamp_millis();
        match self {
            Self::ConnectionEstablished | Self::Unknown { .. } => None,
            Self::ActivityUpdate(event) => Some(event),
            Self::VendorRegistered { business_name } => Some(ActivityEvent::new(
                id,
                "New Vendor Registered",
                format!("Vendor \"{business_name}\" has registered"),
                IconKind::Store,
                ColorHint::Info,
                now,
            )),
            Self::VendorApproved { business_name } => Some(ActivityEvent::new(
                id,
                "Vendor Approved",
                format!("Vendor \"{business_name}\" has been approved"),
                IconKind::CheckCircle,
                ColorHint::Success,
                now,
            )),
            Self::VendorRejected { business_name } => Some(ActivityEvent::new(
                id,
                "Vendor Rejected",
                format!("Vendor \"{business_name}\" has been rejected"),
                IconKind::XCircle,
                ColorHint::Danger,
                now,
            )),
            Self::CourierRegistered { name } => Some(ActivityEvent::new(
                id,
                "New Courier Registered",
                format!("Courier \"{name}\" has registered"),
                IconKind::Truck,
                ColorHint::Info,
                now,
            )),
            Self::CourierApproved { name } => Some(ActivityEvent::new(
                id,
                "Courier Approved",
                format!("Courier \"{name}\" has been approved"),
                IconKind::CheckCircle,
                ColorHint::Success,
                now,
            )),
            Self::CourierRejected { name } => Some(ActivityEvent::new(
                id,
                "Courier Rejected",
                format!("Courier \"{name}\" has been rejected"),
                IconKind::XCircle,
                ColorHint::Danger,
                now,
            )),
        }
    }
}
