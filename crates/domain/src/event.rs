//! Event — an immutable record of an actuation attempt.
//!
//! Events are published after a command reached the state store, whether the
//! write succeeded or not. Short-circuited commands (unsupported, busy)
//! produce no event.

use serde::{Deserialize, Serialize};

use crate::device::DeviceKind;
use crate::id::EventId;
use crate::time::{Timestamp, now};
use crate::user::UserId;

/// Kind of event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    DeviceActuated,
    ActuationFailed,
}

/// A recorded actuation attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub event_type: EventType,
    pub user_id: UserId,
    pub device: DeviceKind,
    /// Event-specific payload (`action`, `code`, `error`, …).
    pub data: serde_json::Value,
    pub timestamp: Timestamp,
}

impl Event {
    /// Create a new event stamped with the current time.
    #[must_use]
    pub fn new(
        event_type: EventType,
        user_id: UserId,
        device: DeviceKind,
        data: serde_json::Value,
    ) -> Self {
        Self {
            id: EventId::new(),
            event_type,
            user_id,
            device,
            data,
            timestamp: now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_assign_unique_ids() {
        let user = UserId::parse("u1").unwrap();
        let a = Event::new(
            EventType::DeviceActuated,
            user.clone(),
            DeviceKind::Lock,
            serde_json::json!({}),
        );
        let b = Event::new(
            EventType::DeviceActuated,
            user,
            DeviceKind::Lock,
            serde_json::json!({}),
        );
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn should_serialize_event_type_as_snake_case() {
        let event = Event::new(
            EventType::ActuationFailed,
            UserId::parse("u1").unwrap(),
            DeviceKind::Switch,
            serde_json::json!({"error": "timeout"}),
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], "actuation_failed");
        assert_eq!(json["device"], "switch");
        assert_eq!(json["user_id"], "u1");
    }
}
