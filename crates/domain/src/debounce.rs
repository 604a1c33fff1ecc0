//! Debounce entry — a (user, device) pair inside its cool-down window.

use serde::Serialize;

use crate::device::DeviceKind;
use crate::time::{self, Duration, Timestamp};
use crate::user::UserId;

/// Created after a successful actuation of a device with a cool-down.
///
/// Entries are never deleted: they simply stop being active once
/// `busy_until` has passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebounceEntry {
    pub user: UserId,
    pub device: DeviceKind,
    pub busy_until: Timestamp,
}

impl DebounceEntry {
    #[must_use]
    pub fn new(user: UserId, device: DeviceKind, now: Timestamp, cooldown: Duration) -> Self {
        Self {
            user,
            device,
            busy_until: time::saturating_add(now, cooldown),
        }
    }

    /// Whether the window still covers `now`.
    #[must_use]
    pub fn is_active(&self, now: Timestamp) -> bool {
        self.busy_until > now
    }
}

/// Busy signal for one device, as shown to the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceStatus {
    pub device: DeviceKind,
    pub busy: bool,
    /// End of the cool-down window, when busy.
    pub busy_until: Option<Timestamp>,
}

impl DeviceStatus {
    /// Status of `device` given its latest entry, if any.
    #[must_use]
    pub fn from_entry(device: DeviceKind, entry: Option<&DebounceEntry>, now: Timestamp) -> Self {
        let busy_until = entry
            .filter(|entry| entry.is_active(now))
            .map(|entry| entry.busy_until);
        Self {
            device,
            busy: busy_until.is_some(),
            busy_until,
        }
    }
}
