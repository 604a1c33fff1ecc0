//! Device — one of the controllable things in the home.
//!
//! The set is closed: the model may *name* anything, but only these kinds can
//! ever be actuated.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Kind of controllable device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Blinds,
    Switch,
    Lock,
}

impl DeviceKind {
    /// Every device kind, in capability-table order.
    pub const ALL: [Self; 3] = [Self::Blinds, Self::Switch, Self::Lock];

    /// Canonical lowercase name, as used by the model and in store paths.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blinds => "blinds",
            Self::Switch => "switch",
            Self::Lock => "lock",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceKind {
    type Err = ValidationError;

    /// Case-insensitive, whitespace-tolerant parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or(ValidationError::UnknownDevice(normalized))
    }
}
