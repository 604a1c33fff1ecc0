//! Device state codes and their addresses in the remote state store.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::device::DeviceKind;
use crate::user::UserId;

/// Integer state value written to the remote store.
///
/// Codes are device-specific: `1` means *locked* for a lock and *open* for
/// blinds. See [`capability::state_code`](crate::capability::state_code).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateCode(u8);

impl StateCode {
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for StateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Slash-separated location of one device's state, e.g.
/// `UsersData/abc123/lock/state`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StatePath(String);

impl StatePath {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How device states are laid out in the store: `{root}/{user}/{node}/state`.
///
/// `nodes` renames a device's node (a deployment might call its lock
/// `lock-front-door`); devices without an entry use their canonical name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StateLayout {
    pub root: String,
    pub nodes: BTreeMap<DeviceKind, String>,
}

impl Default for StateLayout {
    fn default() -> Self {
        Self {
            root: "UsersData".to_string(),
            nodes: BTreeMap::new(),
        }
    }
}

impl StateLayout {
    /// Node name used for `device`.
    #[must_use]
    pub fn node(&self, device: DeviceKind) -> &str {
        self.nodes
            .get(&device)
            .map_or(device.as_str(), String::as_str)
    }

    /// Full store path for `user`'s `device`.
    #[must_use]
    pub fn path(&self, user: &UserId, device: DeviceKind) -> StatePath {
        let root = self.root.trim_matches('/');
        let node = self.node(device).trim_matches('/');
        if root.is_empty() {
            StatePath(format!("{user}/{node}/state"))
        } else {
            StatePath(format!("{root}/{user}/{node}/state"))
        }
    }
}
