//! Pipeline result — the artifact handed back to the UI.

use serde::{Deserialize, Serialize};

use crate::device::DeviceKind;

/// A command that was not applied, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    /// Device name as the model gave it (may be unknown).
    pub device: String,
    pub reason: String,
}

/// Outcome of one `submit_command` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub summary: String,
    /// Devices whose state write succeeded, in dispatch order.
    pub devices_controlled: Vec<DeviceKind>,
    pub failures: Vec<Failure>,
}

impl PipelineResult {
    /// Whether every requested command was applied.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
