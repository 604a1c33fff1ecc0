//! Dispatch outcome — what happened to one command.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::device::DeviceKind;

/// Why a command was not applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchFailure {
    /// Rejected by validation; the store was never contacted.
    Unsupported,
    /// Inside the device's cool-down window; the store was never contacted.
    Busy,
    /// The store write failed or timed out.
    Write(String),
}

impl fmt::Display for DispatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported => f.write_str("unsupported device/action"),
            Self::Busy => f.write_str("device busy"),
            Self::Write(detail) => f.write_str(detail),
        }
    }
}

/// Result of dispatching one command. One per command; never merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchOutcome {
    pub command: Command,
    pub succeeded: bool,
    pub error_detail: Option<String>,
}

impl DispatchOutcome {
    #[must_use]
    pub fn success(command: Command) -> Self {
        Self {
            command,
            succeeded: true,
            error_detail: None,
        }
    }

    #[must_use]
    pub fn failure(command: Command, failure: &DispatchFailure) -> Self {
        Self {
            command,
            succeeded: false,
            error_detail: Some(failure.to_string()),
        }
    }

    /// The command's device, if it names a known one.
    #[must_use]
    pub fn device(&self) -> Option<DeviceKind> {
        self.command.device.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ActionKind;

    #[test]
    fn should_describe_short_circuit_failures() {
        assert_eq!(
            DispatchFailure::Unsupported.to_string(),
            "unsupported device/action"
        );
        assert_eq!(DispatchFailure::Busy.to_string(), "device busy");
    }

    #[test]
    fn should_carry_write_error_message() {
        let outcome = DispatchOutcome::failure(
            Command::from((DeviceKind::Lock, ActionKind::Lock)),
            &DispatchFailure::Write("permission denied".to_string()),
        );
        assert!(!outcome.succeeded);
        assert_eq!(outcome.error_detail.as_deref(), Some("permission denied"));
    }

    #[test]
    fn should_expose_device_of_known_command() {
        let outcome = DispatchOutcome::success(Command::new("blinds", "open"));
        assert_eq!(outcome.device(), Some(DeviceKind::Blinds));
        let unknown = DispatchOutcome::success(Command::new("garage", "open"));
        assert_eq!(unknown.device(), None);
    }
}
