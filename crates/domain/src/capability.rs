//! Capability table — the fixed mapping from device kind to the actions it
//! accepts, the state code each action writes, and its cool-down window.
//!
//! | Device | Action → code | Default cool-down |
//! |--------|---------------|-------------------|
//! | `blinds` | `open` → 1, `close` → 2 | none |
//! | `switch` | `turn_on` → 1, `turn_off` → 2 | none |
//! | `lock` | `lock` → 1, `unlock` → 2 | 3000 ms |
//!
//! Within one device every action maps to exactly one code and no two
//! actions share a code.

use crate::command::{ActionKind, Actuation, Command};
use crate::device::DeviceKind;
use crate::error::ValidationError;
use crate::state::StateCode;
use crate::time::{Duration, millis};

/// One row of the capability table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capability {
    pub device: DeviceKind,
    pub actions: &'static [(ActionKind, StateCode)],
    pub cooldown_ms: Option<u64>,
}

static TABLE: [Capability; 3] = [
    Capability {
        device: DeviceKind::Blinds,
        actions: &[
            (ActionKind::Open, StateCode::new(1)),
            (ActionKind::Close, StateCode::new(2)),
        ],
        cooldown_ms: None,
    },
    Capability {
        device: DeviceKind::Switch,
        actions: &[
            (ActionKind::TurnOn, StateCode::new(1)),
            (ActionKind::TurnOff, StateCode::new(2)),
        ],
        cooldown_ms: None,
    },
    Capability {
        device: DeviceKind::Lock,
        actions: &[
            (ActionKind::Lock, StateCode::new(1)),
            (ActionKind::Unlock, StateCode::new(2)),
        ],
        cooldown_ms: Some(3000),
    },
];

/// The table row for `device`.
#[must_use]
pub fn capability(device: DeviceKind) -> &'static Capability {
    match device {
        DeviceKind::Blinds => &TABLE[0],
        DeviceKind::Switch => &TABLE[1],
        DeviceKind::Lock => &TABLE[2],
    }
}

/// Every row, in table order.
#[must_use]
pub fn table() -> &'static [Capability] {
    &TABLE
}

/// Actions `device` accepts, in table order.
pub fn allowed_actions(device: DeviceKind) -> impl Iterator<Item = ActionKind> {
    capability(device).actions.iter().map(|(action, _)| *action)
}

/// Whether `device` accepts `action`.
#[must_use]
pub fn supports(device: DeviceKind, action: ActionKind) -> bool {
    state_code(device, action).is_some()
}

/// The code written when `device` performs `action`, if it can.
#[must_use]
pub fn state_code(device: DeviceKind, action: ActionKind) -> Option<StateCode> {
    capability(device)
        .actions
        .iter()
        .find(|(candidate, _)| *candidate == action)
        .map(|(_, code)| *code)
}

/// Cool-down applied after a successful actuation, if any.
#[must_use]
pub fn default_cooldown(device: DeviceKind) -> Option<Duration> {
    capability(device).cooldown_ms.map(millis)
}

/// Resolve a raw command against the table.
///
/// # Errors
///
/// Returns [`ValidationError::UnknownDevice`], [`ValidationError::UnknownAction`]
/// or [`ValidationError::UnsupportedAction`] when the pair cannot be actuated.
pub fn resolve(command: &Command) -> Result<Actuation, ValidationError> {
    let device: DeviceKind = command.device.parse()?;
    let action: ActionKind = command.action.parse()?;
    let code = state_code(device, action)
        .ok_or(ValidationError::UnsupportedAction { device, action })?;
    Ok(Actuation {
        device,
        action,
        code,
    })
}
