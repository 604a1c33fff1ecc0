//! Commands — `(device, action)` pairs requested by the user, and the
//! utterances they come from.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::device::DeviceKind;
use crate::error::ValidationError;
use crate::state::StateCode;

/// Something a device can be asked to do.
///
/// Actions are device-scoped: which ones a device accepts is decided by the
/// [capability table](crate::capability), not by this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Lock,
    Unlock,
    TurnOn,
    TurnOff,
    Open,
    Close,
}

impl ActionKind {
    /// Canonical snake-case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lock => "lock",
            Self::Unlock => "unlock",
            Self::TurnOn => "turn_on",
            Self::TurnOff => "turn_off",
            Self::Open => "open",
            Self::Close => "close",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = ValidationError;

    /// Accepts `turn_on`, `turn on`, `Turn-On`, … for every action.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_action(s);
        match normalized.as_str() {
            "lock" => Ok(Self::Lock),
            "unlock" => Ok(Self::Unlock),
            "turn_on" => Ok(Self::TurnOn),
            "turn_off" => Ok(Self::TurnOff),
            "open" => Ok(Self::Open),
            "close" => Ok(Self::Close),
            _ => Err(ValidationError::UnknownAction(normalized)),
        }
    }
}

fn normalize_action(s: &str) -> String {
    s.to_ascii_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// A single `(device, action)` pair as extracted from model output.
///
/// Both halves are kept as normalised text: the interpreter does structural
/// extraction only, and resolution against the capability table happens in
/// validation, which may reject either half.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Command {
    pub device: String,
    pub action: String,
}

impl Command {
    /// Build a command, trimming and lowercasing both halves.
    pub fn new(device: impl AsRef<str>, action: impl AsRef<str>) -> Self {
        Self {
            device: device.as_ref().trim().to_ascii_lowercase(),
            action: action.as_ref().trim().to_ascii_lowercase(),
        }
    }
}

impl From<(DeviceKind, ActionKind)> for Command {
    fn from((device, action): (DeviceKind, ActionKind)) -> Self {
        Self::new(device.as_str(), action.as_str())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.device, self.action)
    }
}

/// A command that passed validation, resolved to its state code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Actuation {
    pub device: DeviceKind,
    pub action: ActionKind,
    pub code: StateCode,
}

/// Free-text user request, validated at the system boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Utterance(String);

impl Utterance {
    /// Longest accepted utterance, in characters.
    pub const MAX_CHARS: usize = 2000;

    /// Validate and wrap a raw utterance. Surrounding whitespace is removed.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyUtterance`] for blank input and
    /// [`ValidationError::UtteranceTooLong`] past [`Self::MAX_CHARS`].
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyUtterance);
        }
        if trimmed.chars().count() > Self::MAX_CHARS {
            return Err(ValidationError::UtteranceTooLong {
                max: Self::MAX_CHARS,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Utterance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
