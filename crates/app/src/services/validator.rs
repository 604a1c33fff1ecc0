//! Action validator — checks requested commands against the capability table.

use arthur_domain::capability;
use arthur_domain::command::{Actuation, Command};
use arthur_domain::error::ValidationError;

/// A command paired with its validation verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub command: Command,
    pub verdict: Result<Actuation, ValidationError>,
}

impl Validation {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.verdict.is_ok()
    }

    /// The resolved actuation, when valid.
    #[must_use]
    pub fn actuation(&self) -> Option<&Actuation> {
        self.verdict.as_ref().ok()
    }
}

/// Pure, synchronous capability check. Never fails: problems are recorded in
/// each [`Validation`]'s verdict.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionValidator;

impl ActionValidator {
    /// Validate `commands`, preserving their order.
    #[must_use]
    pub fn validate(&self, commands: &[Command]) -> Vec<Validation> {
        commands.iter().map(|command| self.check(command)).collect()
    }

    /// Validate a single command.
    #[must_use]
    pub fn check(&self, command: &Command) -> Validation {
        let verdict = capability::resolve(command);
        if let Err(err) = &verdict {
            tracing::debug!(%command, %err, "command rejected by capability table");
        }
        Validation {
            command: command.clone(),
            verdict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arthur_domain::command::ActionKind;
    use arthur_domain::device::DeviceKind;
    use arthur_domain::state::StateCode;

    #[test]
    fn should_accept_allowed_pairs() {
        let validations = ActionValidator.validate(&[
            Command::new("lock", "unlock"),
            Command::new("switch", "turn on"),
            Command::new("blinds", "close"),
        ]);
        assert!(validations.iter().all(Validation::is_valid));
        assert_eq!(
            validations[0].actuation(),
            Some(&Actuation {
                device: DeviceKind::Lock,
                action: ActionKind::Unlock,
                code: StateCode::new(2),
            })
        );
    }

    #[test]
    fn should_mark_unknown_device_invalid() {
        let validations =
            ActionValidator.validate(&[Command::new("thermostat", "turn_on")]);
        assert!(!validations[0].is_valid());
        assert_eq!(
            validations[0].verdict,
            Err(ValidationError::UnknownDevice("thermostat".to_string()))
        );
    }

    #[test]
    fn should_mark_action_of_other_device_invalid() {
        let validations = ActionValidator.validate(&[Command::new("lock", "open")]);
        assert_eq!(
            validations[0].verdict,
            Err(ValidationError::UnsupportedAction {
                device: DeviceKind::Lock,
                action: ActionKind::Open,
            })
        );
    }

    #[test]
    fn should_preserve_input_order_with_mixed_verdicts() {
        let commands = vec![
            Command::new("blinds", "lock"),
            Command::new("lock", "lock"),
            Command::new("garage", "open"),
            Command::new("switch", "turn_off"),
        ];
        let validations = ActionValidator.validate(&commands);
        let echoed: Vec<_> = validations.iter().map(|v| v.command.clone()).collect();
        assert_eq!(echoed, commands);
        let verdicts: Vec<_> = validations.iter().map(Validation::is_valid).collect();
        assert_eq!(verdicts, vec![false, true, false, true]);
    }

    #[test]
    fn should_only_emit_valid_pairs_from_the_capability_table() {
        let mut commands = Vec::new();
        for device in ["blinds", "switch", "lock", "door"] {
            for action in [
                "lock", "unlock", "turn_on", "turn_off", "open", "close", "explode",
            ] {
                commands.push(Command::new(device, action));
            }
        }
        for validation in ActionValidator.validate(&commands) {
            if let Some(actuation) = validation.actuation() {
                assert!(DeviceKind::ALL.contains(&actuation.device));
                assert!(
                    capability::allowed_actions(actuation.device)
                        .any(|allowed| allowed == actuation.action)
                );
            }
        }
    }

    #[test]
    fn should_check_single_command_like_a_batch_of_one() {
        let command = Command::new("Switch", "Turn On");
        assert_eq!(
            ActionValidator.check(&command),
            ActionValidator.validate(std::slice::from_ref(&command)).remove(0)
        );
        assert!(ActionValidator.check(&command).is_valid());
    }

    #[test]
    fn should_return_empty_for_no_commands() {
        assert!(ActionValidator.validate(&[]).is_empty());
    }
}
