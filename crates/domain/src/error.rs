//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`ArthurError`]
//! via `#[from]` (no `String`-only variants at the top level).

use crate::command::ActionKind;
use crate::device::DeviceKind;

/// Boxed error used to carry adapter-specific failures across port boundaries.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error for the arthur workspace.
#[derive(Debug, thiserror::Error)]
pub enum ArthurError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("interpretation error")]
    Interpretation(#[from] InterpretationError),

    #[error("state store error")]
    Storage(#[source] BoxError),
}

/// Domain invariant violations, raised at the system boundary or during
/// command validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("utterance must not be empty")]
    EmptyUtterance,

    #[error("utterance exceeds {max} characters")]
    UtteranceTooLong { max: usize },

    #[error("user id must not be empty")]
    EmptyUserId,

    #[error("user id contains a forbidden character: {0:?}")]
    InvalidUserId(char),

    #[error("unknown device: {0}")]
    UnknownDevice(String),

    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("action {action} is not supported by device {device}")]
    UnsupportedAction {
        device: DeviceKind,
        action: ActionKind,
    },
}

/// Failure of the language-model call itself.
///
/// Malformed model *output* is never an error; see
/// [`InterpretationResult::from_extraction`](crate::interpretation::InterpretationResult::from_extraction).
#[derive(Debug, thiserror::Error)]
pub enum InterpretationError {
    #[error("language model request timed out")]
    Timeout,

    #[error("language model rejected the credentials")]
    Unauthorized,

    #[error("language model returned HTTP status {0}")]
    Status(u16),

    #[error("language model returned no content")]
    EmptyResponse,

    #[error("language model request failed")]
    Request(#[source] BoxError),
}

/// Render an error and its whole `source()` chain as a single line.
///
/// Used wherever an error message is surfaced to the UI as plain text.
#[must_use]
pub fn report(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("connection refused")]
    struct Refused;

    #[test]
    fn should_convert_validation_error_with_from() {
        let err: ArthurError = ValidationError::EmptyUtterance.into();
        assert!(matches!(
            err,
            ArthurError::Validation(ValidationError::EmptyUtterance)
        ));
    }

    #[test]
    fn should_convert_interpretation_error_with_from() {
        let err: ArthurError = InterpretationError::Timeout.into();
        assert!(matches!(
            err,
            ArthurError::Interpretation(InterpretationError::Timeout)
        ));
    }

    #[test]
    fn should_display_unsupported_action() {
        let err = ValidationError::UnsupportedAction {
            device: DeviceKind::Blinds,
            action: ActionKind::Lock,
        };
        assert_eq!(
            err.to_string(),
            "action lock is not supported by device blinds"
        );
    }

    #[test]
    fn should_report_full_source_chain() {
        let err = ArthurError::Storage(Box::new(Refused));
        assert_eq!(report(&err), "state store error: connection refused");
    }

    #[test]
    fn should_report_single_error_without_separator() {
        assert_eq!(
            report(&InterpretationError::Status(503)),
            "language model returned HTTP status 503"
        );
    }
}
