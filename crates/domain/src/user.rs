//! User identity as handed over by the authentication provider.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Characters that may not appear in a user id: they would change the shape
/// of the store path built from it.
const FORBIDDEN: [char; 6] = ['/', '.', '#', '$', '[', ']'];

/// Opaque user identifier (the auth provider's `uid`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and wrap a raw user id.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyUserId`] for blank input and
    /// [`ValidationError::InvalidUserId`] when a path separator or other
    /// reserved character is present.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyUserId);
        }
        if let Some(c) = trimmed
            .chars()
            .find(|c| FORBIDDEN.contains(c) || c.is_control())
        {
            return Err(ValidationError::InvalidUserId(c));
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_accept_auth_provider_uid() {
        let user = UserId::parse("Xk29sLq0PbT7").unwrap();
        assert_eq!(user.as_str(), "Xk29sLq0PbT7");
    }

    #[test]
    fn should_reject_empty_user_id() {
        assert_eq!(UserId::parse("   "), Err(ValidationError::EmptyUserId));
    }

    #[test]
    fn should_reject_path_separator() {
        assert_eq!(
            UserId::parse("abc/../other"),
            Err(ValidationError::InvalidUserId('/'))
        );
    }

    #[test]
    fn should_reject_reserved_characters() {
        assert_eq!(
            UserId::parse("a#b"),
            Err(ValidationError::InvalidUserId('#'))
        );
        assert_eq!(
            UserId::parse("a$b"),
            Err(ValidationError::InvalidUserId('$'))
        );
    }

    #[test]
    fn should_validate_when_deserializing() {
        let ok: Result<UserId, _> = serde_json::from_str("\"uid-1\"");
        assert!(ok.is_ok());
        let bad: Result<UserId, _> = serde_json::from_str("\"a.b\"");
        assert!(bad.is_err());
    }
}
