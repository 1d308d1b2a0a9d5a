//! User identity as seen by the address book.
//!
//! User documents are created by the registration flow; this crate only ever
//! addresses them by identifier.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors returned by [`UserId::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must not contain whitespace"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Opaque user identifier used to locate the owning user document.
///
/// The value is matched verbatim against the document store key, so only
/// emptiness and embedded whitespace are rejected.
///
/// # Examples
/// ```
/// use address_book::domain::UserId;
///
/// let id = UserId::new("64f1c2a9e4b0a1b2c3d4e5f6").expect("valid id");
/// assert_eq!(id.as_ref(), "64f1c2a9e4b0a1b2c3d4e5f6");
/// assert!(UserId::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.chars().any(char::is_whitespace) {
            return Err(UserValidationError::InvalidId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserValidationError::EmptyId)]
    #[case(" abc", UserValidationError::InvalidId)]
    #[case("ab c", UserValidationError::InvalidId)]
    #[case("abc\n", UserValidationError::InvalidId)]
    fn rejects_invalid_ids(#[case] raw: &str, #[case] expected: UserValidationError) {
        let err = UserId::new(raw).expect_err("invalid id");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn accepts_object_id_hex() {
        let id = UserId::new("64f1c2a9e4b0a1b2c3d4e5f6").expect("valid id");
        assert_eq!(id.to_string(), "64f1c2a9e4b0a1b2c3d4e5f6");
    }

    #[rstest]
    fn random_ids_are_distinct() {
        assert_ne!(UserId::random(), UserId::random());
    }

    #[rstest]
    fn deserialisation_validates() {
        let result: Result<UserId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }
}
