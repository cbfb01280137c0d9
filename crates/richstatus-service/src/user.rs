//! User records and the validation applied before they reach the store.

use email_address::EmailAddress;
use richstatus_core::UserId;
use thiserror::Error;

/// Longest accepted username, in characters.
pub const MAX_USERNAME_LENGTH: usize = 50;

/// Why a create request was rejected before touching the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("username cannot be empty")]
    EmptyUsername,
    #[error("username exceeds maximum length")]
    UsernameTooLong,
    #[error("email cannot be empty")]
    EmptyEmail,
    #[error("invalid email format")]
    InvalidEmail,
}

impl ValidationError {
    /// Request field the failure refers to.
    pub const fn field(self) -> &'static str {
        match self {
            Self::EmptyUsername | Self::UsernameTooLong => "username",
            Self::EmptyEmail | Self::InvalidEmail => "email",
        }
    }
}

/// A validated record that has not been stored yet.
///
/// ## Invariants
/// - `username` is non-empty and at most [`MAX_USERNAME_LENGTH`] characters.
/// - `email` is non-empty and a syntactically valid address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    username: String,
    email: String,
}

impl NewUser {
    /// Validates raw inputs. Username rules are checked before email rules.
    pub fn try_from_parts(username: &str, email: &str) -> Result<Self, ValidationError> {
        if username.is_empty() {
            return Err(ValidationError::EmptyUsername);
        }
        if username.chars().count() > MAX_USERNAME_LENGTH {
            return Err(ValidationError::UsernameTooLong);
        }
        if email.is_empty() {
            return Err(ValidationError::EmptyEmail);
        }
        if !EmailAddress::is_valid(email) {
            return Err(ValidationError::InvalidEmail);
        }

        Ok(Self {
            username: username.to_owned(),
            email: email.to_owned(),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub(crate) fn into_user(self, id: UserId) -> User {
        User {
            id,
            username: self.username,
            email: self.email,
        }
    }
}

/// A stored record with its assigned identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
}
