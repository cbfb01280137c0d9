use serde::{Deserialize, Serialize};

use crate::StatusError;

/// In-band failure carried inside a response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Application-level error code, e.g. `VALIDATION_ERROR`.
    pub code: String,
    /// Human-readable summary.
    pub message: String,
}

/// A response slot holding either a success payload or an error, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AltResult<T> {
    /// Operation succeeded.
    Success(T),
    /// Operation failed.
    Error(ErrorDetails),
}

impl<T> AltResult<T> {
    pub const fn success(payload: T) -> Self {
        Self::Success(payload)
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error(ErrorDetails {
            code: code.into(),
            message: message.into(),
        })
    }

    /// The success payload, or `None` when this is an error.
    pub const fn success_value(&self) -> Option<&T> {
        match self {
            Self::Success(payload) => Some(payload),
            Self::Error(_) => None,
        }
    }

    /// The error payload, or `None` when this is a success.
    pub const fn error_value(&self) -> Option<&ErrorDetails> {
        match self {
            Self::Success(_) => None,
            Self::Error(details) => Some(details),
        }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Converts to a `Result`, mapping the error arm to an in-band payload.
    pub fn into_result(self) -> Result<T, ErrorDetails> {
        match self {
            Self::Success(payload) => Ok(payload),
            Self::Error(details) => Err(details),
        }
    }
}

impl From<&StatusError> for ErrorDetails {
    /// Carries an out-of-band status in-band; typed details are not carried over.
    fn from(err: &StatusError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.message().to_string(),
        }
    }
}
