use serde::{Deserialize, Serialize};

use crate::{AltResult, UserId};

/// Lifecycle state reported for a user record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    /// No state recorded.
    #[default]
    Unspecified,
    /// Account is usable.
    Active,
    /// Account awaits activation.
    Pending,
}

/// Request to create a user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    /// Requested unique username.
    pub username: String,
    /// Requested unique email address.
    pub email: String,
}

/// Successful creation on the status-channel path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserResponse {
    /// Identity assigned by the store.
    pub user_id: UserId,
    /// Lifecycle state of the new record.
    pub status: UserStatus,
}

/// Success payload carried in-band by [`CreateUserAltResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    /// Identity assigned by the store.
    pub user_id: UserId,
    /// Lifecycle state of the new record.
    pub status: UserStatus,
}

/// Response for the in-band pattern: the outcome lives in the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserAltResponse {
    /// Exactly one of success or error.
    pub result: AltResult<UserData>,
}

/// A user record as returned by lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub user_id: UserId,
    pub username: String,
    pub email: String,
}
