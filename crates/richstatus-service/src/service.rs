use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use richstatus_core::{
    AltResult, Code, CreateUserAltResponse, CreateUserRequest, CreateUserResponse, StatusError,
    UserData, UserInfo, UserStatus,
    details::{BadRequest, ErrorInfo, ResourceInfo},
};
use tracing::{info, warn};

use crate::{
    store::{InsertError, UserNotFound, UserRepository},
    user::{NewUser, User, ValidationError},
};

/// Domain stamped on every ErrorInfo this service produces.
pub const ERROR_DOMAIN: &str = "richstatus.UserService";

/// In-band code for validation failures.
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
/// In-band code for uniqueness conflicts.
pub const ALREADY_EXISTS: &str = "ALREADY_EXISTS";

/// User operations exposed at the service boundary.
///
/// `create_user` reports failures out of band as a [`StatusError`];
/// `create_user_alt` reports the same failures in band through [`AltResult`].
#[async_trait]
pub trait UserService: Send + Sync + 'static {
    async fn create_user(
        &self,
        request: CreateUserRequest,
    ) -> Result<CreateUserResponse, StatusError>;

    async fn create_user_alt(&self, request: CreateUserRequest) -> CreateUserAltResponse;

    async fn get_user_by_email(&self, email: &str) -> Result<UserInfo, StatusError>;

    async fn get_user_by_username(&self, username: &str) -> Result<UserInfo, StatusError>;

    async fn list_users(&self) -> Vec<UserInfo>;
}

#[derive(Clone)]
pub struct UserServiceImpl {
    repository: Arc<dyn UserRepository>,
}

impl UserServiceImpl {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    async fn create(&self, request: CreateUserRequest) -> Result<User, CreateError> {
        let new_user = NewUser::try_from_parts(&request.username, &request.email)?;
        let user = self.repository.insert(new_user).await?;

        info!(
            user_id = %user.id,
            username = %user.username,
            "created user"
        );
        Ok(user)
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    async fn create_user(
        &self,
        request: CreateUserRequest,
    ) -> Result<CreateUserResponse, StatusError> {
        match self.create(request).await {
            Ok(user) => Ok(CreateUserResponse {
                user_id: user.id,
                status: UserStatus::Pending,
            }),
            Err(err) => {
                let status = err.to_status();
                warn!(code = %status.code(), reason = status.reason(), "rejected create user request");
                Err(status)
            }
        }
    }

    async fn create_user_alt(&self, request: CreateUserRequest) -> CreateUserAltResponse {
        let result = match self.create(request).await {
            Ok(user) => AltResult::success(UserData {
                user_id: user.id,
                status: UserStatus::Pending,
            }),
            Err(err) => {
                warn!(error = %err, "rejected create user request");
                err.to_alt()
            }
        };

        CreateUserAltResponse { result }
    }

    async fn get_user_by_email(&self, email: &str) -> Result<UserInfo, StatusError> {
        self.repository
            .find_by_email(email)
            .await
            .map(to_user_info)
            .map_err(|err| not_found_to_status(&err, "email"))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<UserInfo, StatusError> {
        self.repository
            .find_by_username(username)
            .await
            .map(to_user_info)
            .map_err(|err| not_found_to_status(&err, "username"))
    }

    async fn list_users(&self) -> Vec<UserInfo> {
        self.repository
            .list_all()
            .await
            .into_iter()
            .map(to_user_info)
            .collect()
    }
}

#[derive(Debug, thiserror::Error)]
enum CreateError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] InsertError),
}

impl CreateError {
    fn to_status(&self) -> StatusError {
        match self {
            Self::Validation(err) => validation_to_status(*err),
            Self::Store(InsertError::DuplicateEmail(value)) => {
                conflict("DUPLICATE_EMAIL", "email", value)
            }
            Self::Store(InsertError::DuplicateUsername(value)) => {
                conflict("DUPLICATE_USERNAME", "username", value)
            }
        }
    }

    fn to_alt<T>(&self) -> AltResult<T> {
        match self {
            Self::Validation(err) => AltResult::error(VALIDATION_ERROR, err.to_string()),
            Self::Store(err) => AltResult::error(ALREADY_EXISTS, err.to_string()),
        }
    }
}

fn validation_to_status(err: ValidationError) -> StatusError {
    StatusError::new(Code::InvalidArgument, "Validation error")
        .with_bad_request(BadRequest::single(err.field(), err.to_string()))
}

/// `lookup_field` names the key the lookup used.
fn not_found_to_status(err: &UserNotFound, lookup_field: &str) -> StatusError {
    StatusError::new(Code::NotFound, "user not found").with_resource_info(ResourceInfo {
        resource_type: "user".to_string(),
        resource_name: err.0.clone(),
        owner: String::new(),
        description: format!("no user with this {lookup_field}"),
    })
}

fn conflict(reason: &str, field: &str, value: &str) -> StatusError {
    StatusError::new(Code::AlreadyExists, "Resource already exists").with_error_info(ErrorInfo {
        reason: reason.to_string(),
        domain: ERROR_DOMAIN.to_string(),
        metadata: BTreeMap::from([
            ("field".to_string(), field.to_string()),
            ("value".to_string(), value.to_string()),
        ]),
    })
}

fn to_user_info(user: User) -> UserInfo {
    UserInfo {
        user_id: user.id,
        username: user.username,
        email: user.email,
    }
}
