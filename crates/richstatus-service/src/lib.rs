//! User record validation, storage, and the service boundary that reports
//! failures either as rich statuses or as in-band results.

pub mod service;
pub mod store;
pub mod user;

pub use service::{ERROR_DOMAIN, UserService, UserServiceImpl};
pub use store::{InMemoryUserRepository, InsertError, UserNotFound, UserRepository};
pub use user::{MAX_USERNAME_LENGTH, NewUser, User, ValidationError};
