use async_trait::async_trait;
use richstatus_core::UserId;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::user::{NewUser, User};

/// Uniqueness conflicts reported by [`UserRepository::insert`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsertError {
    #[error("user with email already exists: {0}")]
    DuplicateEmail(String),
    #[error("user with username already exists: {0}")]
    DuplicateUsername(String),
}

/// No record matches the lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("user not found: {0}")]
pub struct UserNotFound(pub String);

/// Storage port for user records.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Stores `user` under a fresh identity.
    ///
    /// Email uniqueness is checked before username uniqueness.
    async fn insert(&self, user: NewUser) -> Result<User, InsertError>;

    async fn find_by_email(&self, email: &str) -> Result<User, UserNotFound>;

    async fn find_by_username(&self, username: &str) -> Result<User, UserNotFound>;

    /// Snapshot of every stored record in insertion order.
    async fn list_all(&self) -> Vec<User>;
}

/// Linear in-memory store guarded by a read/write lock.
///
/// Inserts hold the write lock across the uniqueness check and the push, so
/// two concurrent inserts can never both pass the check.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User, InsertError> {
        let mut users = self.users.write().await;

        if users.iter().any(|existing| existing.email == user.email()) {
            return Err(InsertError::DuplicateEmail(user.email().to_owned()));
        }
        if users
            .iter()
            .any(|existing| existing.username == user.username())
        {
            return Err(InsertError::DuplicateUsername(user.username().to_owned()));
        }

        let mut id = UserId::new_v4();
        while users.iter().any(|existing| existing.id == id) {
            id = UserId::new_v4();
        }

        let stored = user.into_user(id);
        users.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_email(&self, email: &str) -> Result<User, UserNotFound> {
        self.users
            .read()
            .await
            .iter()
            .find(|user| user.email == email)
            .cloned()
            .ok_or_else(|| UserNotFound(email.to_owned()))
    }

    async fn find_by_username(&self, username: &str) -> Result<User, UserNotFound> {
        self.users
            .read()
            .await
            .iter()
            .find(|user| user.username == username)
            .cloned()
            .ok_or_else(|| UserNotFound(username.to_owned()))
    }

    async fn list_all(&self) -> Vec<User> {
        self.users.read().await.clone()
    }
}
