use async_trait::async_trait;

use super::domain::{NewUser, User, UserId};
use crate::storage::RepositoryError;

/// Storage abstraction for accounts. Usernames and emails are unique; `insert` reports a
/// clash as [`RepositoryError::Conflict`].
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: NewUser) -> Result<User, RepositoryError>;
    async fn fetch(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;
    /// Emails compare ASCII case-insensitively.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
}
