use async_trait::async_trait;

use super::{NewUser, User};
use crate::domain::DomainResult;

/// Credential store
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `DomainError::DuplicateIdentity` when the username or email
    /// is already taken.
    async fn create(&self, user: NewUser) -> DomainResult<User>;

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>>;
}
