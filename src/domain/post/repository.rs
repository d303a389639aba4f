use async_trait::async_trait;

use super::{NewPost, Post, PostChanges};
use crate::domain::DomainResult;
use crate::shared::PaginatedResult;

/// Resource store for posts
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: NewPost) -> DomainResult<Post>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Post>>;

    /// Newest first.
    async fn list(&self, page: u32, limit: u32) -> DomainResult<PaginatedResult<Post>>;

    /// Returns `None` when the post does not exist.
    async fn update(&self, id: i32, changes: PostChanges) -> DomainResult<Option<Post>>;

    /// Returns `false` when the post does not exist. Comments go with it.
    async fn delete(&self, id: i32) -> DomainResult<bool>;
}
