use async_trait::async_trait;

use super::{Comment, NewComment};
use crate::domain::DomainResult;

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, comment: NewComment) -> DomainResult<Comment>;

    /// Oldest first.
    async fn list_for_post(&self, post_id: i32) -> DomainResult<Vec<Comment>>;
}
