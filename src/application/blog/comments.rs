//! Comment use-cases

use std::sync::Arc;

use tracing::info;

use crate::domain::{Comment, DomainError, DomainResult, NewComment, RepositoryProvider};

pub struct CommentService {
    repos: Arc<dyn RepositoryProvider>,
}

impl CommentService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Comment on an existing post as `author_id`.
    pub async fn create(&self, author_id: i32, post_id: i32, content: String) -> DomainResult<Comment> {
        self.ensure_post_exists(post_id).await?;

        let comment = self
            .repos
            .comments()
            .create(NewComment {
                post_id,
                user_id: author_id,
                content,
            })
            .await?;

        info!(comment_id = %comment.id, post_id = %post_id, user_id = %author_id, "Comment created");
        Ok(comment)
    }

    pub async fn list_for_post(&self, post_id: i32) -> DomainResult<Vec<Comment>> {
        self.ensure_post_exists(post_id).await?;
        self.repos.comments().list_for_post(post_id).await
    }

    async fn ensure_post_exists(&self, post_id: i32) -> DomainResult<()> {
        match self.repos.posts().find_by_id(post_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::not_found("Post", post_id)),
        }
    }
}
