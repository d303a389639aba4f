//! Post use-cases
//!
//! Ownership of update/delete is enforced by the HTTP ownership gate before
//! these methods are reached.

use std::sync::Arc;

use tracing::info;

use crate::domain::{DomainError, DomainResult, NewPost, Post, PostChanges, RepositoryProvider};
use crate::shared::{normalize_pagination, PaginatedResult};

pub struct PostService {
    repos: Arc<dyn RepositoryProvider>,
}

impl PostService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn create(&self, owner_id: i32, title: String, content: String) -> DomainResult<Post> {
        let post = self
            .repos
            .posts()
            .create(NewPost {
                user_id: owner_id,
                title,
                content,
            })
            .await?;

        info!(post_id = %post.id, user_id = %owner_id, "Post created");
        Ok(post)
    }

    pub async fn get(&self, id: i32) -> DomainResult<Post> {
        self.repos
            .posts()
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found("Post", id))
    }

    pub async fn list(&self, page: Option<u32>, limit: Option<u32>) -> DomainResult<PaginatedResult<Post>> {
        let (page, limit) = normalize_pagination(page, limit);
        self.repos.posts().list(page, limit).await
    }

    pub async fn update(&self, id: i32, changes: PostChanges) -> DomainResult<Post> {
        if changes.is_empty() {
            return Err(DomainError::Validation(
                "at least one of title or content is required".into(),
            ));
        }

        let post = self
            .repos
            .posts()
            .update(id, changes)
            .await?
            .ok_or(DomainError::not_found("Post", id))?;

        info!(post_id = %id, "Post updated");
        Ok(post)
    }

    pub async fn delete(&self, id: i32) -> DomainResult<()> {
        if !self.repos.posts().delete(id).await? {
            return Err(DomainError::not_found("Post", id));
        }

        info!(post_id = %id, "Post deleted");
        Ok(())
    }
}
