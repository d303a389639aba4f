use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryOrder, QuerySelect, Set,
};

use super::db_err;
use crate::domain::{DomainResult, NewPost, Post, PostChanges, PostRepository};
use crate::infrastructure::database::entities::post;
use crate::shared::PaginatedResult;

pub struct SeaOrmPostRepository {
    db: DatabaseConnection,
}

impl SeaOrmPostRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn post_model_to_domain(model: post::Model) -> Post {
    Post {
        id: model.id,
        user_id: model.user_id,
        title: model.title,
        content: model.content,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

#[async_trait]
impl PostRepository for SeaOrmPostRepository {
    async fn create(&self, new_post: NewPost) -> DomainResult<Post> {
        let now = Utc::now();

        let model = post::ActiveModel {
            id: NotSet,
            user_id: Set(new_post.user_id),
            title: Set(new_post.title),
            content: Set(new_post.content),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = model.insert(&self.db).await.map_err(db_err)?;
        Ok(post_model_to_domain(created))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Post>> {
        let model = post::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(post_model_to_domain))
    }

    async fn list(&self, page: u32, limit: u32) -> DomainResult<PaginatedResult<Post>> {
        let query = post::Entity::find().order_by_desc(post::Column::Id);

        let total = query.clone().count(&self.db).await.map_err(db_err)?;

        let offset = u64::from(page.saturating_sub(1)) * u64::from(limit);
        let models = query
            .offset(offset)
            .limit(u64::from(limit))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let items = models.into_iter().map(post_model_to_domain).collect();
        Ok(PaginatedResult::new(items, total, page, limit))
    }

    async fn update(&self, id: i32, changes: PostChanges) -> DomainResult<Option<Post>> {
        let existing = post::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut active: post::ActiveModel = existing.into();
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(content) = changes.content {
            active.content = Set(content);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&self.db).await.map_err(db_err)?;
        Ok(Some(post_model_to_domain(updated)))
    }

    async fn delete(&self, id: i32) -> DomainResult<bool> {
        let result = post::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewUser, UserRepository};
    use crate::infrastructure::database::repositories::SeaOrmUserRepository;
    use crate::infrastructure::database::test_connection;

    async fn setup() -> (SeaOrmPostRepository, i32) {
        let db = test_connection().await;
        let owner = SeaOrmUserRepository::new(db.clone())
            .create(NewUser {
                username: "alice".into(),
                email: "a@x.com".into(),
                password_hash: "digest".into(),
            })
            .await
            .unwrap();
        (SeaOrmPostRepository::new(db), owner.id)
    }

    fn new_post(user_id: i32, title: &str) -> NewPost {
        NewPost {
            user_id,
            title: title.into(),
            content: format!("{} body", title),
        }
    }

    #[tokio::test]
    async fn create_find_update_delete() {
        let (repo, owner) = setup().await;

        let post = repo.create(new_post(owner, "first")).await.unwrap();
        assert_eq!(post.user_id, owner);
        assert!(post.is_owned_by(owner));

        let found = repo.find_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(found, post);

        let updated = repo
            .update(
                post.id,
                PostChanges {
                    title: Some("renamed".into()),
                    content: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "renamed");
        assert_eq!(updated.content, "first body");
        assert_eq!(updated.user_id, owner);

        assert!(repo.delete(post.id).await.unwrap());
        assert!(!repo.delete(post.id).await.unwrap());
        assert!(repo.find_by_id(post.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_missing_post_is_none() {
        let (repo, _) = setup().await;
        let result = repo.update(99, PostChanges::default()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn list_is_paginated_newest_first() {
        let (repo, owner) = setup().await;
        for i in 0..5 {
            repo.create(new_post(owner, &format!("post-{}", i))).await.unwrap();
        }

        let first = repo.list(1, 2).await.unwrap();
        assert_eq!(first.total, 5);
        assert_eq!(first.total_pages, 3);
        let titles: Vec<_> = first.items.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["post-4", "post-3"]);

        let last = repo.list(3, 2).await.unwrap();
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.items[0].title, "post-0");
    }
}
