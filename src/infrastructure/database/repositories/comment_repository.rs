use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set,
};

use super::db_err;
use crate::domain::{Comment, CommentRepository, DomainResult, NewComment};
use crate::infrastructure::database::entities::comment;

pub struct SeaOrmCommentRepository {
    db: DatabaseConnection,
}

impl SeaOrmCommentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn comment_model_to_domain(model: comment::Model) -> Comment {
    Comment {
        id: model.id,
        post_id: model.post_id,
        user_id: model.user_id,
        content: model.content,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

#[async_trait]
impl CommentRepository for SeaOrmCommentRepository {
    async fn create(&self, new_comment: NewComment) -> DomainResult<Comment> {
        let now = Utc::now();

        let model = comment::ActiveModel {
            id: NotSet,
            post_id: Set(new_comment.post_id),
            user_id: Set(new_comment.user_id),
            content: Set(new_comment.content),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = model.insert(&self.db).await.map_err(db_err)?;
        Ok(comment_model_to_domain(created))
    }

    async fn list_for_post(&self, post_id: i32) -> DomainResult<Vec<Comment>> {
        let models = comment::Entity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(comment_model_to_domain).collect())
    }
}
