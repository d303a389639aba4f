//! Comment API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{CommentResponse, CreateCommentRequest};
use crate::application::CommentService;
use crate::interfaces::http::common::{
    parse_resource_id, ApiError, ApiResponse, ErrorBody, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct CommentHandlerState {
    pub comment_service: Arc<CommentService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/comments",
    tag = "Comments",
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment created", body = ApiResponse<CommentResponse>),
        (status = 401, description = "Not authenticated", body = ErrorBody),
        (status = 404, description = "Post not found", body = ErrorBody),
        (status = 422, description = "Validation error", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_comment(
    State(state): State<CommentHandlerState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CommentResponse>>), ApiError> {
    let comment = state
        .comment_service
        .create(user.user_id, request.post_id, request.content)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CommentResponse::from(comment))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/comments/post/{post_id}",
    tag = "Comments",
    params(("post_id" = i32, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Comments on the post, oldest first", body = ApiResponse<Vec<CommentResponse>>),
        (status = 400, description = "Invalid post id", body = ErrorBody),
        (status = 404, description = "Post not found", body = ErrorBody)
    )
)]
pub async fn list_comments_for_post(
    State(state): State<CommentHandlerState>,
    Path(post_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<CommentResponse>>>, ApiError> {
    let comments = state
        .comment_service
        .list_for_post(parse_resource_id(&post_id)?)
        .await?;

    Ok(Json(ApiResponse::success(
        comments.into_iter().map(CommentResponse::from).collect(),
    )))
}
