//! Post API handlers
//!
//! Update and delete run behind the Ownership Gate, so by the time they are
//! reached the post exists and belongs to the caller.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    CreatePostRequest, DeletedPostResponse, ListPostsParams, PostResponse, UpdatePostRequest,
};
use crate::application::PostService;
use crate::interfaces::http::common::{
    parse_resource_id, ApiError, ApiResponse, ErrorBody, PaginatedResponse, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct PostHandlerState {
    pub post_service: Arc<PostService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/posts",
    tag = "Posts",
    params(ListPostsParams),
    responses(
        (status = 200, description = "Page of posts, newest first", body = ApiResponse<PaginatedResponse<PostResponse>>)
    )
)]
pub async fn list_posts(
    State(state): State<PostHandlerState>,
    Query(params): Query<ListPostsParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<PostResponse>>>, ApiError> {
    let page = state.post_service.list(params.page, params.limit).await?;
    let page = PaginatedResponse::from(page.map(PostResponse::from));
    Ok(Json(ApiResponse::success(page)))
}

#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}",
    tag = "Posts",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post", body = ApiResponse<PostResponse>),
        (status = 400, description = "Invalid post id", body = ErrorBody),
        (status = 404, description = "Post not found", body = ErrorBody)
    )
)]
pub async fn get_post(
    State(state): State<PostHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<PostResponse>>, ApiError> {
    let post = state.post_service.get(parse_resource_id(&id)?).await?;
    Ok(Json(ApiResponse::success(post.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/posts",
    tag = "Posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = ApiResponse<PostResponse>),
        (status = 401, description = "Not authenticated", body = ErrorBody),
        (status = 422, description = "Validation error", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_post(
    State(state): State<PostHandlerState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PostResponse>>), ApiError> {
    let post = state
        .post_service
        .create(user.user_id, request.title, request.content)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(PostResponse::from(post))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/posts/{id}",
    tag = "Posts",
    params(("id" = i32, Path, description = "Post ID")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Post updated", body = ApiResponse<PostResponse>),
        (status = 400, description = "Invalid post id", body = ErrorBody),
        (status = 401, description = "Not authenticated", body = ErrorBody),
        (status = 403, description = "Caller is not the owner", body = ErrorBody),
        (status = 404, description = "Post not found", body = ErrorBody),
        (status = 422, description = "Validation error", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_post(
    State(state): State<PostHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdatePostRequest>,
) -> Result<Json<ApiResponse<PostResponse>>, ApiError> {
    let post = state
        .post_service
        .update(parse_resource_id(&id)?, request.into())
        .await?;

    Ok(Json(ApiResponse::success(post.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}",
    tag = "Posts",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post and its comments deleted", body = ApiResponse<DeletedPostResponse>),
        (status = 400, description = "Invalid post id", body = ErrorBody),
        (status = 401, description = "Not authenticated", body = ErrorBody),
        (status = 403, description = "Caller is not the owner", body = ErrorBody),
        (status = 404, description = "Post not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_post(
    State(state): State<PostHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeletedPostResponse>>, ApiError> {
    let id = parse_resource_id(&id)?;
    state.post_service.delete(id).await?;
    Ok(Json(ApiResponse::success(DeletedPostResponse { id })))
}
