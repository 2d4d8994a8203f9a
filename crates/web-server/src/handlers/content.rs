use super::delegate;
use crate::{
    error::AppError,
    extract::{Ctx, JsonBody},
    AppState,
};
use axum::{extract::State, Json};
use core_types::{ApiResponse, Comment, CreateCommentRequest, CreatePostRequest, Post, Validate};
use std::sync::Arc;

/// # POST /api/posts
#[tracing::instrument(
    name = "create_post",
    skip_all,
    fields(op = "handlers.content.create_post", request_id = %ctx.request_id),
    err(Debug)
)]
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    Ctx(ctx): Ctx,
    JsonBody(req): JsonBody<CreatePostRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    req.validate()?;
    tracing::info!(request = ?req, "Creating post.");

    let id = delegate(
        &ctx,
        "create post",
        state.storage.create_post(&ctx, &req.content, req.event_id),
    )
    .await?;

    tracing::info!(id, "Post created.");
    Ok(Json(ApiResponse::ok()))
}

/// # POST /api/comments
#[tracing::instrument(
    name = "create_comment",
    skip_all,
    fields(op = "handlers.content.create_comment", request_id = %ctx.request_id),
    err(Debug)
)]
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    Ctx(ctx): Ctx,
    JsonBody(req): JsonBody<CreateCommentRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    req.validate()?;
    tracing::info!(request = ?req, "Creating comment.");

    let id = delegate(
        &ctx,
        "create comment",
        state.storage.create_comment(&ctx, req.post_id, req.participant_id, &req.content),
    )
    .await?;

    tracing::info!(id, "Comment created.");
    Ok(Json(ApiResponse::ok()))
}

/// # GET /api/posts
#[tracing::instrument(
    name = "list_posts",
    skip_all,
    fields(op = "handlers.content.list_posts", request_id = %ctx.request_id),
    err(Debug)
)]
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    Ctx(ctx): Ctx,
) -> Result<Json<ApiResponse<Vec<Post>>>, AppError> {
    tracing::info!("Getting posts.");
    let posts = delegate(&ctx, "get posts", state.storage.list_posts(&ctx)).await?;
    Ok(Json(ApiResponse::with_data(posts)))
}

/// # GET /api/comments
#[tracing::instrument(
    name = "list_comments",
    skip_all,
    fields(op = "handlers.content.list_comments", request_id = %ctx.request_id),
    err(Debug)
)]
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    Ctx(ctx): Ctx,
) -> Result<Json<ApiResponse<Vec<Comment>>>, AppError> {
    tracing::info!("Getting comments.");
    let comments = delegate(&ctx, "get comments", state.storage.list_comments(&ctx)).await?;
    Ok(Json(ApiResponse::with_data(comments)))
}
