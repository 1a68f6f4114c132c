use axum::extract::{Path, Query};
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::config;
use crate::database::models::{Post, PostWithVotes};
use crate::database::{posts, DatabaseManager};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub skip: Option<i64>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PostInput {
    pub title: String,
    pub content: String,
    #[serde(default = "default_published")]
    pub published: bool,
}

fn default_published() -> bool {
    true
}

/// GET /posts - list posts with vote counts, optional title search,
/// limit/skip pagination (limit defaults to 10, clamped to the configured
/// maximum). Ordering is left to the database.
pub async fn list(
    Extension(_user): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<PostWithVotes>> {
    let api = &config::config().api;
    let limit = query.limit.unwrap_or(api.default_page_limit).clamp(1, api.max_page_limit);
    let skip = query.skip.unwrap_or(0).max(0);
    let search = query.search.unwrap_or_default();

    let pool = DatabaseManager::pool().await?;
    let rows = posts::list_with_votes(&pool, &search, limit, skip).await?;

    Ok(ApiResponse::success(rows))
}

/// POST /posts - create a post owned by the current user
pub async fn create(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<PostInput>,
) -> ApiResult<Post> {
    let pool = DatabaseManager::pool().await?;

    let post = posts::insert(&pool, user.user_id, &payload.title, &payload.content, payload.published).await?;
    tracing::info!(post_id = %post.id, owner_id = %post.owner_id, "created post");

    Ok(ApiResponse::created(post))
}

/// GET /posts/:id
pub async fn show(
    Extension(_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<PostWithVotes> {
    let pool = DatabaseManager::pool().await?;

    let row = posts::find_with_votes(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("post with id: {} was not found", id)))?;

    Ok(ApiResponse::success(row))
}

/// PUT /posts/:id - full update, owner only
pub async fn update(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PostInput>,
) -> ApiResult<Post> {
    let pool = DatabaseManager::pool().await?;

    check_ownership(&pool, id, &user).await?;

    let post = posts::update(&pool, id, &payload.title, &payload.content, payload.published).await?;

    Ok(ApiResponse::success(post))
}

/// DELETE /posts/:id - owner only
pub async fn delete(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    let pool = DatabaseManager::pool().await?;

    check_ownership(&pool, id, &user).await?;

    posts::delete(&pool, id).await?;
    tracing::info!(post_id = %id, "deleted post");

    Ok(ApiResponse::<()>::no_content())
}

/// 404 when the post is missing, 403 when it belongs to someone else.
async fn check_ownership(
    pool: &sqlx::PgPool,
    id: Uuid,
    user: &AuthUser,
) -> Result<(), ApiError> {
    let post = posts::find_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("post with id: {} does not exist", id)))?;

    if post.owner_id != user.user_id {
        return Err(ApiError::forbidden("Not authorised to perform requested action"));
    }

    Ok(())
}
