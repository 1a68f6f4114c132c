use axum::Extension;

use crate::database::models::User;
use crate::database::{users, DatabaseManager};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// GET /whoami - resolve the bearer token back to its user row. A token
/// for a since-deleted account is treated the same as a bad token.
pub async fn whoami(Extension(user): Extension<AuthUser>) -> ApiResult<User> {
    let pool = DatabaseManager::pool().await?;

    let row = users::find_by_id(&pool, user.user_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Could not validate credentials"))?;

    Ok(ApiResponse::success(row))
}
