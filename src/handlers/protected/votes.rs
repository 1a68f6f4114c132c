use std::collections::HashMap;

use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::{posts, votes, DatabaseManager};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub post_id: Uuid,
    /// 1 casts a vote, 0 retracts one
    pub dir: i16,
}

#[derive(Debug, Serialize)]
pub struct VoteMessage {
    pub message: &'static str,
}

/// POST /vote - cast (dir=1) or retract (dir=0) the current user's vote on
/// a post. A second cast and a retract-without-vote are both Conflicts.
pub async fn vote(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<VoteRequest>,
) -> ApiResult<VoteMessage> {
    validate_direction(payload.dir)?;

    let pool = DatabaseManager::pool().await?;

    if posts::find_by_id(&pool, payload.post_id).await?.is_none() {
        return Err(ApiError::not_found(format!(
            "post with id: {} does not exist",
            payload.post_id
        )));
    }

    if payload.dir == 1 {
        if votes::find(&pool, user.user_id, payload.post_id).await?.is_some() {
            return Err(ApiError::conflict(format!(
                "user {} has already voted on post {}",
                user.user_id, payload.post_id
            )));
        }

        // The composite key catches the concurrent double-cast this
        // pre-check cannot see.
        votes::insert(&pool, user.user_id, payload.post_id).await?;

        Ok(ApiResponse::created(VoteMessage {
            message: "successfully added vote",
        }))
    } else {
        if !votes::delete(&pool, user.user_id, payload.post_id).await? {
            return Err(ApiError::conflict("vote does not exist"));
        }

        Ok(ApiResponse::success(VoteMessage {
            message: "successfully deleted vote",
        }))
    }
}

fn validate_direction(dir: i16) -> Result<(), ApiError> {
    if matches!(dir, 0 | 1) {
        return Ok(());
    }

    let mut field_errors = HashMap::new();
    field_errors.insert("dir".to_string(), "vote direction must be 0 or 1".to_string());
    Err(ApiError::validation_error("Invalid vote input", Some(field_errors)))
}
