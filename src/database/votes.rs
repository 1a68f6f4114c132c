use sqlx::PgPool;
use uuid::Uuid;

use super::manager::{conflict_on_unique, DatabaseError};
use super::models::Vote;

pub async fn find(pool: &PgPool, user_id: Uuid, post_id: Uuid) -> Result<Option<Vote>, DatabaseError> {
    let vote = sqlx::query_as::<_, Vote>(
        "SELECT user_id, post_id FROM votes WHERE user_id = $1 AND post_id = $2",
    )
    .bind(user_id)
    .bind(post_id)
    .fetch_optional(pool)
    .await?;
    Ok(vote)
}

/// Cast a vote. The composite primary key backstops the handler's
/// pre-check, so a concurrent duplicate still surfaces as Conflict.
pub async fn insert(pool: &PgPool, user_id: Uuid, post_id: Uuid) -> Result<(), DatabaseError> {
    sqlx::query("INSERT INTO votes (user_id, post_id) VALUES ($1, $2)")
        .bind(user_id)
        .bind(post_id)
        .execute(pool)
        .await
        .map_err(|e| conflict_on_unique(e, "already voted on this post"))?;
    Ok(())
}

/// Retract a vote; Ok(false) when there was nothing to delete.
pub async fn delete(pool: &PgPool, user_id: Uuid, post_id: Uuid) -> Result<bool, DatabaseError> {
    let result = sqlx::query("DELETE FROM votes WHERE user_id = $1 AND post_id = $2")
        .bind(user_id)
        .bind(post_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
