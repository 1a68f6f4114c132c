use sqlx::PgPool;
use uuid::Uuid;

use super::manager::{conflict_on_unique, DatabaseError};
use super::models::User;

/// Insert a new user. `password` must already be a bcrypt digest; the
/// unique email constraint turns duplicates into a Conflict.
pub async fn insert(pool: &PgPool, email: &str, password: &str) -> Result<User, DatabaseError> {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (email, password) VALUES ($1, $2) RETURNING id, email, password, created_at",
    )
    .bind(email)
    .bind(password)
    .fetch_one(pool)
    .await
    .map_err(|e| conflict_on_unique(e, "email is already registered"))
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, DatabaseError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, password, created_at FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, DatabaseError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, password, created_at FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}
