use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// At most one row per (user, post) pair; direction is a request-level
/// concept, only cast votes are stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vote {
    pub user_id: Uuid,
    pub post_id: Uuid,
}
