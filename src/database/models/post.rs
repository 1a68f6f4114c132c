use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub owner_id: Uuid,
}

/// One row of the posts listing: the post joined with its vote count
/// (LEFT OUTER JOIN votes, grouped by post id).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PostWithVotes {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub post: Post,
    pub votes: i64,
}
