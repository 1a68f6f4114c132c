use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// bcrypt digest; never leaves the process in a response body
    #[serde(skip_serializing)]
    pub password: String,
    pub created_at: DateTime<Utc>,
}
