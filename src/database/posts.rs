use sqlx::PgPool;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{Post, PostWithVotes};

/// Columns shared by every posts query that returns full rows.
const POST_COLUMNS: &str = "posts.id, posts.title, posts.content, posts.published, posts.created_at, posts.owner_id";

/// List posts joined with their per-post vote counts. `search` is a title
/// substring match; pagination is plain LIMIT/OFFSET with database-default
/// ordering.
pub async fn list_with_votes(
    pool: &PgPool,
    search: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostWithVotes>, DatabaseError> {
    let sql = format!(
        "SELECT {POST_COLUMNS}, COUNT(votes.post_id) AS votes \
         FROM posts \
         LEFT OUTER JOIN votes ON votes.post_id = posts.id \
         WHERE posts.title ILIKE '%' || $1 || '%' \
         GROUP BY posts.id \
         LIMIT $2 OFFSET $3"
    );

    let rows = sqlx::query_as::<_, PostWithVotes>(&sql)
        .bind(search)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Fetch a single post with its vote count.
pub async fn find_with_votes(pool: &PgPool, id: Uuid) -> Result<Option<PostWithVotes>, DatabaseError> {
    let sql = format!(
        "SELECT {POST_COLUMNS}, COUNT(votes.post_id) AS votes \
         FROM posts \
         LEFT OUTER JOIN votes ON votes.post_id = posts.id \
         WHERE posts.id = $1 \
         GROUP BY posts.id"
    );

    let row = sqlx::query_as::<_, PostWithVotes>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Fetch the bare row, used for ownership checks before mutations.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Post>, DatabaseError> {
    let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE posts.id = $1");

    let post = sqlx::query_as::<_, Post>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(post)
}

pub async fn insert(
    pool: &PgPool,
    owner_id: Uuid,
    title: &str,
    content: &str,
    published: bool,
) -> Result<Post, DatabaseError> {
    let post = sqlx::query_as::<_, Post>(
        "INSERT INTO posts (title, content, published, owner_id) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, title, content, published, created_at, owner_id",
    )
    .bind(title)
    .bind(content)
    .bind(published)
    .bind(owner_id)
    .fetch_one(pool)
    .await?;
    Ok(post)
}

/// Full-field update. Callers resolve missing rows and ownership first, so
/// a vanished row here still comes back as NotFound rather than a panic.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    title: &str,
    content: &str,
    published: bool,
) -> Result<Post, DatabaseError> {
    let post = sqlx::query_as::<_, Post>(
        "UPDATE posts SET title = $1, content = $2, published = $3 \
         WHERE id = $4 \
         RETURNING id, title, content, published, created_at, owner_id",
    )
    .bind(title)
    .bind(content)
    .bind(published)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    post.ok_or_else(|| DatabaseError::NotFound(format!("post with id: {} does not exist", id)))
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), DatabaseError> {
    let result = sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound(format!("post with id: {} does not exist", id)));
    }
    Ok(())
}
