use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

use crate::config::{self, DatabaseConfig};

/// Errors from DatabaseManager and the query modules built on it
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Holds the single application connection pool, created lazily on first use
/// and shared by every request after that.
pub struct DatabaseManager {
    pool: Arc<RwLock<Option<PgPool>>>,
}

impl DatabaseManager {
    fn instance() -> &'static DatabaseManager {
        use std::sync::OnceLock;
        static INSTANCE: OnceLock<DatabaseManager> = OnceLock::new();
        INSTANCE.get_or_init(|| DatabaseManager {
            pool: Arc::new(RwLock::new(None)),
        })
    }

    /// Get the application database pool
    pub async fn pool() -> Result<PgPool, DatabaseError> {
        let manager = Self::instance();

        // Fast path: pool already created
        {
            let pool = manager.pool.read().await;
            if let Some(pool) = pool.as_ref() {
                return Ok(pool.clone());
            }
        }

        let db = &config::config().database;
        let connection_string = Self::connection_string(db)?;

        let pool = PgPoolOptions::new()
            .max_connections(db.max_connections)
            .acquire_timeout(Duration::from_secs(db.connect_timeout_secs))
            .connect(&connection_string)
            .await?;

        {
            let mut slot = manager.pool.write().await;
            // Another request may have raced us here; keep the first pool
            if let Some(existing) = slot.as_ref() {
                pool.close().await;
                return Ok(existing.clone());
            }
            *slot = Some(pool.clone());
        }

        info!("Created database pool for: {}", db.name);
        Ok(pool)
    }

    /// Resolve the connection string: a full DATABASE_URL wins, otherwise
    /// the URL is assembled from the individual config parts.
    fn connection_string(db: &DatabaseConfig) -> Result<String, DatabaseError> {
        if let Ok(base) = std::env::var("DATABASE_URL") {
            if !base.is_empty() {
                return Ok(base);
            }
        }
        Self::build_url(db)
    }

    /// Assemble a postgres:// URL from config parts. Credentials go through
    /// the url crate so special characters survive encoding.
    fn build_url(db: &DatabaseConfig) -> Result<String, DatabaseError> {
        if db.hostname.is_empty() {
            return Err(DatabaseError::ConfigMissing("database.hostname"));
        }
        if db.name.is_empty() {
            return Err(DatabaseError::ConfigMissing("database.name"));
        }

        let mut url = url::Url::parse("postgres://localhost").map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        url.set_host(Some(&db.hostname)).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        url.set_port(Some(db.port)).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        url.set_username(&db.username).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        url.set_password(Some(&db.password)).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        url.set_path(&format!("/{}", db.name));
        Ok(url.to_string())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check() -> Result<(), DatabaseError> {
        let pool = Self::pool().await?;
        sqlx::query("SELECT 1").execute(&pool).await?;
        Ok(())
    }

    /// Close the pool (e.g., on shutdown)
    pub async fn close() {
        let manager = Self::instance();
        let mut slot = manager.pool.write().await;
        if let Some(pool) = slot.take() {
            pool.close().await;
            info!("Closed database pool");
        }
    }
}

/// Map a sqlx unique-constraint violation into a domain Conflict, leaving
/// every other error untouched.
pub fn conflict_on_unique(err: sqlx::Error, message: &str) -> DatabaseError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() {
            return DatabaseError::Conflict(message.to_string());
        }
    }
    DatabaseError::Sqlx(err)
}
