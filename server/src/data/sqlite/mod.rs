//! SQLite database service
//!
//! Embedded storage for the clinic resources. Owns the connection pool,
//! applies migrations on startup and executes compiled resource searches.

pub mod error;
mod migrations;
pub mod schema;
pub mod search;

pub use error::SqliteError;
pub use search::Page;
pub use sqlx::SqlitePool;

use std::path::Path;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow};

use crate::core::constants::{SQLITE_BUSY_TIMEOUT_SECS, SQLITE_MAX_CONNECTIONS};
use crate::data::filters::{CompileOptions, Criteria};
use crate::domain::Resource;

/// SQLite database service
///
/// Should be created once at startup and shared by every caller.
pub struct SqliteService {
    pool: SqlitePool,
}

impl SqliteService {
    /// Open (or create) the database file at `path` and run pending migrations
    pub async fn init(path: &Path) -> Result<Self, SqliteError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(SQLITE_BUSY_TIMEOUT_SECS));

        let pool = SqlitePoolOptions::new()
            .max_connections(SQLITE_MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        migrations::run_migrations(&pool).await?;

        tracing::debug!(path = %path.display(), "SqliteService initialized");
        Ok(Self { pool })
    }

    /// Open a private in-memory database with the current schema
    ///
    /// Uses a single pinned connection: an in-memory database lives only as
    /// long as its connection.
    pub async fn in_memory() -> Result<Self, SqliteError> {
        let options = "sqlite::memory:"
            .parse::<SqliteConnectOptions>()?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        migrations::run_migrations(&pool).await?;

        tracing::debug!("In-memory SqliteService initialized");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Recorded schema version
    pub async fn schema_version(&self) -> Result<i32, SqliteError> {
        migrations::current_version(&self.pool).await
    }

    /// Search `resource` with caller criteria
    pub async fn search<T>(
        &self,
        resource: Resource,
        criteria: &Criteria,
        options: CompileOptions,
        page: Page,
    ) -> Result<Vec<T>, SqliteError>
    where
        T: for<'r> sqlx::FromRow<'r, SqliteRow> + Send + Unpin,
    {
        search::search(&self.pool, resource, criteria, options, page).await
    }

    /// Close the connection pool gracefully
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("SQLite pool closed");
    }
}
