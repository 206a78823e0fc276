//! Database migration system
//!
//! Handles schema versioning and incremental migrations.

use sqlx::SqlitePool;

use super::error::SqliteError;
use super::schema::{MIGRATION_V2, SCHEMA, SCHEMA_VERSION};

/// Run all pending migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteError> {
    // Check if this is a fresh database
    let table_exists: bool = sqlx::query_scalar(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='schema_version'",
    )
    .fetch_one(pool)
    .await?;

    if !table_exists {
        tracing::debug!("Initializing database with schema version 1");
        apply_initial_schema(pool).await?;
    }

    let current_version = current_version(pool).await?;

    if current_version >= SCHEMA_VERSION {
        tracing::debug!(
            "Database schema is up to date (version {})",
            current_version
        );
        return Ok(());
    }

    // Apply incremental migrations
    for version in (current_version + 1)..=SCHEMA_VERSION {
        tracing::debug!("Applying migration to version {}", version);
        apply_migration(pool, version).await?;
    }

    Ok(())
}

/// Read the recorded schema version (0 when none is recorded)
pub async fn current_version(pool: &SqlitePool) -> Result<i32, SqliteError> {
    let version: Option<i32> =
        sqlx::query_scalar("SELECT version FROM schema_version WHERE id = 1")
            .fetch_optional(pool)
            .await?;
    Ok(version.unwrap_or(0))
}

/// Apply the initial schema (version 1)
async fn apply_initial_schema(pool: &SqlitePool) -> Result<(), SqliteError> {
    let start = std::time::Instant::now();

    let mut tx = pool.begin().await?;

    sqlx::query(SCHEMA).execute(&mut *tx).await?;

    let now = chrono::Utc::now().timestamp();
    sqlx::query(
        "INSERT INTO schema_version (id, version, applied_at, description) VALUES (1, 1, ?, 'Initial schema')",
    )
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::debug!(
        "Applied initial schema in {}ms",
        start.elapsed().as_millis()
    );
    Ok(())
}

async fn apply_migration(pool: &SqlitePool, version: i32) -> Result<(), SqliteError> {
    match version {
        // Already handled by initial schema
        1 => Ok(()),
        2 => apply_versioned_migration(pool, 2, "add_search_indexes", MIGRATION_V2).await,
        _ => Err(SqliteError::MigrationFailed {
            version,
            name: "unknown".to_string(),
            error: format!("Unknown migration version: {}", version),
        }),
    }
}

/// Apply a versioned migration with tracking
async fn apply_versioned_migration(
    pool: &SqlitePool,
    version: i32,
    name: &str,
    sql: &str,
) -> Result<(), SqliteError> {
    let start = std::time::Instant::now();

    let mut tx = pool.begin().await?;

    // One statement per query for SQLite
    for statement in sql.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        sqlx::query(statement)
            .execute(&mut *tx)
            .await
            .map_err(|e| SqliteError::MigrationFailed {
                version,
                name: name.to_string(),
                error: format!(
                    "Failed at statement: {} - {}",
                    statement_preview(statement),
                    e
                ),
            })?;
    }

    let now = chrono::Utc::now().timestamp();
    sqlx::query(
        "UPDATE schema_version SET version = ?, applied_at = ?, description = ? WHERE id = 1",
    )
    .bind(version)
    .bind(now)
    .bind(name)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::debug!(
        "Applied migration v{} ({}) in {}ms",
        version,
        name,
        start.elapsed().as_millis()
    );
    Ok(())
}

/// First 50 characters of a statement for error messages
fn statement_preview(statement: &str) -> String {
    statement.chars().take(50).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_fresh_database_reaches_current_version() {
        let pool = memory_pool().await;
        run_migrations(&pool).await.unwrap();

        assert_eq!(current_version(&pool).await.unwrap(), SCHEMA_VERSION);

        let index_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='index' AND name LIKE 'idx_%'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(index_count, 5);
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let pool = memory_pool().await;
        run_migrations(&pool).await.unwrap();
        run_migrations(&pool).await.unwrap();

        assert_eq!(current_version(&pool).await.unwrap(), SCHEMA_VERSION);
    }

    #[tokio::test]
    async fn test_unknown_version_fails() {
        let pool = memory_pool().await;
        let err = apply_migration(&pool, 99).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Migration 99 (unknown) failed: Unknown migration version: 99"
        );
    }

    #[test]
    fn test_statement_preview_respects_char_boundaries() {
        // Byte 50 falls inside a two-byte character
        let statement = format!("INSERT INTO tabla_inexistente VALUES ('{}')", "ñ".repeat(10));
        let preview = statement_preview(&statement);

        assert_eq!(preview.chars().count(), 50);
        assert!(preview.ends_with("ñ'"));
        assert_eq!(statement_preview("SELECT 1"), "SELECT 1");
    }

    #[tokio::test]
    async fn test_failed_statement_with_multibyte_text_reports_error() {
        let pool = memory_pool().await;
        let sql = format!("INSERT INTO txt (diagnostico) VALUES ('{}')", "ñ".repeat(20));

        let err = apply_versioned_migration(&pool, 3, "bad_statement", &sql)
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with(
            "Migration 3 (bad_statement) failed: Failed at statement: INSERT INTO txt"
        ));
        assert!(message.contains("no such table: txt"));
    }
}
