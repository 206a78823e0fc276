//! Resource search execution for SQLite
//!
//! Runs a compiled filter against a resource table, binding the compiled
//! parameters positionally. Malformed criteria surface here, as a database
//! error or an empty result set, never in the compiler.

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, SqlitePool};

use crate::data::filters::{BindValue, CompileOptions, CompiledQuery, Criteria, FilterCompiler};
use crate::data::sql::{SqlDialect, SqliteDialect};
use crate::domain::Resource;

use super::SqliteError;

/// Result window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u32,
    pub offset: u32,
}

impl Page {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }

    /// Clamp the limit into `1..=max_limit`
    pub fn clamped(self, max_limit: u32) -> Self {
        Self {
            limit: self.limit.clamp(1, max_limit.max(1)),
            offset: self.offset,
        }
    }
}

/// Build the SELECT statement for a compiled SQLite filter
pub fn select_sql(resource: Resource, compiled: &CompiledQuery, page: Page) -> String {
    format!(
        "SELECT {} FROM {} WHERE {} ORDER BY {} {}",
        resource.columns().join(", "),
        resource.table(),
        compiled.predicate(),
        resource.order_by(),
        SqliteDialect.limit_offset(page.limit, page.offset)
    )
}

/// Compile criteria for `resource` and fetch matching rows
pub async fn search<T>(
    pool: &SqlitePool,
    resource: Resource,
    criteria: &Criteria,
    options: CompileOptions,
    page: Page,
) -> Result<Vec<T>, SqliteError>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let compiler = FilterCompiler::new(&SqliteDialect, options);
    let compiled = compiler.compile(resource.filter_spec(), criteria);
    fetch(pool, resource, &compiled, page).await
}

/// Execute an already compiled SQLite filter
pub async fn fetch<T>(
    pool: &SqlitePool,
    resource: Resource,
    compiled: &CompiledQuery,
    page: Page,
) -> Result<Vec<T>, SqliteError>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let sql = select_sql(resource, compiled, page);
    tracing::trace!(%resource, sql = %sql, "Executing search");

    let mut query = sqlx::query_as::<sqlx::Sqlite, T>(&sql);
    for param in &compiled.params {
        query = match param {
            BindValue::Integer(n) => query.bind(*n),
            BindValue::Float(v) => query.bind(*v),
            BindValue::Text(s) => query.bind(s.as_str()),
        };
    }

    let rows = query.fetch_all(pool).await?;
    tracing::debug!(%resource, rows = rows.len(), "Search completed");
    Ok(rows)
}
