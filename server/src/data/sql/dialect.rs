//! SQL dialect trait for multi-database support
//!
//! This trait defines the interface for generating database-specific SQL syntax
//! used by the filter compiler and the resource fetch layer.

/// A related collection searched by an existence predicate.
///
/// Describes `SELECT <join_key> FROM <table> WHERE <column> ...`, the set of
/// keys a record's own key must appear in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelatedLookup {
    /// Related table name
    pub table: &'static str,
    /// Column in the related table holding the owning record's key
    pub join_key: &'static str,
    /// Column in the related table that is searched
    pub column: &'static str,
}

/// SQL dialect trait for generating database-specific SQL
///
/// Different databases have different syntax for:
/// - Parameter placeholders (? vs $1)
/// - Case-insensitive pattern matching
/// - Limit/offset clauses
pub trait SqlDialect: Send + Sync {
    /// Get the dialect name
    fn name(&self) -> &'static str;

    /// Generate a parameter placeholder for the given index (1-based)
    ///
    /// - SQLite: Always returns "?"
    /// - PostgreSQL: Returns "$1", "$2", etc.
    fn placeholder(&self, index: usize) -> String;

    /// Always-true predicate that compiled fragments are appended to
    fn always_true(&self) -> &'static str {
        "1=1"
    }

    /// Operator used for substring matches
    ///
    /// - SQLite: `LIKE` (case-insensitive for ASCII)
    /// - PostgreSQL: `ILIKE`
    fn like_operator(&self) -> &'static str;

    /// Clause appended to a pattern match whose pattern was escaped with
    /// [`crate::utils::sql::escape_like_pattern`]
    fn like_escape(&self) -> &'static str {
        r" ESCAPE '\'"
    }

    /// Generate an existence check of `key_col` against a related collection
    ///
    /// The searched column is pattern-matched against `placeholder`:
    /// `key_col IN (SELECT join_key FROM table WHERE column LIKE ?)`
    fn exists_in_related(
        &self,
        key_col: &str,
        related: &RelatedLookup,
        placeholder: &str,
        escaped: bool,
    ) -> String {
        format!(
            "{} IN (SELECT {} FROM {} WHERE {} {} {}{})",
            key_col,
            related.join_key,
            related.table,
            related.column,
            self.like_operator(),
            placeholder,
            if escaped { self.like_escape() } else { "" }
        )
    }

    /// Generate LIMIT/OFFSET clause
    ///
    /// Most databases use `LIMIT x OFFSET y`, but syntax may vary.
    fn limit_offset(&self, limit: u32, offset: u32) -> String {
        format!("LIMIT {} OFFSET {}", limit, offset)
    }
}
