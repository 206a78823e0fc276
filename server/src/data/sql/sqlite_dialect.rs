//! SQLite SQL dialect implementation

use super::SqlDialect;

/// SQLite SQL dialect
pub struct SqliteDialect;

impl SqlDialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn like_operator(&self) -> &'static str {
        // LIKE is already case-insensitive for ASCII in SQLite
        "LIKE"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sql::RelatedLookup;

    const PRESCRIPTIONS: RelatedLookup = RelatedLookup {
        table: "recetas",
        join_key: "historial_id",
        column: "medicamento",
    };

    #[test]
    fn test_placeholder() {
        let dialect = SqliteDialect;
        assert_eq!(dialect.placeholder(1), "?");
        assert_eq!(dialect.placeholder(5), "?");
    }

    #[test]
    fn test_exists_in_related() {
        let dialect = SqliteDialect;
        assert_eq!(
            dialect.exists_in_related("id", &PRESCRIPTIONS, "?", false),
            "id IN (SELECT historial_id FROM recetas WHERE medicamento LIKE ?)"
        );
    }

    #[test]
    fn test_exists_in_related_escaped() {
        let dialect = SqliteDialect;
        assert_eq!(
            dialect.exists_in_related("id", &PRESCRIPTIONS, "?", true),
            r"id IN (SELECT historial_id FROM recetas WHERE medicamento LIKE ? ESCAPE '\')"
        );
    }

    #[test]
    fn test_limit_offset() {
        let dialect = SqliteDialect;
        assert_eq!(dialect.limit_offset(50, 100), "LIMIT 50 OFFSET 100");
        assert_eq!(dialect.always_true(), "1=1");
    }
}
