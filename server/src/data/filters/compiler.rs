//! Filter compiler
//!
//! Compiles a [`FilterSpec`] plus caller [`Criteria`] into AND-combined
//! predicate fragments with positional parameters. Criteria values only ever
//! reach the parameter list; fragment text is built from the filter spec alone.

use serde::{Deserialize, Serialize};

use super::criteria::{Criteria, CriteriaValue};
use super::spec::{FilterOp, FilterSpec};
use crate::data::sql::{SqlDialect, SqliteDialect};
use crate::utils::sql::escape_like_pattern;

/// Positionally bound parameter value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BindValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl From<&CriteriaValue> for BindValue {
    fn from(value: &CriteriaValue) -> Self {
        match value {
            CriteriaValue::Integer(n) => Self::Integer(*n),
            CriteriaValue::Float(v) => Self::Float(*v),
            CriteriaValue::Text(s) => Self::Text(s.clone()),
        }
    }
}

/// Decides whether a present criteria value fires its rule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceRule {
    /// Falsy values (empty text, zero, NaN) are treated as not supplied
    #[default]
    Truthy,
    /// Any key present in the criteria fires, falsy or not
    Explicit,
}

impl PresenceRule {
    pub fn admits(&self, value: &CriteriaValue) -> bool {
        match self {
            Self::Truthy => value.is_truthy(),
            Self::Explicit => true,
        }
    }
}

/// Compiler behavior switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    pub presence: PresenceRule,
    /// Escape `%`, `_` and `\` in pattern values instead of passing them
    /// through as wildcards
    pub escape_wildcards: bool,
}

/// Compiled predicate fragments and their bound parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledQuery {
    /// Always-true predicate the fragments follow
    pub base: &'static str,
    /// `AND <condition>` fragments in rule order
    pub fragments: Vec<String>,
    /// Parameters in placeholder order
    pub params: Vec<BindValue>,
}

impl CompiledQuery {
    /// Full predicate: base followed by every fragment
    pub fn predicate(&self) -> String {
        let mut sql = self.base.to_string();
        for fragment in &self.fragments {
            sql.push(' ');
            sql.push_str(fragment);
        }
        sql
    }

    /// True when no rule fired
    pub fn is_unfiltered(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// Stateless compiler bound to a SQL dialect
#[derive(Clone, Copy)]
pub struct FilterCompiler {
    dialect: &'static dyn SqlDialect,
    options: CompileOptions,
}

impl Default for FilterCompiler {
    fn default() -> Self {
        Self::new(&SqliteDialect, CompileOptions::default())
    }
}

impl std::fmt::Debug for FilterCompiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterCompiler")
            .field("dialect", &self.dialect.name())
            .field("options", &self.options)
            .finish()
    }
}

impl FilterCompiler {
    pub fn new(dialect: &'static dyn SqlDialect, options: CompileOptions) -> Self {
        Self { dialect, options }
    }

    pub fn dialect(&self) -> &'static dyn SqlDialect {
        self.dialect
    }

    /// Compile criteria against a filter spec.
    ///
    /// Rules fire in declaration order; unknown criteria keys are ignored. Never fails:
    /// values are bound as-is and type problems surface when the query runs.
    pub fn compile(&self, spec: &FilterSpec, criteria: &Criteria) -> CompiledQuery {
        let mut fragments = Vec::new();
        let mut params = Vec::new();
        let mut fired = Vec::new();

        for rule in spec.rules() {
            let Some(value) = criteria.get(rule.key) else {
                continue;
            };
            if !self.options.presence.admits(value) {
                continue;
            }

            let placeholder = self.dialect.placeholder(params.len() + 1);
            params.push(if rule.op.is_pattern() {
                self.pattern(value)
            } else {
                BindValue::from(value)
            });

            let condition = match rule.op {
                FilterOp::Exact => format!("{} = {}", rule.column, placeholder),
                FilterOp::RangeFrom => format!("{} >= {}", rule.column, placeholder),
                FilterOp::RangeTo => format!("{} <= {}", rule.column, placeholder),
                FilterOp::Contains => format!(
                    "{} {} {}{}",
                    rule.column,
                    self.dialect.like_operator(),
                    placeholder,
                    self.escape_clause()
                ),
                FilterOp::SubqueryContains(related) => self.dialect.exists_in_related(
                    rule.column,
                    &related,
                    &placeholder,
                    self.options.escape_wildcards,
                ),
            };
            fragments.push(format!("AND {}", condition));
            fired.push(rule.key);
        }

        // Keys only: values may carry patient data
        tracing::trace!(
            spec = spec.name(),
            dialect = self.dialect.name(),
            keys = ?fired,
            fragments = fragments.len(),
            "Compiled filter criteria"
        );

        CompiledQuery {
            base: self.dialect.always_true(),
            fragments,
            params,
        }
    }

    fn pattern(&self, value: &CriteriaValue) -> BindValue {
        let raw = value.to_string();
        let inner = if self.options.escape_wildcards {
            escape_like_pattern(&raw)
        } else {
            raw
        };
        BindValue::Text(format!("%{}%", inner))
    }

    fn escape_clause(&self) -> &'static str {
        if self.options.escape_wildcards {
            self.dialect.like_escape()
        } else {
            ""
        }
    }
}

/// Compile with the default SQLite dialect and options
pub fn compile(spec: &FilterSpec, criteria: &Criteria) -> CompiledQuery {
    FilterCompiler::default().compile(spec, criteria)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filters::FieldRule;
    use crate::data::sql::{PostgresDialect, RelatedLookup};

    static NOTES: FilterSpec = FilterSpec::new(
        "notas",
        &[
            FieldRule::exact("autor", "autor_id"),
            FieldRule::range_from("desde", "creada"),
            FieldRule::range_to("hasta", "creada"),
            FieldRule::contains("texto", "cuerpo"),
            FieldRule::subquery_contains(
                "etiqueta",
                "id",
                RelatedLookup {
                    table: "etiquetas",
                    join_key: "nota_id",
                    column: "nombre",
                },
            ),
        ],
    );

    fn full_criteria() -> Criteria {
        Criteria::new()
            .with("autor", 3)
            .with("desde", "2024-01-01")
            .with("hasta", "2024-12-31")
            .with("texto", "fiebre")
            .with("etiqueta", "urgente")
    }

    #[test]
    fn empty_criteria_yields_base_only() {
        let compiled = compile(&NOTES, &Criteria::new());

        assert_eq!(compiled.predicate(), "1=1");
        assert!(compiled.is_unfiltered());
        assert!(compiled.params.is_empty());
    }

    #[test]
    fn all_rules_fire_in_spec_order() {
        let compiled = compile(&NOTES, &full_criteria());

        assert_eq!(
            compiled.fragments,
            vec![
                "AND autor_id = ?",
                "AND creada >= ?",
                "AND creada <= ?",
                "AND cuerpo LIKE ?",
                "AND id IN (SELECT nota_id FROM etiquetas WHERE nombre LIKE ?)",
            ]
        );
        assert_eq!(
            compiled.params,
            vec![
                BindValue::Integer(3),
                BindValue::Text("2024-01-01".to_string()),
                BindValue::Text("2024-12-31".to_string()),
                BindValue::Text("%fiebre%".to_string()),
                BindValue::Text("%urgente%".to_string()),
            ]
        );
        assert_eq!(
            compiled.predicate(),
            "1=1 AND autor_id = ? AND creada >= ? AND creada <= ? AND cuerpo LIKE ? \
             AND id IN (SELECT nota_id FROM etiquetas WHERE nombre LIKE ?)"
        );
    }

    #[test]
    fn order_follows_spec_not_insertion() {
        // Criteria are keyed alphabetically; output must still follow the rule order
        let criteria = Criteria::new().with("texto", "tos").with("autor", 9);
        let compiled = compile(&NOTES, &criteria);

        assert_eq!(
            compiled.fragments,
            vec!["AND autor_id = ?", "AND cuerpo LIKE ?"]
        );
        assert_eq!(
            compiled.params,
            vec![BindValue::Integer(9), BindValue::Text("%tos%".to_string())]
        );
    }

    #[test]
    fn unknown_keys_ignored() {
        let criteria = Criteria::new().with("password", "x").with("autor", 1);
        let compiled = compile(&NOTES, &criteria);

        assert_eq!(compiled.fragments, vec!["AND autor_id = ?"]);
        assert_eq!(compiled.params, vec![BindValue::Integer(1)]);
    }

    #[test]
    fn falsy_values_skipped_by_default() {
        let criteria = Criteria::new()
            .with("autor", 0)
            .with("texto", "")
            .with("desde", 0.0);
        let compiled = compile(&NOTES, &criteria);

        assert!(compiled.is_unfiltered());
        assert!(compiled.params.is_empty());
    }

    #[test]
    fn explicit_presence_keeps_falsy_values() {
        let compiler = FilterCompiler::new(
            &SqliteDialect,
            CompileOptions {
                presence: PresenceRule::Explicit,
                ..Default::default()
            },
        );
        let criteria = Criteria::new().with("autor", 0).with("texto", "");
        let compiled = compiler.compile(&NOTES, &criteria);

        assert_eq!(
            compiled.fragments,
            vec!["AND autor_id = ?", "AND cuerpo LIKE ?"]
        );
        assert_eq!(
            compiled.params,
            vec![BindValue::Integer(0), BindValue::Text("%%".to_string())]
        );
    }

    #[test]
    fn wildcards_pass_through_by_default() {
        let criteria = Criteria::new().with("texto", "50%_a");
        let compiled = compile(&NOTES, &criteria);

        assert_eq!(compiled.fragments, vec!["AND cuerpo LIKE ?"]);
        assert_eq!(compiled.params, vec![BindValue::Text("%50%_a%".to_string())]);
    }

    #[test]
    fn escaped_wildcards_add_escape_clause() {
        let compiler = FilterCompiler::new(
            &SqliteDialect,
            CompileOptions {
                escape_wildcards: true,
                ..Default::default()
            },
        );
        let criteria = Criteria::new()
            .with("texto", "50%_a")
            .with("etiqueta", "x_y");
        let compiled = compiler.compile(&NOTES, &criteria);

        assert_eq!(
            compiled.fragments,
            vec![
                r"AND cuerpo LIKE ? ESCAPE '\'",
                r"AND id IN (SELECT nota_id FROM etiquetas WHERE nombre LIKE ? ESCAPE '\')",
            ]
        );
        assert_eq!(
            compiled.params,
            vec![
                BindValue::Text(r"%50\%\_a%".to_string()),
                BindValue::Text(r"%x\_y%".to_string()),
            ]
        );
    }

    #[test]
    fn numeric_contains_value_is_wildcarded_text() {
        let criteria = Criteria::new().with("texto", 42);
        let compiled = compile(&NOTES, &criteria);

        assert_eq!(compiled.params, vec![BindValue::Text("%42%".to_string())]);
    }

    #[test]
    fn postgres_placeholders_number_by_param_position() {
        let compiler = FilterCompiler::new(&PostgresDialect, CompileOptions::default());
        let criteria = Criteria::new()
            .with("autor", 3)
            .with("hasta", "2024-12-31")
            .with("etiqueta", "urgente");
        let compiled = compiler.compile(&NOTES, &criteria);

        assert_eq!(
            compiled.fragments,
            vec![
                "AND autor_id = $1",
                "AND creada <= $2",
                "AND id IN (SELECT nota_id FROM etiquetas WHERE nombre ILIKE $3)",
            ]
        );
        assert_eq!(compiled.params.len(), 3);
    }

    #[test]
    fn hostile_values_never_reach_fragment_text() {
        let benign = compile(&NOTES, &full_criteria());
        let hostile = compile(
            &NOTES,
            &Criteria::new()
                .with("autor", "1; DROP TABLE notas; --")
                .with("desde", "' OR '1'='1")
                .with("hasta", "\"); DELETE FROM notas")
                .with("texto", "'; --")
                .with("etiqueta", "?) OR 1=1 --"),
        );

        assert_eq!(benign.fragments, hostile.fragments);
        assert_eq!(
            hostile.params[0],
            BindValue::Text("1; DROP TABLE notas; --".to_string())
        );
        assert_eq!(
            hostile.params[4],
            BindValue::Text("%?) OR 1=1 --%".to_string())
        );
    }

    #[test]
    fn compile_is_deterministic() {
        let criteria = full_criteria();
        assert_eq!(compile(&NOTES, &criteria), compile(&NOTES, &criteria));
    }

    #[test]
    fn bind_values_serialize_untagged() {
        let compiled = compile(&NOTES, &Criteria::new().with("autor", 7).with("texto", "Ana"));
        let json = serde_json::to_value(&compiled.params).unwrap();
        assert_eq!(json, serde_json::json!([7, "%Ana%"]));
    }
}
