//! Filter specification types
//!
//! A filter specification is the fixed, per-resource list of field rules
//! mapping criteria keys to column comparisons. Rules are compiled in the
//! order they are declared.

use std::collections::HashSet;

use thiserror::Error;

use crate::data::sql::RelatedLookup;
use crate::utils::sql::is_identifier;

/// Comparison emitted for a field rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// `column = ?`
    Exact,
    /// `column >= ?` (inclusive)
    RangeFrom,
    /// `column <= ?` (inclusive)
    RangeTo,
    /// `column LIKE ?` with `%value%`
    Contains,
    /// `column IN (SELECT join_key FROM table WHERE searched LIKE ?)` with `%value%`
    SubqueryContains(RelatedLookup),
}

impl FilterOp {
    /// Whether the bound value is wrapped in wildcards
    pub fn is_pattern(&self) -> bool {
        matches!(self, Self::Contains | Self::SubqueryContains(_))
    }
}

/// One criteria key mapped to one column comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub key: &'static str,
    pub column: &'static str,
    pub op: FilterOp,
}

impl FieldRule {
    pub const fn exact(key: &'static str, column: &'static str) -> Self {
        Self {
            key,
            column,
            op: FilterOp::Exact,
        }
    }

    pub const fn range_from(key: &'static str, column: &'static str) -> Self {
        Self {
            key,
            column,
            op: FilterOp::RangeFrom,
        }
    }

    pub const fn range_to(key: &'static str, column: &'static str) -> Self {
        Self {
            key,
            column,
            op: FilterOp::RangeTo,
        }
    }

    pub const fn contains(key: &'static str, column: &'static str) -> Self {
        Self {
            key,
            column,
            op: FilterOp::Contains,
        }
    }

    /// `column` is the owning record's key matched against `related.join_key`
    pub const fn subquery_contains(
        key: &'static str,
        column: &'static str,
        related: RelatedLookup,
    ) -> Self {
        Self {
            key,
            column,
            op: FilterOp::SubqueryContains(related),
        }
    }

    /// All SQL identifiers this rule places into fragment text
    fn identifiers(&self) -> Vec<&'static str> {
        match self.op {
            FilterOp::SubqueryContains(related) => {
                vec![self.column, related.table, related.join_key, related.column]
            }
            _ => vec![self.column],
        }
    }
}

/// Errors found when validating a filter specification
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FilterSpecError {
    #[error("Filter spec '{spec}' has a rule with an empty key")]
    EmptyKey { spec: &'static str },

    #[error("Filter spec '{spec}' declares key '{key}' more than once")]
    DuplicateKey {
        spec: &'static str,
        key: &'static str,
    },

    #[error("Filter spec '{spec}' uses invalid SQL identifier '{identifier}'")]
    InvalidIdentifier {
        spec: &'static str,
        identifier: &'static str,
    },
}

/// Ordered field rules for one resource
#[derive(Debug, Clone, Copy)]
pub struct FilterSpec {
    name: &'static str,
    rules: &'static [FieldRule],
}

impl FilterSpec {
    pub const fn new(name: &'static str, rules: &'static [FieldRule]) -> Self {
        Self { name, rules }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn rules(&self) -> &'static [FieldRule] {
        self.rules
    }

    /// Criteria keys accepted by this spec, in rule order
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + use<> {
        self.rules.iter().map(|r| r.key)
    }

    /// Check that keys are unique and every identifier is plain SQL.
    ///
    /// Specs are trusted, so this runs once at startup rather than per query.
    pub fn validate(&self) -> Result<(), FilterSpecError> {
        let mut seen = HashSet::new();
        for rule in self.rules {
            if rule.key.is_empty() {
                return Err(FilterSpecError::EmptyKey { spec: self.name });
            }
            if !seen.insert(rule.key) {
                return Err(FilterSpecError::DuplicateKey {
                    spec: self.name,
                    key: rule.key,
                });
            }
            if let Some(identifier) = rule.identifiers().into_iter().find(|i| !is_identifier(i)) {
                return Err(FilterSpecError::InvalidIdentifier {
                    spec: self.name,
                    identifier,
                });
            }
        }
        Ok(())
    }
}
