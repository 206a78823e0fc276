//! Caller-supplied search criteria
//!
//! A criteria set maps search keys to scalar values. A key missing from the
//! map is absent; whether a present but falsy value counts is decided by the
//! compiler's [`PresenceRule`](super::PresenceRule).

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

/// Scalar criteria value
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CriteriaValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl CriteriaValue {
    /// Parse a decoded query-string value.
    ///
    /// Only canonical integers become [`CriteriaValue::Integer`]: `"7"` does,
    /// `"007"` and `"+7"` stay text so identifiers with leading zeros survive.
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<i64>() {
            Ok(n) if n.to_string() == raw => Self::Integer(n),
            _ => Self::Text(raw.to_string()),
        }
    }

    /// Empty text, zero and NaN are falsy
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Text(s) => !s.is_empty(),
            Self::Integer(n) => *n != 0,
            Self::Float(f) => *f != 0.0 && !f.is_nan(),
        }
    }
}

impl fmt::Display for CriteriaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{}", n),
            Self::Float(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for CriteriaValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CriteriaValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for CriteriaValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for CriteriaValue {
    fn from(n: i32) -> Self {
        Self::Integer(n.into())
    }
}

impl From<f64> for CriteriaValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

/// Search criteria for one query
///
/// Deserializes from a JSON object; `null` members are dropped as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "BTreeMap<String, Option<CriteriaValue>>")]
pub struct Criteria {
    values: BTreeMap<String, CriteriaValue>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<CriteriaValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<CriteriaValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&CriteriaValue> {
        self.values.get(key)
    }

    /// Build criteria from already-decoded `(key, value)` string pairs.
    ///
    /// Later pairs overwrite earlier ones with the same key.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), CriteriaValue::parse(v.as_ref())))
            .collect();
        Self { values }
    }
}

impl From<BTreeMap<String, Option<CriteriaValue>>> for Criteria {
    fn from(map: BTreeMap<String, Option<CriteriaValue>>) -> Self {
        let values = map
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| (k, v)))
            .collect();
        Self { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_canonical_integers_only() {
        assert_eq!(CriteriaValue::parse("7"), CriteriaValue::Integer(7));
        assert_eq!(CriteriaValue::parse("-3"), CriteriaValue::Integer(-3));
        assert_eq!(
            CriteriaValue::parse("007"),
            CriteriaValue::Text("007".to_string())
        );
        assert_eq!(
            CriteriaValue::parse("+7"),
            CriteriaValue::Text("+7".to_string())
        );
        assert_eq!(
            CriteriaValue::parse("2024-01-01"),
            CriteriaValue::Text("2024-01-01".to_string())
        );
    }

    #[test]
    fn truthiness() {
        assert!(!CriteriaValue::from("").is_truthy());
        assert!(!CriteriaValue::from(0).is_truthy());
        assert!(!CriteriaValue::from(0.0).is_truthy());
        assert!(!CriteriaValue::from(f64::NAN).is_truthy());
        assert!(CriteriaValue::from("0").is_truthy());
        assert!(CriteriaValue::from(" ").is_truthy());
        assert!(CriteriaValue::from(-1).is_truthy());
    }

    #[test]
    fn deserialize_drops_nulls() {
        let json = r#"{"doctor_id": 7, "nombre": "Ana", "estado": null, "peso": 71.5}"#;
        let criteria: Criteria = serde_json::from_str(json).unwrap();

        assert_eq!(criteria.values.len(), 3);
        assert_eq!(criteria.get("doctor_id"), Some(&CriteriaValue::Integer(7)));
        assert_eq!(criteria.get("nombre"), Some(&CriteriaValue::from("Ana")));
        assert_eq!(criteria.get("peso"), Some(&CriteriaValue::Float(71.5)));
        assert!(criteria.get("estado").is_none());
    }

    #[test]
    fn deserialize_rejects_non_scalars() {
        let json = r#"{"doctor_id": [1, 2]}"#;
        assert!(serde_json::from_str::<Criteria>(json).is_err());
    }

    #[test]
    fn from_pairs_last_wins() {
        let criteria = Criteria::from_pairs([("dni", "30111222"), ("dni", "0301")]);
        assert_eq!(criteria.get("dni"), Some(&CriteriaValue::from("0301")));
    }

    #[test]
    fn display_renders_raw_value() {
        assert_eq!(CriteriaValue::from("Ana").to_string(), "Ana");
        assert_eq!(CriteriaValue::from(42).to_string(), "42");
        assert_eq!(CriteriaValue::from(1.5).to_string(), "1.5");
    }
}
