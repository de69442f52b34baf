//! Bound parameter values.
//!
//! Mirrors the shape of a SQLite dynamic type (`INTEGER`/`REAL`/`TEXT`/`NULL`)
//! rather than carrying serde_json's richer type set, since every bound value
//! ultimately has to travel over an SQLite-compatible wire format.

use crate::error::CoreError;
use serde_json::Value;

/// A single bound SQL parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Integer(i64),
    Real(f64),
    Text(String),
    Null,
}

impl SqlValue {
    /// Encodes a JSON value per the binder's value-encoding rules (§4.4):
    /// booleans become 0/1, dates and plain strings pass through as text,
    /// numbers become INTEGER or REAL depending on their shape, and nested
    /// objects/arrays are JSON-encoded to text. `Value::Null` encodes to
    /// `SqlValue::Null`; callers that need `IS NULL` semantics for a bare
    /// scalar should special-case that before reaching the binder (see
    /// `ronin_compiler_sqlite::condition`).
    pub fn encode(value: &Value) -> Result<Self, CoreError> {
        Ok(match value {
            Value::Null => SqlValue::Null,
            Value::Bool(b) => SqlValue::Integer(if *b { 1 } else { 0 }),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    SqlValue::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    SqlValue::Real(f)
                } else {
                    return Err(CoreError::Unencodable(n.to_string()));
                }
            }
            Value::String(s) => SqlValue::Text(s.clone()),
            Value::Object(_) | Value::Array(_) => SqlValue::Text(serde_json::to_string(value)?),
        })
    }

    /// Encodes a value known to back a `date` field: a millisecond Unix
    /// timestamp or an RFC 3339 string are both normalized to a single
    /// canonical ISO-8601 text representation, so two callers that express
    /// "the same instant" differently still compare equal in SQLite's
    /// TEXT-affinity date columns.
    pub fn encode_date(value: &Value) -> Result<Self, CoreError> {
        let instant = match value {
            Value::Null => return Ok(SqlValue::Null),
            Value::String(s) => chrono::DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&chrono::Utc))
                .map_err(|_| CoreError::Unencodable(format!("not a valid ISO-8601 date: {s}")))?,
            Value::Number(n) => {
                let millis = n
                    .as_i64()
                    .ok_or_else(|| CoreError::Unencodable(format!("not a valid timestamp: {n}")))?;
                chrono::DateTime::from_timestamp_millis(millis)
                    .ok_or_else(|| CoreError::Unencodable(format!("timestamp out of range: {millis}")))?
            }
            other => return Err(CoreError::Unencodable(format!("expected a date value, got {other}"))),
        };
        Ok(SqlValue::Text(
            instant.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn encodes_bool_as_integer() {
        assert_eq!(SqlValue::encode(&json!(true)).unwrap(), SqlValue::Integer(1));
        assert_eq!(SqlValue::encode(&json!(false)).unwrap(), SqlValue::Integer(0));
    }

    #[test]
    fn encodes_date_string_as_text() {
        assert_eq!(
            SqlValue::encode(&json!("2024-01-01T00:00:00.000Z")).unwrap(),
            SqlValue::Text("2024-01-01T00:00:00.000Z".into())
        );
    }

    #[test]
    fn encodes_object_as_json_text() {
        let encoded = SqlValue::encode(&json!({"a": 1})).unwrap();
        assert_eq!(encoded, SqlValue::Text("{\"a\":1}".into()));
    }

    #[test]
    fn encodes_null() {
        assert_eq!(SqlValue::encode(&json!(null)).unwrap(), SqlValue::Null);
    }

    #[test]
    fn encode_date_normalizes_timestamp_and_string_to_the_same_text() {
        let from_string = SqlValue::encode_date(&json!("2024-01-01T00:00:00.000Z")).unwrap();
        let from_millis = SqlValue::encode_date(&json!(1704067200000i64)).unwrap();
        assert_eq!(from_string, from_millis);
    }

    #[test]
    fn encode_date_rejects_unparsable_string() {
        assert!(SqlValue::encode_date(&json!("not a date")).is_err());
    }
}
