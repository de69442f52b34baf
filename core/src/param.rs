//! The per-query parameter vector.

use crate::error::CoreError;
use crate::value::SqlValue;
use serde_json::Value;

/// An append-only buffer of bound parameters, threaded explicitly through
/// every compilation handler rather than kept as process-wide state.
///
/// Positions are 1-based to match the `?N` placeholders SQLite expects.
#[derive(Debug, Default)]
pub struct ParamBuf {
    values: Vec<SqlValue>,
}

impl ParamBuf {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an already-encoded value and returns its 1-based placeholder
    /// position.
    pub fn bind(&mut self, value: SqlValue) -> usize {
        self.values.push(value);
        self.values.len()
    }

    /// Encodes and appends a JSON value, returning its 1-based placeholder
    /// position.
    pub fn bind_json(&mut self, value: &Value) -> Result<usize, CoreError> {
        Ok(self.bind(SqlValue::encode(value)?))
    }

    /// Like [`ParamBuf::bind_json`], but encodes `value` as a date (see
    /// [`SqlValue::encode_date`]).
    pub fn bind_date_json(&mut self, value: &Value) -> Result<usize, CoreError> {
        Ok(self.bind(SqlValue::encode_date(value)?))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<SqlValue> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn positions_are_1_based_and_monotonic() {
        let mut params = ParamBuf::new();
        assert_eq!(params.bind_json(&json!("a")).unwrap(), 1);
        assert_eq!(params.bind_json(&json!("b")).unwrap(), 2);
        assert_eq!(params.len(), 2);
    }
}
