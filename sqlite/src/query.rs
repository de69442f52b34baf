//! The outer `Query` envelope and its `Instructions` payload (spec §3, §4.1).

use crate::error::{CompileError, Result};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    Get,
    Set,
    Add,
    Remove,
    Count,
}

impl QueryType {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryType::Get => "get",
            QueryType::Set => "set",
            QueryType::Add => "add",
            QueryType::Remove => "remove",
            QueryType::Count => "count",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "get" => Some(QueryType::Get),
            "set" => Some(QueryType::Set),
            "add" => Some(QueryType::Add),
            "remove" => Some(QueryType::Remove),
            "count" => Some(QueryType::Count),
            _ => None,
        }
    }

    /// Whether the orchestrator should append a default `returning`d shape.
    pub fn returning(self) -> bool {
        true
    }
}

/// The recognized clauses of a query targeting one model (spec §3).
///
/// Wraps the raw JSON object so handlers can read only the clauses they
/// care about while preset expansion (`for`) operates on the whole bundle.
#[derive(Debug, Clone, Default)]
pub struct Instructions(pub Map<String, Value>);

impl Instructions {
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Instructions(map)),
            Value::Null => Ok(Instructions::default()),
            other => Err(CompileError::InvalidQuery(format!(
                "instructions must be an object, got {other}"
            ))),
        }
    }

    pub fn get(&self, clause: &str) -> Option<&Value> {
        self.0.get(clause)
    }

    pub fn with(&self) -> Option<&Value> {
        self.get("with")
    }

    pub fn selecting(&self) -> Option<&Value> {
        self.get("selecting")
    }

    pub fn including(&self) -> Option<&Value> {
        self.get("including")
    }

    pub fn for_presets(&self) -> Option<&Value> {
        self.get("for")
    }

    pub fn ordered_by(&self) -> Option<&Value> {
        self.get("orderedBy")
    }

    pub fn limited_to(&self) -> Result<Option<u64>> {
        match self.get("limitedTo") {
            None => Ok(None),
            Some(Value::Number(n)) => n.as_u64().map(Some).ok_or_else(|| {
                CompileError::InvalidInstruction {
                    instruction: "limitedTo".into(),
                    reason: "must be a non-negative integer".into(),
                }
            }),
            Some(_) => Err(CompileError::InvalidInstruction {
                instruction: "limitedTo".into(),
                reason: "must be a non-negative integer".into(),
            }),
        }
    }

    pub fn to(&self) -> Option<&Map<String, Value>> {
        self.get("to").and_then(Value::as_object)
    }
}

/// One query: a single outer key naming the operation, addressing exactly
/// one model with a bundle of instructions.
#[derive(Debug, Clone)]
pub struct Query {
    pub query_type: QueryType,
    pub model_address: String,
    pub instructions: Instructions,
}

impl Query {
    pub fn parse(value: &Value) -> Result<Self> {
        let Value::Object(outer) = value else {
            return Err(CompileError::InvalidQuery(
                "query must be an object with exactly one query-type key".into(),
            ));
        };
        if outer.len() != 1 {
            return Err(CompileError::InvalidQuery(format!(
                "query must have exactly one query-type key, got {}",
                outer.len()
            )));
        }
        let (key, body) = outer.iter().next().expect("len checked above");
        let query_type = QueryType::from_key(key)
            .ok_or_else(|| CompileError::InvalidQuery(format!("unrecognized query type `{key}`")))?;

        let Value::Object(addressed) = body else {
            return Err(CompileError::InvalidQuery(
                "query body must map a model address to instructions".into(),
            ));
        };
        if addressed.len() != 1 {
            return Err(CompileError::InvalidQuery(format!(
                "query must address exactly one model, got {}",
                addressed.len()
            )));
        }
        let (model_address, instructions) = addressed.iter().next().expect("len checked above");

        Ok(Query {
            query_type,
            model_address: model_address.clone(),
            instructions: Instructions::from_value(instructions.clone())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_get_query() {
        let raw = json!({ "get": { "account": { "selecting": ["id"] } } });
        let query = Query::parse(&raw).unwrap();
        assert_eq!(query.query_type, QueryType::Get);
        assert_eq!(query.model_address, "account");
        assert!(query.instructions.selecting().is_some());
    }

    #[test]
    fn rejects_multiple_query_type_keys() {
        let raw = json!({ "get": { "account": {} }, "count": { "account": {} } });
        assert!(Query::parse(&raw).is_err());
    }

    #[test]
    fn rejects_unrecognized_query_type() {
        let raw = json!({ "truncate": { "account": {} } });
        assert!(Query::parse(&raw).is_err());
    }

    #[test]
    fn rejects_non_numeric_limited_to() {
        let raw = json!({ "get": { "accounts": { "limitedTo": "many" } } });
        let query = Query::parse(&raw).unwrap();
        assert!(query.instructions.limited_to().is_err());
    }
}
