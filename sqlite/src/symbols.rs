//! Reserved sentinel markers embedded in query values.
//!
//! A wrapping object with exactly one of these keys marks its payload as a
//! sub-query, a raw expression, or a value that must be routed through the
//! parameter binder rather than spliced as text — see spec §3 (`Symbol`) and
//! §6 ("Reserved symbols"). The exact byte sequences are part of the
//! compatibility surface; see DESIGN.md for why these particular strings
//! were chosen.

/// Wrapping key for a sub-query symbol: `{ "__RONIN_QUERY": { ... } }`.
pub const QUERY: &str = "__RONIN_QUERY";

/// Wrapping key for a raw-expression symbol: `{ "__RONIN_EXPRESSION": "..." }`.
pub const EXPRESSION: &str = "__RONIN_EXPRESSION";

/// Both a wrapping key (`{ "__RONIN_VALUE": ... }`, produced by preset
/// argument substitution) and a substring sentinel inside plain string
/// leaves of a preset's instructions, replaced at `for` expansion time.
pub const VALUE: &str = "__RONIN_VALUE";

/// Prefix marking a field-reference path embedded inside an expression
/// string, e.g. `"__RONIN_FIELD_name || '!'"`.
pub const FIELD: &str = "__RONIN_FIELD_";

use serde_json::{Map, Value};

/// A destructured symbol, recognized by inspecting a JSON object's keys.
#[derive(Debug, Clone)]
pub enum Symbol {
    /// `{ "__RONIN_QUERY": { <queryType>: { <modelAddress>: <Instructions> } } }`
    Query(Value),
    /// `{ "__RONIN_EXPRESSION": "<sql fragment with field/value sentinels>" }`
    Expression(String),
    /// `{ "__RONIN_VALUE": <value> }`
    Value(Value),
}

impl Symbol {
    /// Recognizes a symbol by its single reserved wrapping key. Objects with
    /// more than one key, or none of the reserved keys, are not symbols.
    pub fn from_value(value: &Value) -> Option<Symbol> {
        let Value::Object(map) = value else {
            return None;
        };
        from_map(map)
    }
}

fn from_map(map: &Map<String, Value>) -> Option<Symbol> {
    if map.len() != 1 {
        return None;
    }
    if let Some(inner) = map.get(QUERY) {
        return Some(Symbol::Query(inner.clone()));
    }
    if let Some(inner) = map.get(EXPRESSION) {
        return inner.as_str().map(|s| Symbol::Expression(s.to_string()));
    }
    if let Some(inner) = map.get(VALUE) {
        return Some(Symbol::Value(inner.clone()));
    }
    None
}
