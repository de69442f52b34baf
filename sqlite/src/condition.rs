//! Compiles `with`-style filter trees into SQL boolean expressions
//! (spec §4.5, "Condition composer").

use crate::error::{CompileError, Result};
use crate::model::{Catalog, FieldType, Model};
use crate::resolver::{field_type, get_field_from_model, ResolveContext};
use ronin_compiler_core::{ParamBuf, Sql};
use serde_json::{Map, Value};

/// A recursive filter tree, mirroring the shape a `with` clause can take.
#[derive(Debug, Clone)]
pub enum Filter {
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Field(String, FieldCondition),
}

#[derive(Debug, Clone)]
pub enum FieldCondition {
    /// A bare scalar or null at a field key: equality, null-aware.
    Equals(Value),
    /// A mapping of condition operators applied to one field, ANDed.
    Operators(Vec<(Operator, Value)>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Being,
    NotBeing,
    StartingWith,
    NotStartingWith,
    EndingWith,
    NotEndingWith,
    Containing,
    NotContaining,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
}

impl Operator {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "being" => Some(Operator::Being),
            "notBeing" => Some(Operator::NotBeing),
            "startingWith" => Some(Operator::StartingWith),
            "notStartingWith" => Some(Operator::NotStartingWith),
            "endingWith" => Some(Operator::EndingWith),
            "notEndingWith" => Some(Operator::NotEndingWith),
            "containing" => Some(Operator::Containing),
            "notContaining" => Some(Operator::NotContaining),
            "greaterThan" => Some(Operator::GreaterThan),
            "greaterOrEqual" => Some(Operator::GreaterOrEqual),
            "lessThan" => Some(Operator::LessThan),
            "lessOrEqual" => Some(Operator::LessOrEqual),
            _ => None,
        }
    }
}

fn is_operator_map(map: &Map<String, Value>) -> bool {
    !map.is_empty() && map.keys().all(|k| Operator::from_key(k).is_some())
}

/// Parses a raw `with` value into a [`Filter`] tree.
pub fn parse_filter(value: &Value, instruction: &str) -> Result<Filter> {
    let Value::Object(map) = value else {
        return Err(CompileError::InvalidInstruction {
            instruction: instruction.to_string(),
            reason: "must be an object".into(),
        });
    };
    let mut clauses = Vec::with_capacity(map.len());
    for (field, v) in map {
        clauses.push(parse_field(field, v, instruction)?);
    }
    Ok(Filter::And(clauses))
}

fn parse_field(path: &str, value: &Value, instruction: &str) -> Result<Filter> {
    match value {
        Value::Array(items) => {
            let mut disjuncts = Vec::with_capacity(items.len());
            for item in items {
                disjuncts.push(parse_field(path, item, instruction)?);
            }
            Ok(Filter::Or(disjuncts))
        }
        Value::Object(map) if is_operator_map(map) => {
            let mut ops = Vec::with_capacity(map.len());
            for (key, v) in map {
                let op = Operator::from_key(key).expect("checked by is_operator_map");
                ops.push((op, v.clone()));
            }
            Ok(Filter::Field(path.to_string(), FieldCondition::Operators(ops)))
        }
        Value::Object(map) => {
            let mut clauses = Vec::with_capacity(map.len());
            for (sub_field, v) in map {
                clauses.push(parse_field(&format!("{path}.{sub_field}"), v, instruction)?);
            }
            Ok(Filter::And(clauses))
        }
        scalar => Ok(Filter::Field(path.to_string(), FieldCondition::Equals(scalar.clone()))),
    }
}

/// Lowers a parsed filter into a parenthesized SQL boolean expression.
pub fn compose(
    filter: &Filter,
    catalog: &Catalog,
    model: &Model,
    instruction: &str,
    ctx: &ResolveContext,
    params: &mut ParamBuf,
) -> Result<Sql> {
    match filter {
        Filter::And(clauses) => {
            let rendered: Result<Vec<Sql>> = clauses
                .iter()
                .map(|c| compose(c, catalog, model, instruction, ctx, params))
                .collect();
            Ok(Sql::join(rendered?, " AND ").parens())
        }
        Filter::Or(clauses) => {
            let rendered: Result<Vec<Sql>> = clauses
                .iter()
                .map(|c| compose(c, catalog, model, instruction, ctx, params))
                .collect();
            Ok(Sql::join(rendered?, " OR ").parens())
        }
        Filter::Field(path, condition) => {
            let selector = get_field_from_model(catalog, model, path, instruction, ctx)?;
            let kind = field_type(model, path);
            compose_field(selector, condition, kind, params)
        }
    }
}

fn bind(params: &mut ParamBuf, value: &Value, kind: Option<FieldType>) -> Result<usize> {
    if kind == Some(FieldType::Date) && !value.is_null() {
        Ok(params.bind_date_json(value)?)
    } else {
        Ok(params.bind_json(value)?)
    }
}

fn compose_field(selector: Sql, condition: &FieldCondition, kind: Option<FieldType>, params: &mut ParamBuf) -> Result<Sql> {
    match condition {
        FieldCondition::Equals(Value::Null) => Ok(selector.push_raw(" IS NULL")),
        FieldCondition::Equals(value) => {
            let position = bind(params, value, kind)?;
            Ok(selector.push_raw(" = ").append(Sql::param(position)))
        }
        FieldCondition::Operators(ops) => {
            let rendered: Result<Vec<Sql>> = ops
                .iter()
                .map(|(op, value)| apply_operator(selector.clone(), *op, value, kind, params))
                .collect();
            let rendered = rendered?;
            if rendered.len() == 1 {
                Ok(rendered.into_iter().next().expect("len checked"))
            } else {
                Ok(Sql::join(rendered, " AND ").parens())
            }
        }
    }
}

fn apply_operator(selector: Sql, op: Operator, value: &Value, kind: Option<FieldType>, params: &mut ParamBuf) -> Result<Sql> {
    let is_null = value.is_null();
    match op {
        Operator::Being if is_null => {
            let position = bind(params, value, kind)?;
            Ok(selector.push_raw(" IS ").append(Sql::param(position)))
        }
        Operator::Being => {
            let position = bind(params, value, kind)?;
            Ok(selector.push_raw(" = ").append(Sql::param(position)))
        }
        Operator::NotBeing if is_null => {
            let position = bind(params, value, kind)?;
            Ok(selector.push_raw(" IS NOT ").append(Sql::param(position)))
        }
        Operator::NotBeing => {
            let position = bind(params, value, kind)?;
            Ok(selector.push_raw(" != ").append(Sql::param(position)))
        }
        Operator::StartingWith => like(selector, value, "", "%", params),
        Operator::NotStartingWith => not_like(selector, value, "", "%", params),
        Operator::EndingWith => like(selector, value, "%", "", params),
        Operator::NotEndingWith => not_like(selector, value, "%", "", params),
        Operator::Containing => like(selector, value, "%", "%", params),
        Operator::NotContaining => not_like(selector, value, "%", "%", params),
        Operator::GreaterThan => comparison(selector, " > ", value, kind, params),
        Operator::GreaterOrEqual => comparison(selector, " >= ", value, kind, params),
        Operator::LessThan => comparison(selector, " < ", value, kind, params),
        Operator::LessOrEqual => comparison(selector, " <= ", value, kind, params),
    }
}

fn comparison(selector: Sql, op: &str, value: &Value, kind: Option<FieldType>, params: &mut ParamBuf) -> Result<Sql> {
    let position = bind(params, value, kind)?;
    Ok(selector.push_raw(op).append(Sql::param(position)))
}

fn like(selector: Sql, value: &Value, prefix: &str, suffix: &str, params: &mut ParamBuf) -> Result<Sql> {
    like_impl(selector, " LIKE ", value, prefix, suffix, params)
}

fn not_like(selector: Sql, value: &Value, prefix: &str, suffix: &str, params: &mut ParamBuf) -> Result<Sql> {
    like_impl(selector, " NOT LIKE ", value, prefix, suffix, params)
}

fn like_impl(
    selector: Sql,
    keyword: &str,
    value: &Value,
    prefix: &str,
    suffix: &str,
    params: &mut ParamBuf,
) -> Result<Sql> {
    let text = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let pattern = format!("{prefix}{text}{suffix}");
    let position = params.bind_json(&Value::String(pattern))?;
    Ok(selector.push_raw(keyword).append(Sql::param(position)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Field, FieldType};
    use serde_json::json;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.insert(Model {
            slug: "account".into(),
            plural_slug: "accounts".into(),
            table: "accounts".into(),
            fields: vec![
                Field::scalar("email", FieldType::String),
                Field::scalar("owner", FieldType::String),
                Field::scalar("status", FieldType::String),
            ],
            presets: vec![],
        });
        catalog
    }

    fn compile_with(value: &Value) -> (String, usize) {
        let catalog = catalog();
        let model = catalog.get("account").unwrap();
        let filter = parse_filter(value, "with").unwrap();
        let mut params = ParamBuf::new();
        let sql = compose(&filter, &catalog, model, "with", &ResolveContext::new(), &mut params).unwrap();
        (sql.render(), params.len())
    }

    #[test]
    fn scalar_equality_binds_a_param() {
        let (sql, count) = compile_with(&json!({ "email": "a@b" }));
        assert_eq!(sql, "(\"email\" = ?1)");
        assert_eq!(count, 1);
    }

    #[test]
    fn bare_null_emits_is_null_without_binding() {
        let (sql, count) = compile_with(&json!({ "email": null }));
        assert_eq!(sql, "(\"email\" IS NULL)");
        assert_eq!(count, 0);
    }

    #[test]
    fn explicit_being_null_binds_and_uses_is() {
        let (sql, count) = compile_with(&json!({ "email": { "being": null } }));
        assert_eq!(sql, "(\"email\" IS ?1)");
        assert_eq!(count, 1);
    }

    #[test]
    fn array_value_becomes_disjunction() {
        let (sql, count) = compile_with(&json!({ "status": ["open", "closed"] }));
        // The outer AND-group wraps a single clause (the OR-group), which
        // wraps itself too: harmless redundant parens, still valid SQL.
        assert_eq!(sql, "((\"status\" = ?1 OR \"status\" = ?2))");
        assert_eq!(count, 2);
    }

    #[test]
    fn multiple_fields_and_together() {
        let (sql, _) = compile_with(&json!({ "owner": "x", "status": "open" }));
        assert_eq!(sql, "(\"owner\" = ?1 AND \"status\" = ?2)");
    }

    #[test]
    fn starting_with_binds_full_pattern() {
        let (sql, count) = compile_with(&json!({ "email": { "startingWith": "a" } }));
        assert_eq!(sql, "(\"email\" LIKE ?1)");
        assert_eq!(count, 1);
    }
}
