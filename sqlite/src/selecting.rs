//! Builds the `SELECT` column list, including ephemeral columns drawn from
//! `including` (spec §4.6, "Selecting builder").

use crate::error::Result;
use crate::expression::parse_expression;
use crate::model::{Catalog, Model};
use crate::resolver::{get_field_from_model, ResolveContext};
use crate::symbols::Symbol;
use ronin_compiler_core::{ParamBuf, Sql};
use serde_json::{Map, Value};
use std::collections::HashMap;

pub struct SelectColumns {
    pub sql: Sql,
}

/// Builds the column list for `selecting` plus any ephemeral columns
/// contributed by `including`'s non-join leaves.
pub fn build_selecting(
    catalog: &Catalog,
    model: &Model,
    selecting: Option<&Value>,
    including: Option<&Value>,
    expand_columns: bool,
    join_aliases: &HashMap<String, String>,
    ctx: &ResolveContext,
    params: &mut ParamBuf,
) -> Result<SelectColumns> {
    let mut columns = Vec::new();

    match selecting {
        Some(Value::Array(paths)) => {
            for path in paths {
                let path = path.as_str().unwrap_or_default();
                columns.push(get_field_from_model(catalog, model, path, "selecting", ctx)?);
            }
        }
        _ => columns.push(Sql::raw("*")),
    }

    if let Some(Value::Object(including)) = including {
        for (key, leaf) in flatten(including, "") {
            match Symbol::from_value(&leaf) {
                Some(Symbol::Query(_)) => {
                    if expand_columns {
                        columns.extend(expanded_join_columns(catalog, model, &key, join_aliases));
                    }
                }
                Some(Symbol::Expression(expr)) => {
                    let expr_sql = parse_expression(catalog, model, &expr, "including", ctx)?;
                    columns.push(expr_sql.parens().alias(key));
                }
                Some(Symbol::Value(v)) => {
                    let position = params.bind_json(&v)?;
                    columns.push(Sql::param(position).alias(key));
                }
                None => {
                    let position = params.bind_json(&leaf)?;
                    columns.push(Sql::param(position).alias(key));
                }
            }
        }
    }

    Ok(SelectColumns {
        sql: Sql::join(columns, ", "),
    })
}

/// Flattens a (possibly nested) object into dotted-key leaves. A leaf is
/// either a symbol-wrapped object or any non-object value; plain nested
/// objects are descended into.
fn flatten(map: &Map<String, Value>, prefix: &str) -> Vec<(String, Value)> {
    let mut out = Vec::new();
    for (key, value) in map {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(inner) if Symbol::from_value(value).is_none() && !inner.is_empty() => {
                out.extend(flatten(inner, &full_key));
            }
            other => out.push((full_key, other.clone())),
        }
    }
    out
}

/// Emits `"<alias>"."<slug>" as "<alias>.<slug>"` for every field of the
/// joined model that collides by name with a root-model field.
fn expanded_join_columns(
    catalog: &Catalog,
    model: &Model,
    relation_key: &str,
    join_aliases: &HashMap<String, String>,
) -> Vec<Sql> {
    let Some(field) = model.field(relation_key) else {
        return Vec::new();
    };
    let Some(target_slug) = &field.target_model else {
        return Vec::new();
    };
    let Some(target) = catalog.get(target_slug) else {
        return Vec::new();
    };
    let Some(alias) = join_aliases.get(&field.slug) else {
        return Vec::new();
    };

    target
        .fields
        .iter()
        .filter(|f| model.field(&f.slug).is_some())
        .map(|f| {
            Sql::qualified_ident(alias.clone(), f.column.clone()).alias(format!("{alias}.{}", f.slug))
        })
        .collect()
}
