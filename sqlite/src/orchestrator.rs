//! Top-level query compiler: dispatches on query type, drives the
//! instruction handlers in a fixed order, and assembles the final
//! statement (spec §4.1).

use crate::condition::{compose, parse_filter};
use crate::error::{CompileError, Result};
use crate::including::{build_including, join_alias_map};
use crate::model::Catalog;
use crate::preset::expand_presets;
use crate::query::{Query, QueryType};
use crate::resolver::{field_type, get_field_from_model, get_model_by_slug, ResolveContext};
use crate::selecting::build_selecting;
use crate::symbols::Symbol;
use ronin_compiler_core::{ParamBuf, Sql, SqlValue};
use serde_json::Value;

/// One compiled query: ready-to-execute SQL text plus its bound parameters.
#[derive(Debug, Clone)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<SqlValue>,
    pub returning: bool,
}

/// Compiles a batch of queries against a model catalog.
pub fn compile(queries: &[Value], catalog: &Catalog) -> Result<Vec<Statement>> {
    queries.iter().map(|q| compile_one(q, catalog)).collect()
}

fn compile_one(raw: &Value, catalog: &Catalog) -> Result<Statement> {
    let mut query = Query::parse(raw)?;

    if let Some(for_value) = query.instructions.for_presets().cloned() {
        let (model, _) = get_model_by_slug(catalog, &query.model_address)?;
        expand_presets(model, &for_value, &mut query.instructions.0)?;
    }

    let mut params = ParamBuf::new();
    let sql = compile_body(&query, catalog, &mut params)?;

    ronin_compiler_core::trace_compile!(query.query_type.as_str(), &sql, params.len());

    Ok(Statement {
        sql,
        params: params.into_values(),
        returning: query.query_type.returning(),
    })
}

/// Compiles one query's SQL text, using `params` as the shared parameter
/// buffer (so a recursively-compiled sub-select shares positional
/// placeholders with its parent statement).
fn compile_body(query: &Query, catalog: &Catalog, params: &mut ParamBuf) -> Result<String> {
    let (model, cardinality) = get_model_by_slug(catalog, &query.model_address)?;
    let is_single = cardinality == crate::model::Cardinality::Single;

    match query.query_type {
        QueryType::Get | QueryType::Count => {
            let mut compile_sub = |sub: &Query, params: &mut ParamBuf| compile_body(sub, catalog, params).map(Sql::raw);
            let joins = build_including(catalog, model, query.instructions.including(), params, &mut compile_sub)?;
            let join_aliases = join_alias_map(&joins);
            let root_ctx = ResolveContext::new();

            let mut sql = Sql::raw("SELECT ");
            if query.query_type == QueryType::Count {
                sql = sql.push_raw("COUNT(*)");
            } else {
                let expand_columns = query
                    .instructions
                    .get("expandColumns")
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                let columns = build_selecting(
                    catalog,
                    model,
                    query.instructions.selecting(),
                    query.instructions.including(),
                    expand_columns,
                    &join_aliases,
                    &root_ctx,
                    params,
                )?;
                sql = sql.append(columns.sql);
            }

            sql = sql.push_raw(" FROM ").append(Sql::ident(model.table.clone()));

            for join in &joins {
                sql = sql.push_raw(" ").append(join.sql.clone());
            }

            let mut filter_ctx = ResolveContext::new();
            filter_ctx.join_aliases = join_aliases;
            if let Some(with) = query.instructions.with() {
                let filter = parse_filter(with, "with")?;
                let where_sql = compose(&filter, catalog, model, "with", &filter_ctx, params)?;
                sql = sql.push_raw(" WHERE ").append(where_sql);
            }

            sql = sql.append(order_clause(query, is_single)?);
            sql = sql.append(limit_clause(query, is_single)?);

            Ok(sql.render())
        }
        QueryType::Set => {
            let to = query.instructions.to().ok_or_else(|| CompileError::InvalidInstruction {
                instruction: "set".into(),
                reason: "requires a `to` clause".into(),
            })?;
            let ctx = ResolveContext::new();
            let assignments: Result<Vec<Sql>> = to
                .iter()
                .map(|(field, value)| compile_assignment(catalog, model, field, value, &ctx, params))
                .collect();

            let mut sql = Sql::raw("UPDATE ")
                .append(Sql::ident(model.table.clone()))
                .push_raw(" SET ")
                .append(Sql::join(assignments?, ", "));

            if let Some(with) = query.instructions.with() {
                let filter = parse_filter(with, "with")?;
                let where_sql = compose(&filter, catalog, model, "with", &ctx, params)?;
                sql = sql.push_raw(" WHERE ").append(where_sql);
            }
            Ok(sql.render())
        }
        QueryType::Add => {
            let to = query.instructions.to().ok_or_else(|| CompileError::InvalidInstruction {
                instruction: "add".into(),
                reason: "requires a `to` clause".into(),
            })?;
            let ctx = ResolveContext::new();
            let mut columns = Vec::with_capacity(to.len());
            let mut values = Vec::with_capacity(to.len());
            for (field, value) in to {
                let selector = get_field_from_model(catalog, model, field, "add", &ctx)?;
                columns.push(selector);
                values.push(compile_value(catalog, model, field, value, &ctx, params)?);
            }

            let sql = Sql::raw("INSERT INTO ")
                .append(Sql::ident(model.table.clone()))
                .push_raw(" (")
                .append(Sql::join(columns, ", "))
                .push_raw(") VALUES (")
                .append(Sql::join(values, ", "))
                .push_raw(")");
            Ok(sql.render())
        }
        QueryType::Remove => {
            let ctx = ResolveContext::new();
            let mut sql = Sql::raw("DELETE FROM ").append(Sql::ident(model.table.clone()));
            if let Some(with) = query.instructions.with() {
                let filter = parse_filter(with, "with")?;
                let where_sql = compose(&filter, catalog, model, "with", &ctx, params)?;
                sql = sql.push_raw(" WHERE ").append(where_sql);
            }
            Ok(sql.render())
        }
    }
}

fn compile_assignment(
    catalog: &Catalog,
    model: &crate::model::Model,
    field: &str,
    value: &Value,
    ctx: &ResolveContext,
    params: &mut ParamBuf,
) -> Result<Sql> {
    let selector = get_field_from_model(catalog, model, field, "set", ctx)?;
    let rhs = compile_value(catalog, model, field, value, ctx, params)?;
    Ok(selector.push_raw(" = ").append(rhs))
}

fn compile_value(
    catalog: &Catalog,
    model: &crate::model::Model,
    field: &str,
    value: &Value,
    ctx: &ResolveContext,
    params: &mut ParamBuf,
) -> Result<Sql> {
    match Symbol::from_value(value) {
        Some(Symbol::Expression(expr)) => crate::expression::parse_expression(catalog, model, &expr, "to", ctx),
        Some(Symbol::Value(v)) => {
            let position = bind_for_field(model, field, &v, params)?;
            Ok(Sql::param(position))
        }
        Some(Symbol::Query(_)) => Err(CompileError::InvalidInstruction {
            instruction: "to".into(),
            reason: "sub-queries are not valid assignment values".into(),
        }),
        None => {
            let position = bind_for_field(model, field, value, params)?;
            Ok(Sql::param(position))
        }
    }
}

fn bind_for_field(model: &crate::model::Model, field: &str, value: &Value, params: &mut ParamBuf) -> Result<usize> {
    if field_type(model, field) == Some(crate::model::FieldType::Date) && !value.is_null() {
        Ok(params.bind_date_json(value)?)
    } else {
        Ok(params.bind_json(value)?)
    }
}

fn order_clause(query: &Query, is_single: bool) -> Result<Sql> {
    if let Some(ordered_by) = query.instructions.ordered_by() {
        return Ok(render_ordered_by(ordered_by)?);
    }
    if is_single {
        return Ok(Sql::empty());
    }
    Ok(Sql::raw(" ORDER BY ").append(Sql::ident("ronin.createdAt")).push_raw(" DESC"))
}

fn render_ordered_by(value: &Value) -> Result<Sql> {
    let Value::Object(map) = value else {
        return Err(CompileError::InvalidInstruction {
            instruction: "orderedBy".into(),
            reason: "must be an object with `ascending`/`descending` lists".into(),
        });
    };
    let mut terms = Vec::new();
    if let Some(Value::Array(fields)) = map.get("ascending") {
        for f in fields {
            let name = f.as_str().unwrap_or_default();
            terms.push(Sql::ident(name).push_raw(" ASC"));
        }
    }
    if let Some(Value::Array(fields)) = map.get("descending") {
        for f in fields {
            let name = f.as_str().unwrap_or_default();
            terms.push(Sql::ident(name).push_raw(" DESC"));
        }
    }
    if terms.is_empty() {
        return Ok(Sql::empty());
    }
    Ok(Sql::raw(" ORDER BY ").append(Sql::join(terms, ", ")))
}

fn limit_clause(query: &Query, is_single: bool) -> Result<Sql> {
    if is_single {
        return Ok(Sql::raw(" LIMIT 1"));
    }
    if let Some(limit) = query.instructions.limited_to()? {
        return Ok(Sql::raw(format!(" LIMIT {}", limit + 1)));
    }
    Ok(Sql::empty())
}
