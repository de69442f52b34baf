//! Translates `including` sub-queries into `JOIN` fragments, computing join
//! type and cardinality-driven sub-query wrapping (spec §4.7).

use crate::condition::{compose, parse_filter};
use crate::error::{CompileError, Result};
use crate::model::{Cardinality, Catalog, Model};
use crate::query::Query;
use crate::resolver::{get_model_by_slug, ResolveContext};
use crate::symbols::Symbol;
use ronin_compiler_core::{ParamBuf, Sql};
use serde_json::Value;
use std::collections::HashMap;

/// A single resolved join, ready to be spliced into the `FROM` clause.
pub struct JoinClause {
    pub sql: Sql,
    /// The host-model field slug this join satisfies; used by the resolver
    /// to qualify dotted paths like `author.email` against the join alias.
    pub relation_field: String,
    pub alias: String,
}

/// Compiles every sub-query leaf of `including` into a join fragment.
///
/// `compile_subquery` recursively compiles a nested [`Query`] against the
/// same parameter buffer (so positional placeholders stay consistent across
/// the whole statement); it is supplied by the orchestrator to avoid a
/// circular dependency between this module and the top-level compiler.
pub fn build_including(
    catalog: &Catalog,
    host_model: &Model,
    including: Option<&Value>,
    params: &mut ParamBuf,
    compile_subquery: &mut dyn FnMut(&Query, &mut ParamBuf) -> Result<Sql>,
) -> Result<Vec<JoinClause>> {
    let Some(Value::Object(including)) = including else {
        return Ok(Vec::new());
    };

    let mut joins = Vec::new();
    for (key, leaf) in including {
        let Some(Symbol::Query(inner)) = Symbol::from_value(leaf) else {
            continue;
        };
        joins.push(build_join(catalog, host_model, key, &inner, params, compile_subquery)?);
    }
    Ok(joins)
}

fn build_join(
    catalog: &Catalog,
    host_model: &Model,
    relation_key: &str,
    sub_query_value: &Value,
    params: &mut ParamBuf,
    compile_subquery: &mut dyn FnMut(&Query, &mut ParamBuf) -> Result<Sql>,
) -> Result<JoinClause> {
    let sub_query = Query::parse(sub_query_value)?;
    let (related_model, cardinality) = get_model_by_slug(catalog, &sub_query.model_address)?;
    let single = cardinality == Cardinality::Single;

    let has_with = sub_query.instructions.with().is_some();
    let alias = format!("including_{relation_key}");

    // A singular address with no filter matches exactly one row; force the
    // implicit LIMIT so a plain table reference can't join in extras.
    let forces_single_row = !has_with && single;
    let needs_subselect =
        forces_single_row || sub_query.instructions.limited_to()?.is_some() || sub_query.instructions.ordered_by().is_some();

    let table_ref = if needs_subselect {
        compile_subquery(&sub_query, params)?.parens()
    } else {
        Sql::ident(related_model.table.clone())
    };

    let join_sql = if !has_with {
        Sql::raw("CROSS JOIN ")
            .append(table_ref)
            .alias(alias.clone())
    } else {
        let join_ctx = ResolveContext::with_root_alias(alias.clone());
        let filter = parse_filter(
            sub_query.instructions.with().expect("has_with checked above"),
            "including",
        )?;
        let on_clause = compose(&filter, catalog, related_model, "including", &join_ctx, params)?;
        Sql::raw("LEFT JOIN ")
            .append(table_ref)
            .alias(alias.clone())
            .push_raw(" ON ")
            .append(on_clause)
    };

    let relation_field = host_model
        .field(relation_key)
        .map(|f| f.slug.clone())
        .unwrap_or_else(|| relation_key.to_string());

    Ok(JoinClause {
        sql: join_sql,
        relation_field,
        alias,
    })
}

/// Builds the alias map a [`crate::resolver::ResolveContext`] needs to
/// qualify dotted paths through an active join.
pub fn join_alias_map(joins: &[JoinClause]) -> HashMap<String, String> {
    joins
        .iter()
        .map(|j| (j.relation_field.clone(), j.alias.clone()))
        .collect()
}
