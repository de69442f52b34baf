//! Model and field-path resolution (spec §4.3).

use crate::error::{CompileError, Result};
use crate::model::{Cardinality, Catalog, FieldType, Model};
use ronin_compiler_core::Sql;
use std::collections::HashMap;

/// Looks up a model by either its singular or plural slug.
pub fn get_model_by_slug<'a>(catalog: &'a Catalog, address: &str) -> Result<(&'a Model, Cardinality)> {
    catalog
        .resolve(address)
        .ok_or_else(|| CompileError::ModelNotFound(address.to_string()))
}

/// Which table alias (if any) unqualified field paths resolve against, plus
/// the join aliases registered by the including builder for this query,
/// keyed by the leading path segment that named the relation.
#[derive(Debug, Clone, Default)]
pub struct ResolveContext {
    pub root_alias: Option<String>,
    pub join_aliases: HashMap<String, String>,
}

impl ResolveContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root_alias(alias: impl Into<String>) -> Self {
        ResolveContext {
            root_alias: Some(alias.into()),
            join_aliases: HashMap::new(),
        }
    }

    fn root_ident(&self, column: &str) -> Sql {
        match &self.root_alias {
            Some(alias) => Sql::qualified_ident(alias.clone(), column),
            None => Sql::ident(column),
        }
    }
}

/// Resolves a (possibly dotted) field path on `model` to a quoted SQL
/// selector, given the join aliases active for this query.
pub fn get_field_from_model(
    catalog: &Catalog,
    model: &Model,
    path: &str,
    instruction: &str,
    ctx: &ResolveContext,
) -> Result<Sql> {
    let mut segments = path.splitn(2, '.');
    let head = segments.next().expect("splitn always yields one item");
    let rest = segments.next();

    let field = model.field(head).ok_or_else(|| CompileError::FieldNotFound {
        path: path.to_string(),
        instruction: instruction.to_string(),
    })?;

    match rest {
        None => Ok(ctx.root_ident(&field.column)),
        Some(rest) if field.is_link() => resolve_through_reference(catalog, model, field, rest, path, instruction, ctx),
        Some(rest) => {
            // A dotted path whose head is not a reference is a group field:
            // the storage column name is the dotted path itself.
            let column = format!("{head}.{rest}");
            Ok(ctx.root_ident(&column))
        }
    }
}

fn resolve_through_reference(
    catalog: &Catalog,
    model: &Model,
    field: &crate::model::Field,
    rest: &str,
    full_path: &str,
    instruction: &str,
    ctx: &ResolveContext,
) -> Result<Sql> {
    let target_slug = field
        .target_model
        .as_deref()
        .expect("link fields always carry a target_model");
    let target = catalog
        .get(target_slug)
        .ok_or_else(|| CompileError::ModelNotFound(target_slug.to_string()))?;

    if let Some(alias) = ctx.join_aliases.get(&field.slug) {
        let nested_ctx = ResolveContext::with_root_alias(alias.clone());
        return get_field_from_model(catalog, target, rest, instruction, &nested_ctx);
    }

    // No active join for this relation: fall back to a correlated scalar
    // sub-select so `with: { "author.email": "x" }` still compiles without
    // a matching `including` entry.
    if rest.contains('.') {
        return Err(CompileError::FieldNotFound {
            path: full_path.to_string(),
            instruction: instruction.to_string(),
        });
    }
    let target_field = target.field(rest).ok_or_else(|| CompileError::FieldNotFound {
        path: full_path.to_string(),
        instruction: instruction.to_string(),
    })?;

    let parent_ident = ctx.root_ident(&field.column);
    let subselect = Sql::raw("SELECT ")
        .append(Sql::ident(target_field.column.clone()))
        .push_raw(" FROM ")
        .append(Sql::ident(target.table.clone()))
        .push_raw(" WHERE ")
        .append(Sql::ident("id"))
        .push_raw(" = ")
        .append(parent_ident)
        .push_raw(" LIMIT 1");
    Ok(subselect.parens())
}

/// The storage type of the field a path's last local segment names, used to
/// decide how a bound value is encoded (see [`crate::model::FieldType::Date`]).
/// Only resolves against `model` directly; a dotted path through a reference
/// or group field is treated as untyped, since the binder falls back to
/// generic JSON encoding for those.
pub fn field_type(model: &Model, path: &str) -> Option<FieldType> {
    if path.contains('.') {
        return None;
    }
    model.field(path).map(|f| f.kind)
}
