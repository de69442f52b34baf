//! Parses raw expression strings, splicing in field-reference sentinels
//! (spec §4 "Expression parser", `RONIN_MODEL_SYMBOLS.FIELD`).

use crate::error::Result;
use crate::model::{Catalog, Model};
use crate::resolver::{get_field_from_model, ResolveContext};
use crate::symbols;
use ronin_compiler_core::Sql;

/// Parses an expression string such as `"__RONIN_FIELD_name || '!'"` into an
/// `Sql` fragment, resolving every `__RONIN_FIELD_<path>` occurrence against
/// `model` and leaving everything else as raw SQL text.
pub fn parse_expression(
    catalog: &Catalog,
    model: &Model,
    expr: &str,
    instruction: &str,
    ctx: &ResolveContext,
) -> Result<Sql> {
    let mut out = Sql::empty();
    let mut rest = expr;

    while let Some(marker_at) = rest.find(symbols::FIELD) {
        let (literal, tail) = rest.split_at(marker_at);
        if !literal.is_empty() {
            out = out.push_raw(literal);
        }

        let after_marker = &tail[symbols::FIELD.len()..];
        let path_len = after_marker
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '.'))
            .unwrap_or(after_marker.len());
        let (path, remainder) = after_marker.split_at(path_len);

        let selector = get_field_from_model(catalog, model, path, instruction, ctx)?;
        out = out.append(selector);
        rest = remainder;
    }

    if !rest.is_empty() {
        out = out.push_raw(rest);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Field, FieldType};

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.insert(Model {
            slug: "account".into(),
            plural_slug: "accounts".into(),
            table: "accounts".into(),
            fields: vec![Field::scalar("name", FieldType::String)],
            presets: vec![],
        });
        catalog
    }

    #[test]
    fn splices_field_reference_into_expression() {
        let catalog = catalog();
        let model = catalog.get("account").unwrap();
        let sql = parse_expression(
            &catalog,
            model,
            "__RONIN_FIELD_name || '!'",
            "selecting",
            &ResolveContext::new(),
        )
        .unwrap();
        assert_eq!(sql.render(), "\"name\" || '!'");
    }

    #[test]
    fn expression_with_no_field_marker_passes_through() {
        let catalog = catalog();
        let model = catalog.get("account").unwrap();
        let sql = parse_expression(&catalog, model, "1 + 1", "selecting", &ResolveContext::new()).unwrap();
        assert_eq!(sql.render(), "1 + 1");
    }
}
