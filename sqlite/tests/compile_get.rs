//! End-to-end compilation scenarios for `get`/`count`, mirroring the
//! concrete worked examples in the query-compiler specification.

use ronin_compiler_sqlite::model::{Cardinality, Preset};
use ronin_compiler_sqlite::{compile, Catalog, Field, FieldType, Model, ReferenceKind};
use serde_json::json;

fn account_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.insert(Model {
        slug: "account".into(),
        plural_slug: "accounts".into(),
        table: "accounts".into(),
        fields: vec![
            Field::scalar("id", FieldType::String),
            Field::scalar("email", FieldType::String),
            Field::scalar("owner", FieldType::String),
            Field::scalar("status", FieldType::String),
        ],
        presets: vec![Preset {
            slug: "active".into(),
            instructions: json!({ "with": { "status": "open" } }),
        }],
    });
    catalog
}

fn beach_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.insert(Model {
        slug: "beach".into(),
        plural_slug: "beaches".into(),
        table: "beaches".into(),
        fields: vec![
            Field::scalar("id", FieldType::String),
            Field::scalar("name", FieldType::String),
        ],
        presets: vec![],
    });
    catalog
}

#[test]
fn singular_selecting_emits_limit_one() {
    let catalog = account_catalog();
    let query = json!({ "get": { "account": { "selecting": ["id"] } } });
    let statements = compile(&[query], &catalog).unwrap();
    assert_eq!(statements[0].sql, "SELECT \"id\" FROM \"accounts\" LIMIT 1");
    assert!(statements[0].params.is_empty());
}

#[test]
fn plural_limited_to_emits_surplus_row_limit() {
    let catalog = account_catalog();
    let query = json!({ "get": { "accounts": { "limitedTo": 20 } } });
    let statements = compile(&[query], &catalog).unwrap();
    assert_eq!(
        statements[0].sql,
        "SELECT * FROM \"accounts\" ORDER BY \"ronin.createdAt\" DESC LIMIT 21"
    );
}

#[test]
fn selecting_multiple_fields_on_distinct_model() {
    let catalog = beach_catalog();
    let query = json!({ "get": { "beach": { "selecting": ["id", "name"] } } });
    let statements = compile(&[query], &catalog).unwrap();
    assert_eq!(statements[0].sql, "SELECT \"id\", \"name\" FROM \"beaches\" LIMIT 1");
}

#[test]
fn equality_filter_binds_a_parameter() {
    let catalog = account_catalog();
    let query = json!({ "get": { "account": { "with": { "email": { "being": "a@b" } } } } });
    let statements = compile(&[query], &catalog).unwrap();
    assert_eq!(
        statements[0].sql,
        "SELECT * FROM \"accounts\" WHERE (\"email\" = ?1) LIMIT 1"
    );
    assert_eq!(statements[0].params.len(), 1);
}

#[test]
fn null_filter_emits_is_null_without_binding() {
    let catalog = account_catalog();
    let query = json!({ "get": { "account": { "with": { "email": null } } } });
    let statements = compile(&[query], &catalog).unwrap();
    assert_eq!(
        statements[0].sql,
        "SELECT * FROM \"accounts\" WHERE (\"email\" IS NULL) LIMIT 1"
    );
    assert!(statements[0].params.is_empty());
}

#[test]
fn preset_merges_before_host_condition_with_preset_entries_first() {
    let catalog = account_catalog();
    let query = json!({
        "get": {
            "account": {
                "for": ["active"],
                "with": { "owner": "x" }
            }
        }
    });
    let statements = compile(&[query], &catalog).unwrap();
    assert_eq!(
        statements[0].sql,
        "SELECT * FROM \"accounts\" WHERE (\"status\" = ?1 AND \"owner\" = ?2) LIMIT 1"
    );
    assert_eq!(statements[0].params.len(), 2);
}

#[test]
fn count_query_emits_count_star() {
    let catalog = account_catalog();
    let query = json!({ "count": { "accounts": {} } });
    let statements = compile(&[query], &catalog).unwrap();
    assert_eq!(
        statements[0].sql,
        "SELECT COUNT(*) FROM \"accounts\" ORDER BY \"ronin.createdAt\" DESC"
    );
}

#[test]
fn unknown_model_address_fails() {
    let catalog = account_catalog();
    let query = json!({ "get": { "widgets": {} } });
    let err = compile(&[query], &catalog).unwrap_err();
    assert_eq!(err.code().as_str(), "MODEL_NOT_FOUND");
}

#[test]
fn resolves_singular_vs_plural_cardinality() {
    let catalog = account_catalog();
    let (_, cardinality) = ronin_compiler_sqlite::resolver::get_model_by_slug(&catalog, "accounts").unwrap();
    assert_eq!(cardinality, Cardinality::Multiple);
}
