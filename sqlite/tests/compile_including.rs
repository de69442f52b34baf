//! End-to-end compilation scenarios exercising `including` joins and
//! dotted reference paths resolved without an `including` entry.

use ronin_compiler_sqlite::{compile, Catalog, Field, FieldType, Model, ReferenceKind};
use serde_json::json;

fn catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.insert(Model {
        slug: "author".into(),
        plural_slug: "authors".into(),
        table: "authors".into(),
        fields: vec![
            Field::scalar("id", FieldType::String),
            Field::scalar("email", FieldType::String),
        ],
        presets: vec![],
    });
    catalog.insert(Model {
        slug: "post".into(),
        plural_slug: "posts".into(),
        table: "posts".into(),
        fields: vec![
            Field::scalar("id", FieldType::String),
            Field::scalar("title", FieldType::String),
            Field::link("author", "author", ReferenceKind::One),
        ],
        presets: vec![],
    });
    catalog
}

#[test]
fn including_with_filter_compiles_left_join_on_clause() {
    let catalog = catalog();
    let query = json!({
        "get": {
            "posts": {
                "including": {
                    "author": {
                        "__RONIN_QUERY": {
                            "get": { "author": { "with": { "id": "a1" } } }
                        }
                    }
                }
            }
        }
    });
    let statements = compile(&[query], &catalog).unwrap();
    let sql = &statements[0].sql;
    assert!(sql.contains("LEFT JOIN \"authors\" AS \"including_author\""));
    assert!(sql.contains("ON (\"including_author\".\"id\" = ?1)"));
    assert!(sql.ends_with("ORDER BY \"ronin.createdAt\" DESC"));
}

#[test]
fn including_without_filter_compiles_cross_join() {
    let catalog = catalog();
    let query = json!({
        "get": {
            "posts": {
                "including": {
                    "author": {
                        "__RONIN_QUERY": { "get": { "author": {} } }
                    }
                }
            }
        }
    });
    let statements = compile(&[query], &catalog).unwrap();
    assert!(statements[0].sql.contains("CROSS JOIN"));
}

#[test]
fn reference_path_without_including_compiles_as_correlated_subselect() {
    let catalog = catalog();
    let query = json!({
        "get": {
            "posts": {
                "with": { "author.email": "x@y" }
            }
        }
    });
    let statements = compile(&[query], &catalog).unwrap();
    assert!(statements[0]
        .sql
        .contains("(SELECT \"email\" FROM \"authors\" WHERE \"id\" = \"author\""));
}
