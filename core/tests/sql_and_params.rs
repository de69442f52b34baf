//! Black-box coverage of the fragment builder and parameter buffer working
//! together the way a dialect compiler composes them.

use ronin_compiler_core::{ParamBuf, Sql};

#[test]
fn builds_a_parenthesized_and_group_with_positional_params() {
    let mut params = ParamBuf::new();
    let email_pos = params.bind_json(&serde_json::json!("a@b")).unwrap();
    let owner_pos = params.bind_json(&serde_json::json!("x")).unwrap();

    let clause = Sql::join(
        vec![
            Sql::ident("email").push_raw(" = ").append(Sql::param(email_pos)),
            Sql::ident("owner").push_raw(" = ").append(Sql::param(owner_pos)),
        ],
        " AND ",
    )
    .parens();

    assert_eq!(clause.render(), "(\"email\" = ?1 AND \"owner\" = ?2)");
    assert_eq!(params.len(), 2);
}

#[test]
fn aliased_nested_select_renders_as_a_derived_table() {
    let inner = Sql::raw("SELECT * FROM ").append(Sql::ident("accounts"));
    let derived = Sql::nested(inner).alias("sub_accounts");
    assert_eq!(derived.render(), "(SELECT * FROM \"accounts\") AS \"sub_accounts\"");
}
