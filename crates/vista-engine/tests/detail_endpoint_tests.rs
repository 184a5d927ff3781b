mod common;

use common::{civic_db, detail};
use serde_json::json;

#[test]
fn test_detail_without_fields_renders_columns() {
    let conn = civic_db(3);
    let result = detail(&conn, "people", "2", &[]);

    assert_eq!(result.response.status, 200);
    assert_eq!(
        result.response.body,
        json!({
            "id": 2,
            "name": "Person 2",
            "sort_name": "0002",
            "gender": "female",
            "created_at": "2020-01-01T00:02:00Z"
        })
    );
    assert_eq!(result.response.header("Access-Control-Allow-Origin"), Some("*"));
}

#[test]
fn test_detail_with_nested_fields() {
    let conn = civic_db(3);
    let result = detail(
        &conn,
        "people",
        "1",
        &[("fields", "name,memberships.organization.name")],
    );

    assert_eq!(
        result.response.body,
        json!({
            "name": "Person 1",
            "memberships": [{"organization": {"name": "Senate"}}]
        })
    );
}

#[test]
fn test_detail_missing_object_is_404() {
    let conn = civic_db(3);
    let result = detail(&conn, "people", "9999", &[]);

    assert_eq!(result.response.status, 404);
    assert_eq!(result.response.body["code"], "ERR_NOT_FOUND");
}

#[test]
fn test_detail_invalid_field_is_400() {
    let conn = civic_db(3);
    let result = detail(&conn, "organizations", "1", &[("fields", "children.bogus")]);

    assert_eq!(result.response.status, 400);
    assert_eq!(result.response.body["code"], "ERR_INVALID_FIELD");
    assert!(result.response.body["error"]
        .as_str()
        .unwrap()
        .contains("(children.bogus)"));
}

#[test]
fn test_detail_ignores_list_parameters() {
    let conn = civic_db(3);
    let result = detail(
        &conn,
        "people",
        "3",
        &[("fields", "id"), ("page", "abc"), ("sort_by", "nope"), ("gender", "x")],
    );

    assert_eq!(result.response.status, 200);
    assert_eq!(result.response.body, json!({"id": 3}));
}

#[test]
fn test_detail_self_referential_organization() {
    let conn = civic_db(0);
    let result = detail(
        &conn,
        "organizations",
        "2",
        &[("fields", "name,parent.name,parent.children.name")],
    );

    assert_eq!(
        result.response.body,
        json!({
            "name": "Senate",
            "parent": {"name": "Parliament", "children": [{"name": "Senate"}]}
        })
    );
}

#[test]
fn test_detail_null_foreign_key() {
    let conn = civic_db(0);
    let result = detail(&conn, "organizations", "1", &[("fields", "parent.name")]);
    assert_eq!(result.response.body, json!({"parent": null}));
}
