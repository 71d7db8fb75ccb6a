// tests/builder_tests.rs

use rowql::{Direction, Predicate, Record, Selection, Value, record_from_json, record_to_json};
use serde_json::json;

fn records(values: serde_json::Value) -> Vec<Record> {
    values
        .as_array()
        .expect("test data is an array")
        .iter()
        .map(|v| record_from_json(v.clone()).expect("test rows are objects"))
        .collect()
}

fn to_json(rows: Vec<Record>) -> serde_json::Value {
    serde_json::Value::Array(rows.into_iter().map(record_to_json).collect())
}

fn people() -> Vec<Record> {
    records(json!([
        {"name": "Ann", "age": 31, "city": "Oslo"},
        {"name": "bob", "age": 19, "city": "Rome"},
        {"name": "Cid", "age": 45, "city": "Oslo"},
        {"name": "Dee", "age": 27},
        {"name": "Eve", "age": 38, "city": "Rome"}
    ]))
}

#[test]
fn test_empty_selection_returns_everything() {
    let data = people();
    assert_eq!(Selection::new().apply(&data), data);
}

#[test]
fn test_filters_are_combined_with_and() {
    let data = people();
    let result = Selection::new()
        .filter(Predicate::compare("age", ">", 25i64).unwrap())
        .filter(Predicate::compare("city", "=", "Oslo").unwrap())
        .select(["name"])
        .apply(&data);
    assert_eq!(to_json(result), json!([{"name": "Ann"}, {"name": "Cid"}]));
}

#[test]
fn test_where_text() {
    let data = people();
    let result = Selection::new()
        .where_text("city = 'Rome' OR age < 28")
        .unwrap()
        .select(["name"])
        .apply(&data);
    assert_eq!(
        to_json(result),
        json!([{"name": "bob"}, {"name": "Dee"}, {"name": "Eve"}])
    );

    assert!(Selection::new().where_text("age >").is_err());
}

#[test]
fn test_order_skip_limit() {
    let data = people();
    let result = Selection::new()
        .order_by("age", Direction::Desc)
        .skip(1)
        .limit(2)
        .select(["name", "age"])
        .apply(&data);
    assert_eq!(
        to_json(result),
        json!([{"name": "Eve", "age": 38}, {"name": "Ann", "age": 31}])
    );
}

#[test]
fn test_skip_past_the_end() {
    let data = people();
    assert!(Selection::new().skip(10).apply(&data).is_empty());
}

#[test]
fn test_secondary_order_key() {
    let data = people();
    let result = Selection::new()
        .order_by("city", Direction::Asc)
        .order_by("name", Direction::Desc)
        .select(["name"])
        .apply(&data);
    assert_eq!(
        to_json(result),
        json!([
            {"name": "Dee"},
            {"name": "Cid"},
            {"name": "Ann"},
            {"name": "Eve"},
            {"name": "bob"}
        ])
    );
}

#[test]
fn test_select_missing_field_is_null() {
    let data = people();
    let result = Selection::new()
        .where_text("name = 'Dee'")
        .unwrap()
        .select(["name", "city"])
        .apply(&data);
    assert_eq!(result[0]["city"], Value::Null);
}

#[test]
fn test_select_star_keeps_whole_row() {
    let data = people();
    let result = Selection::new()
        .where_text("name = 'Ann'")
        .unwrap()
        .select(["*"])
        .apply(&data);
    assert_eq!(result, vec![data[0].clone()]);

    let result = Selection::new()
        .where_text("name = 'Dee'")
        .unwrap()
        .select(["*", "city"])
        .apply(&data);
    assert_eq!(
        to_json(result),
        json!([{"name": "Dee", "age": 27, "city": null}])
    );
}

#[test]
fn test_selection_is_reusable() {
    let data = people();
    let adults = Selection::new().filter(Predicate::compare("age", ">=", 30i64).unwrap());
    let first = adults.clone().limit(1);

    assert_eq!(adults.apply(&data).len(), 3);
    assert_eq!(first.apply(&data).len(), 1);
    assert_eq!(adults.apply(&data).len(), 3);
}
