use serde_json::json;
use time::macros::date;

use super::*;

fn keys(columns: &[ColumnDescriptor]) -> Vec<&str> {
    columns.iter().map(|c| c.key.as_str()).collect()
}

// =============================================================
// ColumnType
// =============================================================

#[test]
fn column_type_serde_lowercase() {
    assert_eq!(serde_json::to_string(&ColumnType::Boolean).unwrap(), "\"boolean\"");
    let back: ColumnType = serde_json::from_str("\"date\"").unwrap();
    assert_eq!(back, ColumnType::Date);
}

#[test]
fn column_type_from_str_accepts_aliases() {
    assert_eq!("Number".parse::<ColumnType>().unwrap(), ColumnType::Number);
    assert_eq!("bool".parse::<ColumnType>().unwrap(), ColumnType::Boolean);
    assert_eq!("text".parse::<ColumnType>().unwrap(), ColumnType::String);
}

#[test]
fn column_type_from_str_rejects_unknown() {
    let err = "money".parse::<ColumnType>().unwrap_err();
    assert!(err.to_string().contains("money"));
}

#[test]
fn column_type_defaults_for_new_rows() {
    let today = date!(2024 - 06 - 01);
    assert_eq!(ColumnType::String.default_value(today), json!(""));
    assert_eq!(ColumnType::Number.default_value(today), json!(0));
    assert_eq!(ColumnType::Boolean.default_value(today), json!(false));
    assert_eq!(ColumnType::Date.default_value(today), json!("2024-06-01"));
}

// =============================================================
// ColumnDescriptor
// =============================================================

#[test]
fn descriptor_deserializes_host_shape() {
    let column: ColumnDescriptor = serde_json::from_value(json!({
        "key": "cgst",
        "label": "CGST %",
        "type": "number",
        "isRequired": true,
        "isPercentage": true
    }))
    .unwrap();
    assert_eq!(column.kind, ColumnType::Number);
    assert!(column.is_editable);
    assert!(column.is_required);
    assert!(column.is_percentage);
    assert!(!column.is_currency);
    assert!(!column.fixed);
}

#[test]
fn sequence_column_is_fixed_and_read_only() {
    let column = ColumnDescriptor::sequence();
    assert!(column.fixed);
    assert!(!column.is_movable());
    assert!(!column.accepts_writes());
}

#[test]
fn read_only_column_is_movable_but_not_writable() {
    let column = ColumnDescriptor::new("total", "Total", ColumnType::Number).read_only();
    assert!(column.is_movable());
    assert!(!column.accepts_writes());
}

// =============================================================
// RowId / Row
// =============================================================

#[test]
fn local_ids_are_unsaved() {
    let id = RowId::local(1_700_000_000_000);
    assert_eq!(id.as_str(), "new-1700000000000");
    assert!(!id.is_persisted());
    assert!(RowId::new("42").is_persisted());
    assert!(!RowId::default().is_persisted());
}

#[test]
fn row_lifts_id_out_of_values() {
    let row: Row = serde_json::from_value(json!({"id": 7, "name": "Bolt", "qty": "3"})).unwrap();
    assert_eq!(row.id, RowId::new("7"));
    assert!(!row.values.contains_key("id"));
    assert_eq!(row.get("name"), &json!("Bolt"));
    assert!(!row.is_unsaved());
}

#[test]
fn row_without_id_is_unassigned() {
    let row: Row = serde_json::from_value(json!({"name": "Nut"})).unwrap();
    assert!(row.id.is_unassigned());
    assert!(row.is_unsaved());
}

#[test]
fn row_rejects_structured_id() {
    let result = serde_json::from_value::<Row>(json!({"id": {"nested": true}}));
    assert!(result.is_err());
}

#[test]
fn row_serializes_id_first() {
    let row = Row::new(RowId::new("9")).with("b", 2).with("a", 1);
    let text = serde_json::to_string(&row).unwrap();
    assert_eq!(text, r#"{"id":"9","b":2,"a":1}"#);
}

#[test]
fn row_get_missing_key_is_null() {
    let row = Row::default();
    assert_eq!(row.get("nothing"), &json!(null));
}

#[test]
fn row_set_reports_change() {
    let mut row = Row::default().with("qty", 1);
    assert!(!row.set("qty", json!(1)));
    assert!(row.set("qty", json!(2)));
    assert!(row.set("new", json!("x")));
}

#[test]
fn rows_from_json_reports_bad_element() {
    let err = rows_from_json(json!([{"a": 1}, 5])).unwrap_err();
    assert!(matches!(err, GridError::RowNotObject { index: 1 }));
    assert!(matches!(rows_from_json(json!({"a": 1})).unwrap_err(), GridError::RowsNotArray));
}

// =============================================================
// derive_columns
// =============================================================

#[test]
fn derive_prepends_sequence_to_config() {
    let config = vec![
        ColumnDescriptor::new("name", "Name", ColumnType::String),
        ColumnDescriptor::sequence(),
        ColumnDescriptor::new("age", "Age", ColumnType::Number),
    ];
    let columns = derive_columns(Some(&config), &[]);
    assert_eq!(keys(&columns), vec!["sno", "name", "age"]);
    assert!(columns[0].fixed);
}

#[test]
fn derive_dedups_config_keeping_first() {
    let config = vec![
        ColumnDescriptor::new("qty", "Qty", ColumnType::Number),
        ColumnDescriptor::new("qty", "Quantity", ColumnType::String),
    ];
    let columns = derive_columns(Some(&config), &[]);
    assert_eq!(keys(&columns), vec!["sno", "qty"]);
    assert_eq!(columns[1].label, "Qty");
    assert_eq!(columns[1].kind, ColumnType::Number);
}

#[test]
fn derive_infers_from_first_row_skipping_internal_keys() {
    let rows = rows_from_json(json!([
        {"id": 1, "_id": "x", "__saving": true, "description": "Bolt", "amount": 10, "sno": 1},
        {"id": 2, "other": "ignored"}
    ]))
    .unwrap();
    let columns = derive_columns(None, &rows);
    assert_eq!(keys(&columns), vec!["sno", "description", "amount"]);
    assert!(columns[1..].iter().all(|c| c.kind == ColumnType::String && c.is_editable));
}

#[test]
fn derive_with_nothing_has_only_sequence() {
    let columns = derive_columns(None, &[]);
    assert_eq!(keys(&columns), vec!["sno"]);
}

#[test]
fn derive_keeps_other_fixed_columns() {
    let mut pinned = ColumnDescriptor::new("code", "Code", ColumnType::String);
    pinned.fixed = true;
    let config = vec![pinned, ColumnDescriptor::new("qty", "Qty", ColumnType::Number)];
    let columns = derive_columns(Some(&config), &[]);
    assert_eq!(keys(&columns), vec!["sno", "code", "qty"]);
    assert!(!columns[1].is_movable());
}

// =============================================================
// Id round trip
// =============================================================

#[test]
fn numeric_ids_go_back_out_as_numbers() {
    let input = json!([{"id": 42, "name": "a"}, {"id": "abc-1", "name": "b"}, {"name": "c"}]);
    let rows = rows_from_json(input).unwrap();
    let output = serde_json::to_value(&rows).unwrap();
    assert_eq!(output, json!([{"id": 42, "name": "a"}, {"id": "abc-1", "name": "b"}, {"name": "c"}]));
}

#[test]
fn numeric_and_text_ids_name_the_same_row() {
    let numeric = RowId::from_json(&json!(42)).unwrap();
    assert_eq!(numeric, RowId::new("42"));
    assert_eq!(numeric.as_str(), "42");
    assert_eq!(numeric.to_json(), json!(42));
    assert_eq!(RowId::new("42").to_json(), json!("42"));
}

#[test]
fn row_id_deserializes_from_either_form() {
    let ids: Vec<RowId> = serde_json::from_value(json!([7, "x"])).unwrap();
    assert_eq!(serde_json::to_value(&ids).unwrap(), json!([7, "x"]));
}
