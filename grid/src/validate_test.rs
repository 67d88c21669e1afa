use serde_json::json;

use super::*;

fn name_column() -> ColumnDescriptor {
    ColumnDescriptor::new("name", "Name", ColumnType::String).required()
}

fn age_column() -> ColumnDescriptor {
    ColumnDescriptor::new("age", "Age", ColumnType::Number)
}

fn percent_column(key: &str) -> ColumnDescriptor {
    ColumnDescriptor::new(key, key.to_uppercase(), ColumnType::Number).percentage()
}

// =============================================================
// validate_cell
// =============================================================

#[test]
fn required_blank_fails() {
    assert_eq!(validate_cell(&name_column(), &json!("")), Some("Name is required".to_owned()));
    assert!(validate_cell(&name_column(), &json!(null)).is_some());
    assert!(validate_cell(&name_column(), &json!("Ann")).is_none());
}

#[test]
fn optional_blank_passes() {
    assert!(validate_cell(&age_column(), &json!("")).is_none());
}

#[test]
fn numeric_text_passes_number_column() {
    assert!(validate_cell(&age_column(), &json!("5")).is_none());
    assert!(validate_cell(&age_column(), &json!(5)).is_none());
}

#[test]
fn non_numeric_fails_number_column() {
    let msg = validate_cell(&age_column(), &json!("five")).unwrap();
    assert!(msg.contains("valid number"), "{msg}");
}

#[test]
fn date_column_requires_iso_literal() {
    let column = ColumnDescriptor::new("due", "Due", ColumnType::Date);
    assert!(validate_cell(&column, &json!("2024-05-01")).is_none());
    let msg = validate_cell(&column, &json!("05/01/2024")).unwrap();
    assert!(msg.contains("YYYY-MM-DD"), "{msg}");
    assert!(validate_cell(&column, &json!("whenever")).unwrap().contains("valid date"));
}

#[test]
fn boolean_column_checks_literals() {
    let column = ColumnDescriptor::new("paid", "Paid", ColumnType::Boolean);
    assert!(validate_cell(&column, &json!("yes")).is_none());
    assert!(validate_cell(&column, &json!("perhaps")).is_some());
}

#[test]
fn percentage_range_is_zero_to_hundred() {
    let column = percent_column("discount");
    assert!(validate_cell(&column, &json!("0")).is_none());
    assert!(validate_cell(&column, &json!(100)).is_none());
    assert!(validate_cell(&column, &json!("100.5")).is_some());
    assert!(validate_cell(&column, &json!("-1")).is_some());
    assert!(validate_cell(&column, &json!("ten")).is_some());
}

#[test]
fn gst_is_capped_at_28() {
    let column = percent_column("gst");
    assert!(validate_cell(&column, &json!("28")).is_none());
    let msg = validate_cell(&column, &json!("29")).unwrap();
    assert!(msg.contains("between 0 and 28"), "{msg}");
}

#[test]
fn split_gst_is_capped_at_14() {
    for key in ["cgst", "sgst"] {
        let column = percent_column(key);
        assert!(validate_cell(&column, &json!("9")).is_none());
        assert!(validate_cell(&column, &json!("14")).is_none());
        assert!(validate_cell(&column, &json!("15")).is_some());
    }
}

#[test]
fn required_percentage_blank_fails() {
    let column = percent_column("gst").required();
    assert!(validate_cell(&column, &json!("")).unwrap().contains("required"));
}

#[test]
fn label_falls_back_to_key() {
    let column = ColumnDescriptor::new("qty", "", ColumnType::Number).required();
    assert_eq!(validate_cell(&column, &json!("")).unwrap(), "qty is required");
}

// =============================================================
// validate_row / ValidationMap
// =============================================================

fn columns() -> Vec<ColumnDescriptor> {
    vec![ColumnDescriptor::sequence(), name_column(), age_column()]
}

#[test]
fn row_validation_skips_read_only_columns() {
    let cols = vec![ColumnDescriptor::sequence(), name_column().read_only()];
    let row = Row::default().with("name", "");
    assert!(validate_row(&row, &cols).is_empty());
}

#[test]
fn map_flags_required_missing_and_accepts_coercible() {
    let rows = vec![Row::default().with("name", "").with("age", "5")];
    let map = ValidationMap::compute(&rows, &columns());
    assert_eq!(map.error(0, "name"), Some("Name is required"));
    assert_eq!(map.error(0, "age"), None);
    assert!(map.has_errors());
    assert_eq!(map.error_count(), 1);
}

#[test]
fn revalidate_clears_fixed_cell_only() {
    let mut rows = vec![Row::default().with("name", "").with("age", "x")];
    let cols = columns();
    let mut map = ValidationMap::compute(&rows, &cols);
    assert_eq!(map.error_count(), 2);

    rows[0].set("name", json!("Ann"));
    map.revalidate_row(0, &rows[0], &cols);
    assert_eq!(map.error(0, "name"), None);
    assert!(map.error(0, "age").is_some());
}

#[test]
fn clean_row_has_no_entry() {
    let rows = vec![Row::default().with("name", "Ann")];
    let map = ValidationMap::compute(&rows, &columns());
    assert!(!map.has_errors());
    assert!(map.row_errors(0).is_none());
}

#[test]
fn swap_rows_moves_entries() {
    let rows = vec![Row::default().with("name", ""), Row::default().with("name", "Ann")];
    let mut map = ValidationMap::compute(&rows, &columns());
    map.swap_rows(0, 1);
    assert!(map.row_errors(0).is_none());
    assert!(map.error(1, "name").is_some());
    assert_eq!(map.iter().map(|(index, _)| index).collect::<Vec<_>>(), vec![1]);
}
