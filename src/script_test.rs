use serde_json::json;

use super::*;
use grid::config::GridConfig;
use grid::table::{ColumnDescriptor, ColumnType, RowId};

fn sample_grid() -> Grid<Tally> {
    let mut core = GridCore::default();
    core.set_columns(Some(vec![
        ColumnDescriptor::new("item", "Item", ColumnType::String).required(),
        ColumnDescriptor::new("qty", "Qty", ColumnType::Number),
    ]));
    core.load_rows(vec![
        Row::new(RowId::new("1")).with("item", "Pen").with("qty", 2),
        Row::new(RowId::new("2")).with("item", "Ink").with("qty", 5),
    ]);
    Grid::new(core, Tally::default())
}

#[test]
fn parses_tagged_steps() {
    let steps = parse_script(
        r#"[
            {"op": "click", "row": 0, "column": "qty"},
            {"op": "key", "key": "v", "modifiers": {"meta": true}},
            {"op": "page_size", "page_size": 25},
            {"op": "undo"}
        ]"#,
    )
    .unwrap();
    assert_eq!(steps.len(), 4);
    assert_eq!(steps[0], Step::Click { row: 0, column: "qty".into(), modifiers: Modifiers::default() });
    assert_eq!(steps[1], Step::Key { key: Key::new("v"), modifiers: Modifiers { meta: true, ..Default::default() } });
    assert_eq!(steps[2], Step::PageSize { page_size: 25 });
}

#[test]
fn unknown_op_is_rejected() {
    assert!(parse_script(r#"[{"op": "explode"}]"#).is_err());
}

#[test]
fn copy_paste_script_updates_rows() {
    let mut grid = sample_grid();
    let steps = parse_script(
        r#"[
            {"op": "click", "row": 0, "column": "qty"},
            {"op": "key", "key": "c", "modifiers": {"ctrl": true}},
            {"op": "click", "row": 1, "column": "qty"},
            {"op": "key", "key": "v", "modifiers": {"ctrl": true}}
        ]"#,
    )
    .unwrap();
    run_script(&mut grid, &steps);

    assert_eq!(grid.core.rows()[1].get("qty"), &json!(2));
    assert_eq!(grid.host.count("data_changed"), 1);
}

#[test]
fn drag_step_swaps_values() {
    let mut grid = sample_grid();
    let from = CellRef::new(0, "item");
    let to = CellRef::new(1, "item");
    run_script(&mut grid, &[Step::Drag { from, to }]);
    assert_eq!(grid.core.rows()[0].get("item"), &json!("Ink"));
    assert_eq!(grid.core.rows()[1].get("item"), &json!("Pen"));
}

#[test]
fn edit_then_undo_restores() {
    let mut grid = sample_grid();
    run_script(
        &mut grid,
        &[Step::Edit { row: 0, column: "item".into(), value: json!("") }, Step::Undo],
    );
    assert_eq!(grid.core.rows()[0].get("item"), &json!("Pen"));
    assert!(!grid.core.has_errors());
    assert_eq!(grid.host.count("data_changed"), 2);
}

#[test]
fn insert_step_is_counted() {
    let mut grid = sample_grid();
    run_script(&mut grid, &[Step::Insert, Step::Insert]);
    assert_eq!(grid.core.rows().len(), 3);
    assert_eq!(grid.host.count("unsaved_rows_changed"), 1);
    assert_eq!(grid.host.count("edit_requested"), 1);
}

#[test]
fn tally_serializes_as_flat_map() {
    let mut tally = Tally::default();
    tally.render();
    tally.render();
    assert_eq!(serde_json::to_value(&tally).unwrap(), json!({"render": 2}));
}

#[test]
fn config_defaults_apply_to_replays() {
    let grid = sample_grid();
    assert_eq!(grid.core.config, GridConfig::default());
}

#[test]
fn opening_a_session_tallies_load_notifications() {
    let columns = vec![ColumnDescriptor::new("item", "Item", ColumnType::String).required()];
    let rows = vec![Row::new(RowId::new("1")).with("item", "")];
    let grid = open_session(GridCore::default(), Some(columns), rows);

    assert!(grid.core.has_errors());
    assert_eq!(grid.host.count("validation_changed"), 2);
    assert_eq!(grid.host.count("unsaved_rows_changed"), 1);
    assert_eq!(grid.host.count("render"), 2);
}
