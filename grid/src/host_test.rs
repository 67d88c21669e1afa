use serde_json::json;
use time::macros::date;

use super::*;
use crate::clock::FixedClock;
use crate::config::GridConfig;
use crate::table::ColumnType;

#[derive(Default)]
struct Recorder {
    events: Vec<String>,
    last_rows: usize,
}

impl GridHost for Recorder {
    fn data_changed(&mut self, rows: &[Row]) {
        self.last_rows = rows.len();
        self.events.push("data".into());
    }

    fn validation_changed(&mut self, has_errors: bool) {
        self.events.push(format!("valid:{}", !has_errors));
    }

    fn unsaved_rows_changed(&mut self, has_unsaved: bool) {
        self.events.push(format!("unsaved:{has_unsaved}"));
    }

    fn page_changed(&mut self, page: usize) {
        self.events.push(format!("page:{page}"));
    }

    fn edit_requested(&mut self, cell: &CellRef) {
        self.events.push(format!("edit:{}:{}", cell.row, cell.column));
    }

    fn refresh_requested(&mut self) {
        self.events.push("refresh".into());
    }

    fn render(&mut self) {
        self.events.push("render".into());
    }
}

fn grid() -> Grid<Recorder> {
    let clock = FixedClock { now_ms: 1, today: date!(2024 - 01 - 01) };
    let core = GridCore::with_clock(GridConfig::default(), Box::new(clock));
    let mut grid = Grid::new(core, Recorder::default());
    grid.set_columns(Some(vec![ColumnDescriptor::new("item", "Item", ColumnType::String).required()]));
    grid.load_rows(vec![Row::new(RowId::new("1")).with("item", "Pen")]);
    grid.host.events.clear();
    grid
}

#[test]
fn edit_notifies_in_action_order() {
    let mut grid = grid();
    grid.set_cell(&CellRef::new(0, "item"), json!(""));
    assert_eq!(grid.host.events, vec!["data", "valid:false", "render"]);
    assert_eq!(grid.host.last_rows, 1);
}

#[test]
fn undo_at_start_fires_nothing() {
    let mut grid = grid();
    grid.undo();
    assert!(grid.host.events.is_empty());
}

#[test]
fn insert_reports_unsaved_and_requests_editor() {
    let mut grid = grid();
    grid.insert_row();
    assert!(grid.host.events.contains(&"unsaved:true".to_owned()));
    assert!(grid.host.events.contains(&"edit:1:item".to_owned()));
    assert_eq!(grid.host.last_rows, 2);
}

#[test]
fn unhandled_callbacks_default_to_noop() {
    let mut grid = grid();
    grid.set_search("pen");
    assert_eq!(grid.host.events, vec!["render"]);
}

#[test]
fn dispatch_works_on_bare_host() {
    let mut host = Recorder::default();
    dispatch(&mut host, vec![Action::RefreshRequested, Action::PageChanged { page: 2 }]);
    assert_eq!(host.events, vec!["refresh", "page:2"]);
}

#[test]
fn clipboard_and_edit_operations_are_forwarded() {
    let mut grid = grid();
    grid.load_rows(vec![
        Row::new(RowId::new("1")).with("item", "Pen"),
        Row::new(RowId::new("2")).with("item", "Ink"),
    ]);
    grid.host.events.clear();

    grid.select(CellRef::new(0, "item"));
    grid.copy();
    grid.select(CellRef::new(1, "item"));
    grid.paste();
    assert_eq!(grid.core.rows()[1].get("item"), &json!("Pen"));

    grid.begin_edit(CellRef::new(0, "item"));
    grid.core.update_draft("Cap");
    grid.commit_edit();
    assert_eq!(grid.core.rows()[0].get("item"), &json!("Cap"));
    assert!(grid.host.events.contains(&"edit:0:item".to_owned()));
    assert_eq!(grid.host.events.iter().filter(|e| *e == "data").count(), 2);
}
