//! Scripted grid sessions for the `replay` subcommand.
//!
//! A script is a JSON array of steps, each tagged by `op`:
//!
//! ```json
//! [
//!   { "op": "click", "row": 0, "column": "qty" },
//!   { "op": "key", "key": "c", "modifiers": { "ctrl": true } },
//!   { "op": "edit", "row": 1, "column": "qty", "value": "4" },
//!   { "op": "drag", "from": { "row": 0, "column": "qty" }, "to": { "row": 2, "column": "qty" } },
//!   { "op": "undo" }
//! ]
//! ```

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use std::collections::BTreeMap;

use grid::GridCore;
use grid::host::{Grid, GridHost};
use grid::input::{Key, Modifiers};
use grid::selection::CellRef;
use grid::table::{ColumnDescriptor, Row};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One user interaction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Click {
        row: usize,
        column: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Key {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// Type `value` into a cell and commit it.
    Edit { row: usize, column: String, value: Value },
    Drag { from: CellRef, to: CellRef },
    Insert,
    Undo,
    Redo,
    Page { page: usize },
    PageSize { page_size: usize },
    Search { term: String },
}

/// Parse a JSON step list.
///
/// # Errors
///
/// Returns the `serde_json` error for malformed JSON or an unknown `op`.
pub fn parse_script(raw: &str) -> Result<Vec<Step>, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Wrap `core` in a counting host and load the table through it, so load
/// notifications are tallied like every later step.
pub fn open_session(core: GridCore, columns: Option<Vec<ColumnDescriptor>>, rows: Vec<Row>) -> Grid<Tally> {
    let mut grid = Grid::new(core, Tally::default());
    grid.set_columns(columns);
    grid.load_rows(rows);
    grid
}

/// Apply `steps` in order.
pub fn run_script<H: GridHost>(grid: &mut Grid<H>, steps: &[Step]) {
    for (index, step) in steps.iter().enumerate() {
        tracing::debug!(index, ?step, "replay step");
        apply(grid, step.clone());
    }
    tracing::info!(steps = steps.len(), rows = grid.core.rows().len(), "replay finished");
}

fn apply<H: GridHost>(grid: &mut Grid<H>, step: Step) {
    match step {
        Step::Click { row, column, modifiers } => grid.on_cell_click(CellRef::new(row, column), modifiers),
        Step::Key { key, modifiers } => grid.on_key_down(&key, modifiers),
        Step::Edit { row, column, value } => grid.set_cell(&CellRef::new(row, column), value),
        Step::Drag { from, to } => {
            grid.on_drag_start(from);
            grid.on_drag_over(to.clone());
            grid.on_drop(to);
        }
        Step::Insert => grid.insert_row(),
        Step::Undo => grid.undo(),
        Step::Redo => grid.redo(),
        Step::Page { page } => grid.set_page(page),
        Step::PageSize { page_size } => grid.set_page_size(page_size),
        Step::Search { term } => grid.set_search(&term),
    }
}

/// Host that counts notifications by kind.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct Tally {
    counts: BTreeMap<&'static str, usize>,
}

impl Tally {
    fn bump(&mut self, kind: &'static str) {
        *self.counts.entry(kind).or_default() += 1;
    }

    /// Times `kind` was notified.
    #[must_use]
    pub fn count(&self, kind: &str) -> usize {
        self.counts.get(kind).copied().unwrap_or(0)
    }
}

impl GridHost for Tally {
    fn data_changed(&mut self, _rows: &[Row]) {
        self.bump("data_changed");
    }

    fn validation_changed(&mut self, _has_errors: bool) {
        self.bump("validation_changed");
    }

    fn unsaved_rows_changed(&mut self, _has_unsaved: bool) {
        self.bump("unsaved_rows_changed");
    }

    fn page_changed(&mut self, _page: usize) {
        self.bump("page_changed");
    }

    fn page_size_changed(&mut self, _page_size: usize) {
        self.bump("page_size_changed");
    }

    fn search_changed(&mut self, _term: &str) {
        self.bump("search_changed");
    }

    fn refresh_requested(&mut self) {
        self.bump("refresh_requested");
    }

    fn edit_requested(&mut self, _cell: &CellRef) {
        self.bump("edit_requested");
    }

    fn render(&mut self) {
        self.bump("render");
    }
}
