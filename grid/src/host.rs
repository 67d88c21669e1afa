//! Host-side observer for grid actions.
//!
//! [`GridCore`] only returns actions. A page that prefers callbacks
//! implements [`GridHost`] and wraps its core in a [`Grid`], which forwards
//! every operation's actions to the host as they happen.

#[cfg(test)]
#[path = "host_test.rs"]
mod host_test;

use serde_json::Value;

use crate::engine::{Action, GridCore};
use crate::input::{Key, Modifiers};
use crate::selection::{CellRef, Direction};
use crate::table::{ColumnDescriptor, Row, RowId};

/// Receiver for grid notifications. Every method defaults to doing nothing.
pub trait GridHost {
    /// The table changed; `rows` is the complete new row set.
    fn data_changed(&mut self, _rows: &[Row]) {}

    /// Whether any cell currently fails validation.
    fn validation_changed(&mut self, _has_errors: bool) {}

    /// Whether any row is still waiting for its first save.
    fn unsaved_rows_changed(&mut self, _has_unsaved: bool) {}

    fn page_changed(&mut self, _page: usize) {}

    fn page_size_changed(&mut self, _page_size: usize) {}

    fn search_changed(&mut self, _term: &str) {}

    fn refresh_requested(&mut self) {}

    /// Focus an input over `cell`.
    fn edit_requested(&mut self, _cell: &CellRef) {}

    fn render(&mut self) {}
}

/// Deliver `actions` to `host` in order.
pub fn dispatch<H: GridHost + ?Sized>(host: &mut H, actions: Vec<Action>) {
    for action in actions {
        match action {
            Action::DataChanged(rows) => host.data_changed(&rows),
            Action::ValidationChanged { has_errors } => host.validation_changed(has_errors),
            Action::UnsavedRowsChanged { has_unsaved } => host.unsaved_rows_changed(has_unsaved),
            Action::PageChanged { page } => host.page_changed(page),
            Action::PageSizeChanged { page_size } => host.page_size_changed(page_size),
            Action::SearchChanged { term } => host.search_changed(&term),
            Action::RefreshRequested => host.refresh_requested(),
            Action::EditCellRequested { cell } => host.edit_requested(&cell),
            Action::RenderNeeded => host.render(),
        }
    }
}

/// A [`GridCore`] bound to the host that observes it.
pub struct Grid<H: GridHost> {
    pub core: GridCore,
    pub host: H,
}

impl<H: GridHost> Grid<H> {
    pub fn new(core: GridCore, host: H) -> Self {
        Self { core, host }
    }

    fn emit(&mut self, actions: Vec<Action>) {
        dispatch(&mut self.host, actions);
    }

    // --- Delegated operations ---

    pub fn load_rows(&mut self, rows: Vec<Row>) {
        let actions = self.core.load_rows(rows);
        self.emit(actions);
    }

    pub fn set_columns(&mut self, columns: Option<Vec<ColumnDescriptor>>) {
        let actions = self.core.set_columns(columns);
        self.emit(actions);
    }

    pub fn on_cell_click(&mut self, cell: CellRef, modifiers: Modifiers) {
        let actions = self.core.on_cell_click(cell, modifiers);
        self.emit(actions);
    }

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) {
        let actions = self.core.on_key_down(key, modifiers);
        self.emit(actions);
    }

    pub fn select(&mut self, cell: CellRef) {
        let actions = self.core.select(cell);
        self.emit(actions);
    }

    pub fn toggle(&mut self, cell: CellRef) {
        let actions = self.core.toggle(cell);
        self.emit(actions);
    }

    pub fn copy(&mut self) {
        let actions = self.core.copy();
        self.emit(actions);
    }

    pub fn paste(&mut self) {
        let actions = self.core.paste();
        self.emit(actions);
    }

    pub fn shift_content(&mut self, direction: Direction) {
        let actions = self.core.shift_content(direction);
        self.emit(actions);
    }

    pub fn reorder(&mut self, direction: Direction) {
        let actions = self.core.reorder(direction);
        self.emit(actions);
    }

    pub fn on_drag_start(&mut self, cell: CellRef) {
        let actions = self.core.on_drag_start(cell);
        self.emit(actions);
    }

    pub fn on_drag_over(&mut self, cell: CellRef) {
        let actions = self.core.on_drag_over(cell);
        self.emit(actions);
    }

    pub fn on_drop(&mut self, target: CellRef) {
        let actions = self.core.on_drop(target);
        self.emit(actions);
    }

    pub fn on_drag_end(&mut self) {
        let actions = self.core.on_drag_end();
        self.emit(actions);
    }

    pub fn begin_edit(&mut self, cell: CellRef) {
        let actions = self.core.begin_edit(cell);
        self.emit(actions);
    }

    pub fn commit_edit(&mut self) {
        let actions = self.core.commit_edit();
        self.emit(actions);
    }

    pub fn cancel_edit(&mut self) {
        let actions = self.core.cancel_edit();
        self.emit(actions);
    }

    pub fn set_cell(&mut self, cell: &CellRef, value: Value) {
        let actions = self.core.set_cell(cell, value);
        self.emit(actions);
    }

    pub fn insert_row(&mut self) {
        let actions = self.core.insert_row();
        self.emit(actions);
    }

    pub fn undo(&mut self) {
        let actions = self.core.undo();
        self.emit(actions);
    }

    pub fn redo(&mut self) {
        let actions = self.core.redo();
        self.emit(actions);
    }

    pub fn complete_save(&mut self, id: &RowId, persisted: RowId) {
        let actions = self.core.complete_save(id, persisted);
        self.emit(actions);
    }

    pub fn fail_save(&mut self, id: &RowId, reason: &str) {
        let actions = self.core.fail_save(id, reason);
        self.emit(actions);
    }

    pub fn set_page(&mut self, page: usize) {
        let actions = self.core.set_page(page);
        self.emit(actions);
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        let actions = self.core.set_page_size(page_size);
        self.emit(actions);
    }

    pub fn set_search(&mut self, term: &str) {
        let actions = self.core.set_search(term);
        self.emit(actions);
    }

    pub fn refresh(&mut self) {
        let actions = self.core.refresh();
        self.emit(actions);
    }
}
