//! The grid controller.
//!
//! [`GridCore`] owns the complete table state (columns, rows, validation,
//! history, selection, clipboard, paging, drag/edit state) and exposes one
//! method per user interaction. Each method mutates the state synchronously
//! and returns the [`Action`]s the host must act on: hand the new rows to
//! the page, gate the save button, fetch another server page, and so on.
//!
//! All cell references coming in are page-relative; every data access goes
//! through [`GridCore::to_absolute`] first.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::collections::HashSet;

use serde_json::Value;

use crate::clock::{Clock, SystemClock};
use crate::coerce::{can_convert, convert, text};
use crate::config::GridConfig;
use crate::consts::{CGST_KEY, SGST_KEY};
use crate::history::History;
use crate::input::{InputState, Key, Modifiers};
use crate::page::{PaginationMode, Pager};
use crate::selection::{CellRef, Clipboard, Direction, Selection, neighbor};
use crate::table::{ColumnDescriptor, ColumnType, Row, RowId, derive_columns};
use crate::validate::ValidationMap;

/// Actions returned from grid operations for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A committed mutation changed the table. Carries the full row set.
    DataChanged(Vec<Row>),
    /// Validation was recomputed.
    ValidationChanged { has_errors: bool },
    /// The presence of unsaved rows may have changed.
    UnsavedRowsChanged { has_unsaved: bool },
    /// The current page changed. In remote mode the host must fetch it.
    PageChanged { page: usize },
    /// The page size changed. In remote mode the host must refetch.
    PageSizeChanged { page_size: usize },
    /// The search term changed. In remote mode the host must refetch.
    SearchChanged { term: String },
    /// The user asked for fresh data.
    RefreshRequested,
    /// Open an input for this cell and focus it.
    EditCellRequested { cell: CellRef },
    /// Visible state changed; redraw.
    RenderNeeded,
}

/// Grid state and operations.
pub struct GridCore {
    pub config: GridConfig,
    pub selection: Selection,
    pub input: InputState,
    column_config: Option<Vec<ColumnDescriptor>>,
    columns: Vec<ColumnDescriptor>,
    rows: Vec<Row>,
    errors: ValidationMap,
    history: History<Vec<Row>>,
    clipboard: Option<Clipboard>,
    pager: Pager,
    search: String,
    view: Vec<usize>,
    saving: HashSet<RowId>,
    clock: Box<dyn Clock>,
}

impl Default for GridCore {
    fn default() -> Self {
        Self::new(GridConfig::default())
    }
}

impl GridCore {
    #[must_use]
    pub fn new(config: GridConfig) -> Self {
        Self::with_clock(config, Box::new(SystemClock))
    }

    /// Build an engine that reads time from `clock`.
    #[must_use]
    pub fn with_clock(config: GridConfig, clock: Box<dyn Clock>) -> Self {
        let pager = Pager::new(config.pagination, config.effective_page_size());
        let history = History::new(Vec::new(), config.history_limit);
        Self {
            config,
            selection: Selection::default(),
            input: InputState::Idle,
            column_config: None,
            columns: derive_columns(None, &[]),
            rows: Vec::new(),
            errors: ValidationMap::default(),
            history,
            clipboard: None,
            pager,
            search: String::new(),
            view: Vec::new(),
            saving: HashSet::new(),
            clock,
        }
    }

    // --- Data inputs ---

    /// Replace the table with rows from the host and reset history.
    ///
    /// Rows without an id get a synthetic `new-<millis>` id and count as
    /// unsaved. In local paging mode the grid returns to the first page.
    pub fn load_rows(&mut self, rows: Vec<Row>) -> Vec<Action> {
        self.rows = rows;
        self.assign_local_ids();
        self.columns = derive_columns(self.column_config.as_deref(), &self.rows);
        self.errors = ValidationMap::compute(&self.rows, &self.columns);
        self.history.reset(self.rows.clone());
        self.selection.clear();
        self.input = InputState::Idle;
        if self.pager.mode == PaginationMode::Local {
            self.pager.page = 0;
        }
        self.rebuild_view();

        tracing::info!(
            rows = self.rows.len(),
            columns = self.columns.len(),
            errors = self.errors.error_count(),
            "grid loaded"
        );

        vec![
            Action::ValidationChanged { has_errors: self.errors.has_errors() },
            Action::UnsavedRowsChanged { has_unsaved: self.has_unsaved_rows() },
            Action::RenderNeeded,
        ]
    }

    /// Set or clear the explicit column configuration.
    pub fn set_columns(&mut self, config: Option<Vec<ColumnDescriptor>>) -> Vec<Action> {
        self.column_config = config;
        self.columns = derive_columns(self.column_config.as_deref(), &self.rows);
        self.errors = ValidationMap::compute(&self.rows, &self.columns);

        let movable = self.movable_keys();
        let kept: Vec<CellRef> = self.selection.cells().iter().filter(|c| movable.contains(&c.column)).cloned().collect();
        let anchor = self.selection.anchor().filter(|c| movable.contains(&c.column)).cloned();
        self.selection.replace(kept, anchor);

        vec![Action::ValidationChanged { has_errors: self.errors.has_errors() }, Action::RenderNeeded]
    }

    // --- Pointer input ---

    /// Plain click selects one cell; Ctrl/Cmd-click toggles it.
    pub fn on_cell_click(&mut self, cell: CellRef, modifiers: Modifiers) -> Vec<Action> {
        if !self.is_selectable(&cell) {
            return Vec::new();
        }
        let mut actions = Vec::new();
        if self.input.editing_cell().is_some_and(|editing| *editing != cell) {
            actions.extend(self.commit_edit());
        }
        if modifiers.command() {
            actions.extend(self.toggle(cell));
        } else {
            actions.extend(self.select(cell));
        }
        actions
    }

    /// Begin dragging `cell`.
    pub fn on_drag_start(&mut self, cell: CellRef) -> Vec<Action> {
        if !self.config.editable || !self.is_selectable(&cell) {
            return Vec::new();
        }
        self.input = InputState::Dragging { source: cell, over: None };
        vec![Action::RenderNeeded]
    }

    /// Track the cell under the pointer during a drag.
    pub fn on_drag_over(&mut self, cell: CellRef) -> Vec<Action> {
        let selectable = self.is_selectable(&cell);
        let InputState::Dragging { source, over } = &mut self.input else {
            return Vec::new();
        };
        let next = (selectable && *source != cell).then_some(cell);
        if *over == next {
            return Vec::new();
        }
        *over = next;
        vec![Action::RenderNeeded]
    }

    /// Drop the dragged cell onto `target`, exchanging the two values.
    pub fn on_drop(&mut self, target: CellRef) -> Vec<Action> {
        let InputState::Dragging { source, .. } = std::mem::take(&mut self.input) else {
            return Vec::new();
        };
        if source == target || !self.is_selectable(&target) {
            return vec![Action::RenderNeeded];
        }
        let Some(touched) = self.exchange(&source, &target) else {
            return vec![Action::RenderNeeded];
        };
        self.selection.select_only(target);
        if touched.is_empty() {
            return vec![Action::RenderNeeded];
        }
        self.commit_rows(&touched)
    }

    /// Abandon a drag without dropping.
    pub fn on_drag_end(&mut self) -> Vec<Action> {
        if self.input.drag_source().is_none() {
            return Vec::new();
        }
        self.input = InputState::Idle;
        vec![Action::RenderNeeded]
    }

    // --- Keyboard input ---

    /// Route a key press to the matching grid operation.
    ///
    /// | Keys | Operation |
    /// |------|-----------|
    /// | Ctrl/Cmd+C, Ctrl/Cmd+V | [`copy`](Self::copy), [`paste`](Self::paste) |
    /// | Ctrl/Cmd+Z, Ctrl/Cmd+Shift+Z, Ctrl/Cmd+Y | [`undo`](Self::undo), [`redo`](Self::redo) |
    /// | Ctrl/Cmd+Arrow | [`extend_selection`](Self::extend_selection) |
    /// | Shift+Arrow | [`shift_content`](Self::shift_content) |
    /// | Alt+Arrow | [`reorder`](Self::reorder) |
    /// | Arrow | [`move_selection`](Self::move_selection) |
    /// | Enter, F2 | [`begin_edit`](Self::begin_edit) on the anchor |
    /// | Escape | cancel edit, else clear selection |
    ///
    /// While a cell is being edited only Enter, Tab and Escape are handled.
    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        if self.input.editing_cell().is_some() {
            return match key.0.as_str() {
                "Enter" | "Tab" => self.commit_edit(),
                "Escape" => self.cancel_edit(),
                _ => Vec::new(),
            };
        }

        let direction = Direction::from_key(key);

        if modifiers.command() {
            if key.is_letter('c') {
                return self.copy();
            }
            if key.is_letter('v') {
                return self.paste();
            }
            if key.is_letter('z') {
                return if modifiers.shift { self.redo() } else { self.undo() };
            }
            if key.is_letter('y') {
                return self.redo();
            }
            return direction.map_or_else(Vec::new, |dir| self.extend_selection(dir));
        }

        if let Some(dir) = direction {
            if modifiers.alt {
                return self.reorder(dir);
            }
            if modifiers.shift {
                return self.shift_content(dir);
            }
            return self.move_selection(dir);
        }

        match key.0.as_str() {
            "Enter" | "F2" => match self.selection.anchor().cloned() {
                Some(cell) => self.begin_edit(cell),
                None => Vec::new(),
            },
            "Escape" if !self.selection.is_empty() => {
                self.selection.clear();
                vec![Action::RenderNeeded]
            }
            _ => Vec::new(),
        }
    }

    // --- Selection ---

    /// Make `cell` the only selected cell.
    pub fn select(&mut self, cell: CellRef) -> Vec<Action> {
        if !self.is_selectable(&cell) {
            return Vec::new();
        }
        self.selection.select_only(cell);
        vec![Action::RenderNeeded]
    }

    /// Add `cell` to the selection, or remove it if already selected.
    pub fn toggle(&mut self, cell: CellRef) -> Vec<Action> {
        if !self.is_selectable(&cell) {
            return Vec::new();
        }
        self.selection.toggle(cell);
        vec![Action::RenderNeeded]
    }

    /// Add the anchor's neighbor in `direction` to the selection.
    pub fn extend_selection(&mut self, direction: Direction) -> Vec<Action> {
        let Some(target) = self.anchor_neighbor(direction) else {
            return Vec::new();
        };
        self.selection.extend(target);
        vec![Action::RenderNeeded]
    }

    /// Move a single-cell selection to the anchor's neighbor.
    pub fn move_selection(&mut self, direction: Direction) -> Vec<Action> {
        let Some(target) = self.anchor_neighbor(direction) else {
            return Vec::new();
        };
        self.selection.select_only(target);
        vec![Action::RenderNeeded]
    }

    fn anchor_neighbor(&self, direction: Direction) -> Option<CellRef> {
        let anchor = self.selection.anchor()?;
        neighbor(anchor, direction, self.page_len(), &self.movable_keys())
    }

    // --- Clipboard ---

    /// Copy the value of the single selected cell.
    pub fn copy(&mut self) -> Vec<Action> {
        if self.selection.len() != 1 {
            return Vec::new();
        }
        let Some(cell) = self.selection.first().cloned() else {
            return Vec::new();
        };
        let Some(value) = self.cell_value(&cell).cloned() else {
            return Vec::new();
        };
        tracing::debug!(row = cell.row, column = %cell.column, "cell copied");
        self.clipboard = Some(Clipboard { cell, value });
        vec![Action::RenderNeeded]
    }

    /// Write the clipboard value into every selected cell.
    ///
    /// Each target gets the value converted to its own column type. Targets
    /// that are read-only, or whose type cannot hold the value, keep their
    /// current value.
    pub fn paste(&mut self) -> Vec<Action> {
        let Some(clip) = self.clipboard.clone() else {
            return Vec::new();
        };
        if !self.config.editable {
            return Vec::new();
        }

        let mut touched = Vec::new();
        for cell in self.selection.cells().to_vec() {
            let Some(abs) = self.to_absolute(cell.row) else {
                continue;
            };
            let Some(kind) = self.writable_kind(&cell.column) else {
                continue;
            };
            if !can_convert(&clip.value, kind) {
                continue;
            }
            if self.write_cell(abs, &cell.column, convert(&clip.value, kind)) {
                touched.push(abs);
            }
        }

        if touched.is_empty() {
            return Vec::new();
        }
        self.commit_rows(&touched)
    }

    /// The copied cell, if any.
    #[must_use]
    pub fn clipboard(&self) -> Option<&Clipboard> {
        self.clipboard.as_ref()
    }

    // --- Moves ---

    /// Swap every selected cell's value with its neighbor in `direction`,
    /// then move the selection onto those neighbors.
    ///
    /// The selection moves as a block: if any selected cell has no writable
    /// neighbor, nothing moves. Cells are swapped farthest-first along the
    /// direction, so adjacent selected cells carry their own values.
    pub fn shift_content(&mut self, direction: Direction) -> Vec<Action> {
        if !self.config.editable || self.selection.is_empty() {
            return Vec::new();
        }
        let page_len = self.page_len();
        let movable = self.movable_keys();

        let mut pairs = Vec::with_capacity(self.selection.len());
        for cell in self.selection.cells() {
            let Some(target) = neighbor(cell, direction, page_len, &movable) else {
                return Vec::new();
            };
            if self.writable_kind(&cell.column).is_none() || self.writable_kind(&target.column).is_none() {
                return Vec::new();
            }
            pairs.push((cell.clone(), target));
        }

        let column_of = |cell: &CellRef| movable.iter().position(|key| *key == cell.column).unwrap_or(0);
        let mut order: Vec<usize> = (0..pairs.len()).collect();
        match direction {
            Direction::Down => order.sort_by_key(|&i| std::cmp::Reverse(pairs[i].0.row)),
            Direction::Up => order.sort_by_key(|&i| pairs[i].0.row),
            Direction::Right => order.sort_by_key(|&i| std::cmp::Reverse(column_of(&pairs[i].0))),
            Direction::Left => order.sort_by_key(|&i| column_of(&pairs[i].0)),
        }

        let mut touched = Vec::new();
        for i in order {
            let (cell, target) = &pairs[i];
            if let Some(rows) = self.exchange(cell, target) {
                touched.extend(rows);
            }
        }

        let anchor = self
            .selection
            .anchor()
            .map(|anchor| pairs.iter().find(|(cell, _)| cell == anchor).map_or_else(|| anchor.clone(), |(_, t)| t.clone()));
        self.selection.replace(pairs.into_iter().map(|(_, target)| target).collect(), anchor);

        if touched.is_empty() {
            return vec![Action::RenderNeeded];
        }
        self.commit_rows(&touched)
    }

    /// Move the first selected cell's row (up/down) or column (left/right).
    ///
    /// Rows swap places in the data. Columns keep their place in the header
    /// and swap values cell by cell, each converted to the other column's
    /// type. The selection follows the moved row or column.
    pub fn reorder(&mut self, direction: Direction) -> Vec<Action> {
        if !self.config.editable {
            return Vec::new();
        }
        let Some(first) = self.selection.first().cloned() else {
            return Vec::new();
        };
        let Some(target) = neighbor(&first, direction, self.page_len(), &self.movable_keys()) else {
            return Vec::new();
        };

        if direction.is_vertical() {
            let (Some(a), Some(b)) = (self.to_absolute(first.row), self.to_absolute(target.row)) else {
                return Vec::new();
            };
            self.rows.swap(a, b);
            self.errors.swap_rows(a, b);
            self.selection.select_only(target);
            tracing::debug!(from = a, to = b, "row moved");
            return self.commit_rows(&[]);
        }

        let (Some(kind_a), Some(kind_b)) = (self.writable_kind(&first.column), self.writable_kind(&target.column))
        else {
            return Vec::new();
        };
        let mut changed = false;
        for row in &mut self.rows {
            let va = row.get(&first.column).clone();
            let vb = row.get(&target.column).clone();
            let (new_a, new_b) = exchanged(&va, kind_a, &vb, kind_b);
            changed |= row.set(&first.column, new_a);
            changed |= row.set(&target.column, new_b);
        }
        tracing::debug!(from = %first.column, to = %target.column, "column values moved");
        self.selection.select_only(target);

        if !changed {
            return vec![Action::RenderNeeded];
        }
        self.errors = ValidationMap::compute(&self.rows, &self.columns);
        self.commit_rows(&[])
    }

    /// Exchange two cells' values with paired coercion.
    ///
    /// Returns `None` when either cell cannot be written, otherwise the
    /// absolute rows whose data changed (possibly none).
    fn exchange(&mut self, a: &CellRef, b: &CellRef) -> Option<Vec<usize>> {
        if !self.config.editable {
            return None;
        }
        let abs_a = self.to_absolute(a.row)?;
        let abs_b = self.to_absolute(b.row)?;
        let kind_a = self.writable_kind(&a.column)?;
        let kind_b = self.writable_kind(&b.column)?;

        let va = self.rows.get(abs_a)?.get(&a.column).clone();
        let vb = self.rows.get(abs_b)?.get(&b.column).clone();
        let (new_a, new_b) = exchanged(&va, kind_a, &vb, kind_b);

        let mut touched = Vec::new();
        if self.write_cell(abs_a, &a.column, new_a) {
            touched.push(abs_a);
        }
        if self.write_cell(abs_b, &b.column, new_b) {
            touched.push(abs_b);
        }
        Some(touched)
    }

    // --- Editing ---

    /// Open `cell` for text entry, seeding the draft with its current text.
    pub fn begin_edit(&mut self, cell: CellRef) -> Vec<Action> {
        if !self.config.editable || self.writable_kind(&cell.column).is_none() {
            return Vec::new();
        }
        let Some(value) = self.cell_value(&cell) else {
            return Vec::new();
        };
        let draft = text(value).into_owned();
        self.selection.select_only(cell.clone());
        self.input = InputState::Editing { cell: cell.clone(), draft };
        vec![Action::EditCellRequested { cell }, Action::RenderNeeded]
    }

    /// Replace the text of the cell being edited.
    pub fn update_draft(&mut self, value: impl Into<String>) {
        if let InputState::Editing { draft, .. } = &mut self.input {
            *draft = value.into();
        }
    }

    /// Write the draft into its cell and close the editor.
    pub fn commit_edit(&mut self) -> Vec<Action> {
        let InputState::Editing { cell, draft } = std::mem::take(&mut self.input) else {
            return Vec::new();
        };
        let mut actions = self.set_cell(&cell, Value::String(draft));
        if actions.is_empty() {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Close the editor without writing.
    pub fn cancel_edit(&mut self) -> Vec<Action> {
        if self.input.editing_cell().is_none() {
            return Vec::new();
        }
        self.input = InputState::Idle;
        vec![Action::RenderNeeded]
    }

    /// Commit a direct edit to one cell.
    ///
    /// The value is converted to the column type when possible; otherwise
    /// it is stored as typed so validation can flag it.
    pub fn set_cell(&mut self, cell: &CellRef, value: Value) -> Vec<Action> {
        if !self.config.editable {
            return Vec::new();
        }
        let Some(abs) = self.to_absolute(cell.row) else {
            return Vec::new();
        };
        let Some(kind) = self.writable_kind(&cell.column) else {
            return Vec::new();
        };
        let value = if can_convert(&value, kind) { convert(&value, kind) } else { value };
        if !self.write_cell(abs, &cell.column, value) {
            return Vec::new();
        }
        self.commit_rows(&[abs])
    }

    // --- History ---

    /// Step back to the previous snapshot. No-op at the start of history.
    pub fn undo(&mut self) -> Vec<Action> {
        let Some(snapshot) = self.history.undo().cloned() else {
            return Vec::new();
        };
        self.restore(snapshot)
    }

    /// Step forward to the next snapshot. No-op at the end of history.
    pub fn redo(&mut self) -> Vec<Action> {
        let Some(snapshot) = self.history.redo().cloned() else {
            return Vec::new();
        };
        self.restore(snapshot)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Position in history, `0` being the oldest kept snapshot.
    #[must_use]
    pub fn history_index(&self) -> usize {
        self.history.index()
    }

    /// Number of snapshots kept.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    fn restore(&mut self, snapshot: Vec<Row>) -> Vec<Action> {
        self.rows = snapshot;
        self.selection.clear();
        self.input = InputState::Idle;
        self.errors = ValidationMap::compute(&self.rows, &self.columns);
        self.rebuild_view();
        self.clamp_page();
        tracing::debug!(index = self.history.index(), "history restored");
        vec![
            Action::DataChanged(self.rows.clone()),
            Action::ValidationChanged { has_errors: self.errors.has_errors() },
            Action::UnsavedRowsChanged { has_unsaved: self.has_unsaved_rows() },
            Action::RenderNeeded,
        ]
    }

    // --- Rows ---

    /// Whether a new row may be added: the grid is editable and every row
    /// has been saved.
    #[must_use]
    pub fn can_insert_row(&self) -> bool {
        self.config.editable && !self.has_unsaved_rows()
    }

    /// Append a row of type defaults, jump to its page and open its first
    /// editable cell.
    pub fn insert_row(&mut self) -> Vec<Action> {
        if !self.can_insert_row() {
            tracing::debug!("row insertion rejected: unsaved row present");
            return Vec::new();
        }

        let today = self.clock.today();
        let mut row = Row::new(self.next_local_id());
        for column in self.columns.iter().filter(|c| c.is_movable()) {
            row.values.insert(column.key.clone(), column.kind.default_value(today));
        }
        tracing::info!(id = %row.id, "row inserted");
        self.rows.push(row);
        let abs = self.rows.len() - 1;

        let mut actions = Vec::new();
        if self.pager.mode == PaginationMode::Local && !self.search.is_empty() {
            self.search.clear();
            actions.push(Action::SearchChanged { term: String::new() });
        }
        self.rebuild_view();
        if self.pager.mode == PaginationMode::Local {
            let position = self.view.iter().position(|&index| index == abs).unwrap_or(0);
            let page = self.pager.page_of(position);
            if page != self.pager.page {
                self.pager.page = page;
                actions.push(Action::PageChanged { page });
            }
        }
        self.selection.clear();
        self.input = InputState::Idle;

        actions.extend(self.commit_rows(&[abs]));
        actions.push(Action::UnsavedRowsChanged { has_unsaved: true });

        let first_editable = self.columns.iter().find(|c| c.accepts_writes()).map(|c| c.key.clone());
        if let (Some(column), Some(row)) = (first_editable, self.pager.to_page_row(&self.view, abs)) {
            actions.extend(self.begin_edit(CellRef::new(row, column)));
        }
        actions
    }

    // --- Saving ---

    /// Mark a row as being saved. Returns `false` if the row is unknown or
    /// a save for it is already in flight.
    pub fn begin_save(&mut self, id: &RowId) -> bool {
        if !self.rows.iter().any(|row| row.id == *id) {
            return false;
        }
        self.saving.insert(id.clone())
    }

    /// Whether a save for this row is in flight.
    #[must_use]
    pub fn is_saving(&self, id: &RowId) -> bool {
        self.saving.contains(id)
    }

    /// Record a successful save: the row takes the backend's id, here and in
    /// every history snapshot.
    pub fn complete_save(&mut self, id: &RowId, persisted: RowId) -> Vec<Action> {
        self.saving.remove(id);
        if !persisted.is_persisted() {
            tracing::warn!(row = %id, persisted = %persisted, "save returned a non-persisted id");
            return Vec::new();
        }
        let Some(row) = self.rows.iter_mut().find(|row| row.id == *id) else {
            tracing::warn!(row = %id, "saved row no longer in table");
            return Vec::new();
        };
        row.id = persisted.clone();
        self.history.for_each_mut(|snapshot| {
            for row in snapshot.iter_mut().filter(|row| row.id == *id) {
                row.id = persisted.clone();
            }
        });
        tracing::info!(row = %id, persisted = %persisted, "row saved");
        vec![
            Action::DataChanged(self.rows.clone()),
            Action::UnsavedRowsChanged { has_unsaved: self.has_unsaved_rows() },
            Action::RenderNeeded,
        ]
    }

    /// Record a failed save. The row stays unsaved so it can be retried.
    pub fn fail_save(&mut self, id: &RowId, reason: &str) -> Vec<Action> {
        if !self.saving.remove(id) {
            return Vec::new();
        }
        tracing::warn!(row = %id, reason, "row save failed");
        vec![Action::RenderNeeded]
    }

    // --- Paging and search ---

    /// Go to `page`. Clamped to the last page in local mode.
    pub fn set_page(&mut self, page: usize) -> Vec<Action> {
        if !self.config.paginated {
            return Vec::new();
        }
        let page = match self.pager.mode {
            PaginationMode::Local => page.min(self.page_count() - 1),
            PaginationMode::Remote => page,
        };
        if page == self.pager.page {
            return Vec::new();
        }
        self.pager.page = page;
        self.selection.clear();
        self.input = InputState::Idle;
        vec![Action::PageChanged { page }, Action::RenderNeeded]
    }

    /// Change rows per page and return to the first page.
    pub fn set_page_size(&mut self, page_size: usize) -> Vec<Action> {
        if !self.config.paginated || page_size == 0 || page_size == self.pager.page_size {
            return Vec::new();
        }
        self.pager.page_size = page_size;
        self.selection.clear();
        self.input = InputState::Idle;
        let mut actions = vec![Action::PageSizeChanged { page_size }];
        if self.pager.page != 0 {
            self.pager.page = 0;
            actions.push(Action::PageChanged { page: 0 });
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Tell a remote-paged grid how many rows the server holds.
    pub fn set_total(&mut self, total: usize) {
        self.pager.total = Some(total);
    }

    /// Filter rows by `term`. Local mode filters in place; remote mode
    /// leaves filtering to the host.
    pub fn set_search(&mut self, term: impl Into<String>) -> Vec<Action> {
        let term = term.into();
        if !self.config.searchable || term == self.search {
            return Vec::new();
        }
        self.search.clone_from(&term);
        self.selection.clear();
        self.input = InputState::Idle;
        self.rebuild_view();

        let mut actions = vec![Action::SearchChanged { term }];
        if self.pager.page != 0 {
            self.pager.page = 0;
            actions.push(Action::PageChanged { page: 0 });
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Ask the host to reload the data.
    #[must_use]
    pub fn refresh(&self) -> Vec<Action> {
        vec![Action::RefreshRequested]
    }

    // --- Queries ---

    /// All rows in data order.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Displayed columns, sequence column first.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Keys of the columns that take part in selection and moves, in order.
    #[must_use]
    pub fn movable_keys(&self) -> Vec<String> {
        self.columns.iter().filter(|c| c.is_movable()).map(|c| c.key.clone()).collect()
    }

    /// The validation error map.
    #[must_use]
    pub fn errors(&self) -> &ValidationMap {
        &self.errors
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.errors.has_errors()
    }

    #[must_use]
    pub fn has_unsaved_rows(&self) -> bool {
        self.rows.iter().any(Row::is_unsaved)
    }

    /// Absolute data index for a row on the current page.
    #[must_use]
    pub fn to_absolute(&self, row: usize) -> Option<usize> {
        self.pager.to_absolute(&self.view, row)
    }

    /// Rows on the current page, top to bottom.
    #[must_use]
    pub fn page_rows(&self) -> Vec<&Row> {
        self.view[self.pager.page_range(self.view.len())].iter().filter_map(|&index| self.rows.get(index)).collect()
    }

    /// Value of a page-relative cell.
    #[must_use]
    pub fn cell_value(&self, cell: &CellRef) -> Option<&Value> {
        let abs = self.to_absolute(cell.row)?;
        self.rows.get(abs).map(|row| row.get(&cell.column))
    }

    /// Validation message of a page-relative cell.
    #[must_use]
    pub fn cell_error(&self, cell: &CellRef) -> Option<&str> {
        let abs = self.to_absolute(cell.row)?;
        self.errors.error(abs, &cell.column)
    }

    /// Number shown in the sequence column for a page-relative row.
    #[must_use]
    pub fn sequence_number(&self, row: usize) -> usize {
        self.pager.sequence_number(row)
    }

    #[must_use]
    pub fn page(&self) -> usize {
        self.pager.page
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.pager.page_size
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pager.page_count(self.view.len())
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    // --- Internals ---

    fn page_len(&self) -> usize {
        self.pager.page_len(self.view.len())
    }

    fn is_selectable(&self, cell: &CellRef) -> bool {
        cell.row < self.page_len() && self.columns.iter().any(|c| c.key == cell.column && c.is_movable())
    }

    fn writable_kind(&self, key: &str) -> Option<ColumnType> {
        self.columns.iter().find(|c| c.key == key && c.accepts_writes()).map(|c| c.kind)
    }

    /// Write one cell, mirroring `cgst` into `sgst` and back.
    fn write_cell(&mut self, abs: usize, key: &str, value: Value) -> bool {
        let linked = match key {
            CGST_KEY => Some(SGST_KEY),
            SGST_KEY => Some(CGST_KEY),
            _ => None,
        };
        let mirror = linked.and_then(|linked| {
            let kind = self.writable_kind(linked)?;
            can_convert(&value, kind).then(|| (linked, convert(&value, kind)))
        });

        let Some(row) = self.rows.get_mut(abs) else {
            return false;
        };
        let mut changed = row.set(key, value);
        if let Some((linked, mirrored)) = mirror {
            changed |= row.set(linked, mirrored);
        }
        changed
    }

    /// Revalidate `touched` rows, snapshot, and report the new data.
    fn commit_rows(&mut self, touched: &[usize]) -> Vec<Action> {
        for &index in touched {
            if let Some(row) = self.rows.get(index) {
                self.errors.revalidate_row(index, row, &self.columns);
            }
        }
        self.history.push(self.rows.clone());
        tracing::debug!(
            touched = touched.len(),
            history = self.history.index(),
            errors = self.errors.error_count(),
            "grid mutation committed"
        );
        vec![
            Action::DataChanged(self.rows.clone()),
            Action::ValidationChanged { has_errors: self.errors.has_errors() },
            Action::RenderNeeded,
        ]
    }

    fn rebuild_view(&mut self) {
        let needle = self.search.trim().to_lowercase();
        if self.pager.mode == PaginationMode::Remote || needle.is_empty() {
            self.view = (0..self.rows.len()).collect();
            return;
        }
        let movable = self.movable_keys();
        self.view = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| movable.iter().any(|key| text(row.get(key)).to_lowercase().contains(&needle)))
            .map(|(index, _)| index)
            .collect();
    }

    fn clamp_page(&mut self) {
        if self.pager.mode == PaginationMode::Local {
            self.pager.page = self.pager.page.min(self.page_count() - 1);
        }
    }

    fn assign_local_ids(&mut self) {
        let mut taken: HashSet<RowId> = self.rows.iter().map(|row| row.id.clone()).collect();
        let mut stamp = self.clock.now_ms();
        for row in self.rows.iter_mut().filter(|row| row.id.is_unassigned()) {
            while taken.contains(&RowId::local(stamp)) {
                stamp += 1;
            }
            row.id = RowId::local(stamp);
            taken.insert(row.id.clone());
        }
    }

    fn next_local_id(&self) -> RowId {
        let mut stamp = self.clock.now_ms();
        while self.rows.iter().any(|row| row.id == RowId::local(stamp)) {
            stamp += 1;
        }
        RowId::local(stamp)
    }
}

/// Paired coercion for a two-way exchange: each side receives the other's
/// value converted to its own type, or keeps its value when that fails.
fn exchanged(va: &Value, kind_a: ColumnType, vb: &Value, kind_b: ColumnType) -> (Value, Value) {
    let new_a = if can_convert(vb, kind_a) { convert(vb, kind_a) } else { va.clone() };
    let new_b = if can_convert(va, kind_b) { convert(va, kind_b) } else { vb.clone() };
    (new_a, new_b)
}
