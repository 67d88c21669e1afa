//! Selection model: the selected cell set, its anchor, and the clipboard.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::input::Key;

/// A cell on the displayed page.
///
/// `row` counts from the top of the current page, not from the start of the
/// data; the engine maps it to an absolute index before touching data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub column: String,
}

impl CellRef {
    pub fn new(row: usize, column: impl Into<String>) -> Self {
        Self { row, column: column.into() }
    }
}

/// Arrow-key direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Map a browser key name (`"ArrowUp"` …) to a direction.
    #[must_use]
    pub fn from_key(key: &Key) -> Option<Self> {
        match key.0.as_str() {
            "ArrowUp" => Some(Self::Up),
            "ArrowDown" => Some(Self::Down),
            "ArrowLeft" => Some(Self::Left),
            "ArrowRight" => Some(Self::Right),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
}

/// The cell adjacent to `cell` in `direction`.
///
/// Bounded by the `page_rows` rows of the current page and by the movable
/// column order; a cell outside that order has no neighbors.
#[must_use]
pub fn neighbor(cell: &CellRef, direction: Direction, page_rows: usize, movable: &[String]) -> Option<CellRef> {
    if cell.row >= page_rows {
        return None;
    }
    let col = movable.iter().position(|key| *key == cell.column)?;
    match direction {
        Direction::Up => cell.row.checked_sub(1).map(|row| CellRef::new(row, cell.column.clone())),
        Direction::Down => (cell.row + 1 < page_rows).then(|| CellRef::new(cell.row + 1, cell.column.clone())),
        Direction::Left => col.checked_sub(1).map(|c| CellRef::new(cell.row, movable[c].clone())),
        Direction::Right => movable.get(col + 1).map(|key| CellRef::new(cell.row, key.clone())),
    }
}

/// Selected cells in the order they were added, plus the anchor cell used as
/// the origin for keyboard extension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    cells: Vec<CellRef>,
    anchor: Option<CellRef>,
}

impl Selection {
    /// Replace the selection with exactly `cell`.
    pub fn select_only(&mut self, cell: CellRef) {
        self.cells = vec![cell.clone()];
        self.anchor = Some(cell);
    }

    /// Add `cell` if absent, remove it if present. The anchor moves to `cell`
    /// either way.
    pub fn toggle(&mut self, cell: CellRef) {
        if let Some(pos) = self.cells.iter().position(|c| *c == cell) {
            self.cells.remove(pos);
        } else {
            self.cells.push(cell.clone());
        }
        self.anchor = Some(cell);
    }

    /// Add `cell` without duplicating it and make it the anchor.
    pub fn extend(&mut self, cell: CellRef) {
        if !self.cells.contains(&cell) {
            self.cells.push(cell.clone());
        }
        self.anchor = Some(cell);
    }

    /// Replace the whole selection.
    pub fn replace(&mut self, cells: Vec<CellRef>, anchor: Option<CellRef>) {
        self.cells.clear();
        for cell in cells {
            if !self.cells.contains(&cell) {
                self.cells.push(cell);
            }
        }
        self.anchor = anchor;
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.anchor = None;
    }

    #[must_use]
    pub fn contains(&self, cell: &CellRef) -> bool {
        self.cells.contains(cell)
    }

    #[must_use]
    pub fn cells(&self) -> &[CellRef] {
        &self.cells
    }

    /// The earliest-selected cell still in the set.
    #[must_use]
    pub fn first(&self) -> Option<&CellRef> {
        self.cells.first()
    }

    #[must_use]
    pub fn anchor(&self) -> Option<&CellRef> {
        self.anchor.as_ref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Single-slot clipboard. Each copy overwrites it.
#[derive(Debug, Clone, PartialEq)]
pub struct Clipboard {
    /// Where the value was copied from.
    pub cell: CellRef,
    /// The copied value as stored in the data.
    pub value: Value,
}
