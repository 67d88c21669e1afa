//! Per-cell validation and the table-wide error map.
//!
//! Validation never blocks editing. Errors are kept per cell so the host can
//! render inline markers, and folded into a single "has errors" flag that
//! gates the page's save/finalize actions.

#[cfg(test)]
#[path = "validate_test.rs"]
mod validate_test;

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::coerce::{as_number, can_convert, is_blank, is_iso_date_literal, text};
use crate::consts::{CGST_KEY, GST_KEY, PERCENT_MAX, SGST_KEY, SPLIT_GST_MAX, GST_MAX};
use crate::table::{ColumnDescriptor, ColumnType, Row};

/// Error messages for one row, keyed by column key.
pub type RowErrors = BTreeMap<String, String>;

/// Upper bound for a percentage column, by key.
#[must_use]
pub fn percentage_cap(key: &str) -> f64 {
    match key {
        GST_KEY => GST_MAX,
        CGST_KEY | SGST_KEY => SPLIT_GST_MAX,
        _ => PERCENT_MAX,
    }
}

/// Validate one value against its column. `None` means the cell is fine.
#[must_use]
pub fn validate_cell(column: &ColumnDescriptor, value: &Value) -> Option<String> {
    let label = if column.label.is_empty() { column.key.as_str() } else { column.label.as_str() };
    let blank = is_blank(value);

    if column.is_required && blank {
        return Some(format!("{label} is required"));
    }
    if blank {
        return None;
    }

    if column.is_percentage {
        let cap = percentage_cap(&column.key);
        return match as_number(value) {
            Some(n) if (0.0..=cap).contains(&n) => None,
            _ => Some(format!("{label} must be a percentage between 0 and {cap}")),
        };
    }

    if !can_convert(value, column.kind) {
        return Some(format!("{label} must be a valid {}", column.kind));
    }
    if column.kind == ColumnType::Date && !is_iso_date_literal(text(value).trim()) {
        return Some(format!("{label} must be a date in YYYY-MM-DD format"));
    }
    None
}

/// Validate every editable column of a row.
#[must_use]
pub fn validate_row(row: &Row, columns: &[ColumnDescriptor]) -> RowErrors {
    columns
        .iter()
        .filter(|c| c.accepts_writes())
        .filter_map(|c| validate_cell(c, row.get(&c.key)).map(|msg| (c.key.clone(), msg)))
        .collect()
}

/// Validation results keyed by absolute row index.
///
/// Rows without errors have no entry, so [`ValidationMap::has_errors`] is a
/// simple emptiness check.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationMap {
    rows: BTreeMap<usize, RowErrors>,
}

impl ValidationMap {
    /// Validate a whole table.
    #[must_use]
    pub fn compute(rows: &[Row], columns: &[ColumnDescriptor]) -> Self {
        let mut map = Self::default();
        for (index, row) in rows.iter().enumerate() {
            map.revalidate_row(index, row, columns);
        }
        map
    }

    /// Recompute the entry for one row.
    pub fn revalidate_row(&mut self, index: usize, row: &Row, columns: &[ColumnDescriptor]) {
        let errors = validate_row(row, columns);
        if errors.is_empty() {
            self.rows.remove(&index);
        } else {
            self.rows.insert(index, errors);
        }
    }

    /// Exchange the entries of two rows that swapped places.
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        let first = self.rows.remove(&a);
        let second = self.rows.remove(&b);
        if let Some(errors) = first {
            self.rows.insert(b, errors);
        }
        if let Some(errors) = second {
            self.rows.insert(a, errors);
        }
    }

    /// Error message for one cell.
    #[must_use]
    pub fn error(&self, row: usize, key: &str) -> Option<&str> {
        self.rows.get(&row).and_then(|errors| errors.get(key)).map(String::as_str)
    }

    /// All errors of one row.
    #[must_use]
    pub fn row_errors(&self, row: usize) -> Option<&RowErrors> {
        self.rows.get(&row)
    }

    /// Whether any cell in the table is invalid.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.rows.is_empty()
    }

    /// Number of invalid cells.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }

    /// Iterate `(row, errors)` in row order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &RowErrors)> {
        self.rows.iter().map(|(index, errors)| (*index, errors))
    }
}
