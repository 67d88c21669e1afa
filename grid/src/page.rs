//! Pagination and the page-relative to absolute row mapping.
//!
//! Cell references carry a row index relative to the displayed page. The
//! rows on screen are a window over the *view*: the list of absolute data
//! indices that pass the current search. [`Pager::to_absolute`] is the one
//! place that translation happens.
//!
//! In [`PaginationMode::Remote`] the host fetches one page at a time, so the
//! data array already is the page and the window starts at zero.

#[cfg(test)]
#[path = "page_test.rs"]
mod page_test;

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_PAGE_SIZE;

/// Who owns page and page-size state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaginationMode {
    /// The grid slices the full data set itself.
    #[default]
    Local,
    /// The host pages on the server and hands the grid one page at a time.
    Remote,
}

/// Current page position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub mode: PaginationMode,
    /// Zero-based page number.
    pub page: usize,
    /// Rows per page. Never zero.
    pub page_size: usize,
    /// Server-side row count in remote mode.
    pub total: Option<usize>,
}

impl Default for Pager {
    fn default() -> Self {
        Self { mode: PaginationMode::Local, page: 0, page_size: DEFAULT_PAGE_SIZE, total: None }
    }
}

impl Pager {
    #[must_use]
    pub fn new(mode: PaginationMode, page_size: usize) -> Self {
        Self { mode, page: 0, page_size: page_size.max(1), total: None }
    }

    /// Positions within the view that are on the current page.
    #[must_use]
    pub fn page_range(&self, view_len: usize) -> Range<usize> {
        match self.mode {
            PaginationMode::Local => {
                let start = self.page.saturating_mul(self.page_size).min(view_len);
                let end = start.saturating_add(self.page_size).min(view_len);
                start..end
            }
            PaginationMode::Remote => 0..view_len,
        }
    }

    /// Number of rows on the current page.
    #[must_use]
    pub fn page_len(&self, view_len: usize) -> usize {
        self.page_range(view_len).len()
    }

    /// Absolute data index for a page-relative row, or `None` if the row is
    /// not on the current page.
    #[must_use]
    pub fn to_absolute(&self, view: &[usize], row: usize) -> Option<usize> {
        let range = self.page_range(view.len());
        let position = range.start + row;
        if position >= range.end {
            return None;
        }
        view.get(position).copied()
    }

    /// Page-relative row for an absolute data index, if it is on this page.
    #[must_use]
    pub fn to_page_row(&self, view: &[usize], absolute: usize) -> Option<usize> {
        let range = self.page_range(view.len());
        view[range.clone()].iter().position(|&index| index == absolute)
    }

    /// Number of pages (at least one).
    #[must_use]
    pub fn page_count(&self, view_len: usize) -> usize {
        let rows = match self.mode {
            PaginationMode::Local => view_len,
            PaginationMode::Remote => self.total.unwrap_or(view_len),
        };
        rows.div_ceil(self.page_size).max(1)
    }

    /// Page holding the given view position in local mode.
    #[must_use]
    pub fn page_of(&self, position: usize) -> usize {
        position / self.page_size
    }

    /// One-based number shown in the sequence column.
    #[must_use]
    pub fn sequence_number(&self, row: usize) -> usize {
        self.page.saturating_mul(self.page_size).saturating_add(row + 1)
    }
}
