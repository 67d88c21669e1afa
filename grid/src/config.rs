//! Engine configuration.
//!
//! Mirrors the flags a hosting page passes to the table widget. Every field
//! has a default, so a config file only needs the keys it changes.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};
use crate::error::GridError;
use crate::page::PaginationMode;

/// Engine settings.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Whether any cell may be edited, pasted into, dropped onto or inserted.
    pub editable: bool,
    /// Whether the search box is shown.
    pub searchable: bool,
    /// Whether rows are split into pages. When false the page holds every row.
    pub paginated: bool,
    /// Who owns paging.
    pub pagination: PaginationMode,
    /// Initial rows per page.
    pub page_size: usize,
    /// Choices offered in the page-size picker.
    pub page_size_options: Vec<usize>,
    /// Maximum undo snapshots kept. `None` keeps the whole session.
    pub history_limit: Option<usize>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            editable: true,
            searchable: true,
            paginated: true,
            pagination: PaginationMode::Local,
            page_size: DEFAULT_PAGE_SIZE,
            page_size_options: PAGE_SIZE_OPTIONS.to_vec(),
            history_limit: None,
        }
    }
}

impl GridConfig {
    /// Parse a JSON config object, applying defaults for missing keys.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Json`] for malformed JSON and
    /// [`GridError::InvalidConfig`] when [`GridConfig::validate`] fails.
    pub fn from_json(raw: &str) -> Result<Self, GridError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()
    }

    /// Check internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidConfig`] for a zero page size, an empty or
    /// zero-containing option list, or a zero history limit.
    pub fn validate(self) -> Result<Self, GridError> {
        if self.page_size == 0 {
            return Err(GridError::InvalidConfig("page_size must be at least 1".into()));
        }
        if self.page_size_options.is_empty() || self.page_size_options.contains(&0) {
            return Err(GridError::InvalidConfig("page_size_options must be non-empty and non-zero".into()));
        }
        if self.history_limit == Some(0) {
            return Err(GridError::InvalidConfig("history_limit must be at least 1".into()));
        }
        Ok(self)
    }

    /// Page size actually used: everything on one page when unpaginated.
    #[must_use]
    pub fn effective_page_size(&self) -> usize {
        if self.paginated { self.page_size } else { usize::MAX }
    }
}
