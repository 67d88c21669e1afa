//! Editable grid engine for the invoice back-office tables.
//!
//! This crate owns everything behind the spreadsheet-like line-item tables:
//! column derivation, per-cell validation, multi-cell selection, clipboard
//! copy/paste, content swaps and row/column reordering with type coercion, and
//! linear undo/redo over full-table snapshots. It has no UI dependency. The
//! host (a page component, a test, or the replay CLI) feeds it clicks and key
//! presses and applies the returned [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | The [`engine::GridCore`] controller and its `Action`s |
//! | [`host`] | Observer trait and the [`host::Grid`] wrapper that dispatches actions |
//! | [`table`] | Rows, column descriptors and column derivation |
//! | [`coerce`] | `can_convert` / `convert`, the single source of truth for typed writes |
//! | [`validate`] | Per-cell validation and the error map |
//! | [`selection`] | Selection set, anchor, clipboard and neighbor lookup |
//! | [`history`] | Snapshot undo/redo stack |
//! | [`page`] | Pagination and the page-to-absolute row mapping |
//! | [`input`] | Modifier keys, key names and the drag/edit state machine |
//! | [`config`] | Engine configuration |
//! | [`clock`] | Wall-clock seam for synthetic ids and today's date |
//! | [`consts`] | Shared constants (fixed column key, tax caps, page sizes) |

pub mod clock;
pub mod coerce;
pub mod config;
pub mod consts;
pub mod engine;
pub mod error;
pub mod history;
pub mod host;
pub mod input;
pub mod page;
pub mod selection;
pub mod table;
pub mod validate;

pub use engine::{Action, GridCore};
pub use error::GridError;
