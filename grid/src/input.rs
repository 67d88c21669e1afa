//! Input model: modifier keys, key names, and the pointer/edit state machine.
//!
//! `Modifiers` and `Key` describe a keyboard or pointer event as the browser
//! reports it. `InputState` is the interaction in progress between events: a
//! cell being dragged toward a drop target, or a cell open for text entry.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::selection::CellRef;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on Windows/Linux or Cmd on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }

    #[must_use]
    pub fn none(self) -> bool {
        !(self.shift || self.ctrl || self.alt || self.meta)
    }
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"ArrowUp"`, `"c"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(pub String);

impl Key {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Whether this is the letter `letter`, ignoring case (Shift turns `z` into `Z`).
    #[must_use]
    pub fn is_letter(&self, letter: char) -> bool {
        let mut chars = self.0.chars();
        matches!((chars.next(), chars.next()), (Some(c), None) if c.eq_ignore_ascii_case(&letter))
    }
}

/// Interaction in progress.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InputState {
    /// Nothing in progress.
    #[default]
    Idle,
    /// A cell is being dragged.
    Dragging {
        /// Cell the drag started from.
        source: CellRef,
        /// Cell currently under the pointer, if it is a valid drop target.
        over: Option<CellRef>,
    },
    /// A cell is open for text entry.
    Editing {
        /// Cell being edited.
        cell: CellRef,
        /// Text typed so far.
        draft: String,
    },
}

impl InputState {
    /// The cell open for editing, if any.
    #[must_use]
    pub fn editing_cell(&self) -> Option<&CellRef> {
        match self {
            Self::Editing { cell, .. } => Some(cell),
            _ => None,
        }
    }

    /// The drag source, if a drag is in progress.
    #[must_use]
    pub fn drag_source(&self) -> Option<&CellRef> {
        match self {
            Self::Dragging { source, .. } => Some(source),
            _ => None,
        }
    }
}
