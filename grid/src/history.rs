//! Linear undo/redo over full snapshots.
//!
//! The stack always holds at least one snapshot (the state the table was
//! loaded with). Pushing after an undo drops the snapshots ahead of the
//! current index.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

/// Snapshot history with a movable cursor.
#[derive(Debug, Clone)]
pub struct History<T> {
    snapshots: Vec<T>,
    index: usize,
    limit: Option<usize>,
}

impl<T: Clone> History<T> {
    /// Start a history at `initial`. `limit` caps the number of snapshots
    /// kept; `None` keeps every snapshot for the session.
    pub fn new(initial: T, limit: Option<usize>) -> Self {
        Self { snapshots: vec![initial], index: 0, limit: limit.map(|n| n.max(1)) }
    }

    /// Drop everything and start over at `initial`.
    pub fn reset(&mut self, initial: T) {
        self.snapshots.clear();
        self.snapshots.push(initial);
        self.index = 0;
    }

    /// Record a new state, discarding any redo entries.
    pub fn push(&mut self, snapshot: T) {
        self.snapshots.truncate(self.index + 1);
        self.snapshots.push(snapshot);
        self.index = self.snapshots.len() - 1;

        if let Some(limit) = self.limit {
            let overflow = self.snapshots.len().saturating_sub(limit);
            if overflow > 0 {
                self.snapshots.drain(..overflow);
                self.index -= overflow;
            }
        }
    }

    /// Step back one snapshot. `None` at the start of history.
    pub fn undo(&mut self) -> Option<&T> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        self.snapshots.get(self.index)
    }

    /// Step forward one snapshot. `None` at the end of history.
    pub fn redo(&mut self) -> Option<&T> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        self.snapshots.get(self.index)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    /// The snapshot at the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&T> {
        self.snapshots.get(self.index)
    }

    /// Cursor position, `0` being the oldest kept snapshot.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of snapshots kept.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Rewrite every snapshot in place.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut T)) {
        for snapshot in &mut self.snapshots {
            f(snapshot);
        }
    }
}
