//! Visited-location stack with programmatic back/forward.
//!
//! The router reports every route change through [`NavStack::record`].
//! [`NavStack::go_back`] and [`NavStack::go_forward`] move the cursor and
//! return a [`NavCommand::Replace`] for the router to carry out. The route
//! change that follows is recognized as programmatic and is not recorded
//! again.

#[cfg(test)]
#[path = "stack_test.rs"]
mod stack_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A route: path, query string and the router state it was entered with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub path: String,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub state: Value,
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), ..Default::default() }
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    #[must_use]
    pub fn with_state(mut self, state: Value) -> Self {
        self.state = state;
        self
    }
}

/// A recorded visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavEntry {
    pub location: Location,
    /// When the visit was recorded, in milliseconds since the Unix epoch.
    pub timestamp_ms: i64,
}

/// Instruction for the router.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NavCommand {
    /// Replace the current route in place; do not push a new one.
    Replace { path: String, query: String, state: Value },
}

impl NavCommand {
    fn replace(location: &Location) -> Self {
        Self::Replace { path: location.path.clone(), query: location.query.clone(), state: location.state.clone() }
    }
}

/// The shadow history.
#[derive(Debug, Clone, Default)]
pub struct NavStack {
    entries: Vec<NavEntry>,
    index: Option<usize>,
    /// Target of a back/forward still waiting for its route change.
    pending: Option<Location>,
}

impl NavStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a route change. Returns whether a new entry was appended.
    ///
    /// The change a back/forward asked for is consumed without recording.
    /// A repeat of the current location is ignored. Anything else drops the
    /// forward entries and is appended.
    pub fn record(&mut self, location: Location, now_ms: i64) -> bool {
        if let Some(pending) = self.pending.take() {
            if pending == location {
                tracing::trace!(path = %location.path, "programmatic navigation settled");
                return false;
            }
        }
        if self.current().is_some_and(|entry| entry.location == location) {
            return false;
        }

        let keep = self.index.map_or(0, |i| i + 1);
        self.entries.truncate(keep);
        tracing::debug!(path = %location.path, depth = keep + 1, "navigation recorded");
        self.entries.push(NavEntry { location, timestamp_ms: now_ms });
        self.index = Some(self.entries.len() - 1);
        true
    }

    /// Step back one entry.
    pub fn go_back(&mut self) -> Option<NavCommand> {
        let target = self.index?.checked_sub(1)?;
        self.jump(target)
    }

    /// Step forward one entry.
    pub fn go_forward(&mut self) -> Option<NavCommand> {
        let target = self.index? + 1;
        self.jump(target)
    }

    fn jump(&mut self, target: usize) -> Option<NavCommand> {
        let location = self.entries.get(target)?.location.clone();
        self.index = Some(target);
        let command = NavCommand::replace(&location);
        self.pending = Some(location);
        Some(command)
    }

    #[must_use]
    pub fn can_go_back(&self) -> bool {
        self.index.is_some_and(|i| i > 0)
    }

    #[must_use]
    pub fn can_go_forward(&self) -> bool {
        self.index.is_some_and(|i| i + 1 < self.entries.len())
    }

    /// Entry at the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&NavEntry> {
        self.entries.get(self.index?)
    }

    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    #[must_use]
    pub fn entries(&self) -> &[NavEntry] {
        &self.entries
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = None;
        self.pending = None;
    }
}
