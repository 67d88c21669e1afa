//! Shadow navigation history for the back-office router.
//!
//! The browser's own history cannot hand back the router state a page was
//! entered with, so the app keeps its own stack of visited locations and
//! replays entries verbatim on back/forward. See [`stack::NavStack`].

pub mod stack;

pub use stack::{Location, NavCommand, NavEntry, NavStack};
