//! The view layer: state machine, fetch driver, text renderer, and the
//! interactive session that ties them to a terminal.
//!
//! # Submodules
//!
//! - [`state`]: `Loading`/`Ready` plus the orthogonal detail overlay
//! - [`feed`]: Spawns fetches and commits only the latest generation
//! - [`render`]: Turns a state into the screen text
//! - [`session`]: Line-based command loop over stdin/stdout

pub mod feed;
pub mod render;
pub mod session;
pub mod state;
