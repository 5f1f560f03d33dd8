//! Configuration loader and schema types.
//!
//! This module exposes the settings that drive the player (playback policy,
//! key steps, logging, the playlist itself) and helpers to load them from disk.

mod load;
mod schema;

pub use schema::*;

#[cfg(test)]
mod tests;
