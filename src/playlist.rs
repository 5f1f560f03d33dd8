//! The fixed, ordered list of tracks the controller plays through.
//!
//! A `Playlist` is validated once at construction (non-empty, unique ids)
//! and never changes afterwards; all index arithmetic wraps around.

mod model;

pub use model::*;
