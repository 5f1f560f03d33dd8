//! Playback controller: the state machine behind the player.
//!
//! `PlaybackController` owns the playlist position, transport state, time
//! position, volume and load status. It is driven serially by the host (key
//! presses, MPRIS commands, media events) and hands out immutable
//! `PlaybackSnapshot`s for rendering.

mod playback;
mod state;

pub use playback::{AutoplayOutcome, ControllerPolicy, PlaybackController};
pub use state::{LoadStatus, PlaybackSnapshot, PlaybackState};
