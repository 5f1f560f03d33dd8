//! Audio subsystem: the media primitive trait and its `rodio` implementation.
//!
//! `AudioPlayer` owns a dedicated audio thread. Commands go in over a
//! channel; load, position, end-of-track and play results come back as
//! `MediaEvent`s for the runtime to route into the controller.

mod backend;
mod player;
mod sink;
mod thread;
mod types;

pub use backend::{LoadId, MediaBackend, MediaEvent, PlayTicket};
pub use player::AudioPlayer;

#[cfg(test)]
mod tests;
