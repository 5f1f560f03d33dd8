//! The media primitive the controller drives.
//!
//! A backend loads one track at a time, starts playback asynchronously and
//! reports everything it learns as `MediaEvent`s. Every load cycle is tagged
//! with a `LoadId` and every play request with a `PlayTicket` so the
//! controller can tell current reports from stale ones.

use crate::error::PlaybackError;

/// Generation number of one load cycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadId(pub u64);

/// Identifier of one asynchronous play request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlayTicket(pub u64);

pub trait MediaBackend {
    /// Replace the current media with `locator`. Reports for this cycle carry `load`.
    fn load(&mut self, load: LoadId, locator: &str);
    /// Start playback. Must not block; the outcome arrives as
    /// `MediaEvent::PlayResolved` with the same `ticket`.
    fn play(&mut self, ticket: PlayTicket);
    fn pause(&mut self);
    fn set_position(&mut self, secs: f64);
    fn set_volume(&mut self, volume: f32);
}

/// Reports from a backend, fed back into `PlaybackController::handle_event`.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Enough of the track is available to start playing.
    CanPlay { load: LoadId },
    DurationKnown { load: LoadId, secs: f64 },
    TimeUpdate { load: LoadId, secs: f64 },
    /// Playback reached the end of the track.
    Ended { load: LoadId },
    Error { load: LoadId, error: PlaybackError },
    PlayResolved {
        ticket: PlayTicket,
        result: Result<(), PlaybackError>,
    },
}
