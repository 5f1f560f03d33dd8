//! Error types shared by the playlist, the controller and the audio backend.

use thiserror::Error;

/// Recoverable failure of the current track, surfaced through
/// `LoadStatus::Failed`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// The track could not be opened or decoded.
    #[error("could not load audio: {0}")]
    ResourceUnavailable(String),
    /// The host refused to start playback.
    #[error("playback rejected: {0}")]
    PlaybackRejected(String),
}

impl PlaybackError {
    pub fn resource_unavailable(reason: impl Into<String>) -> Self {
        PlaybackError::ResourceUnavailable(reason.into())
    }

    pub fn playback_rejected(reason: impl Into<String>) -> Self {
        PlaybackError::PlaybackRejected(reason.into())
    }

    /// Short message suitable for the status line.
    pub fn user_message(&self) -> &'static str {
        match self {
            PlaybackError::ResourceUnavailable(_) => "Could not load audio file",
            PlaybackError::PlaybackRejected(_) => "Playback failed, press play to retry",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaylistError {
    #[error("playlist must contain at least one track")]
    Empty,
    #[error("track id {0} appears more than once")]
    DuplicateId(u32),
}

/// A controller command that was refused without touching any state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("cannot seek while the current track is {0}")]
    NotReady(&'static str),
    #[error("cannot seek before the track duration is known")]
    DurationUnknown,
    #[error("seek fraction {0} is not a finite number")]
    InvalidFraction(f64),
}
