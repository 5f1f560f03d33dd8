//! Playback state owned by the controller, and the snapshot handed to renderers.

use crate::error::PlaybackError;
use crate::playlist::Track;

/// Where the current track is in its load cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(PlaybackError),
}

impl LoadStatus {
    pub fn label(&self) -> &'static str {
        match self {
            LoadStatus::Idle => "idle",
            LoadStatus::Loading => "loading",
            LoadStatus::Ready => "ready",
            LoadStatus::Failed(_) => "failed",
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, LoadStatus::Ready)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub current_index: usize,
    pub is_playing: bool,
    pub position_secs: f64,
    pub duration_secs: Option<f64>,
    pub volume: f32,
    pub load_status: LoadStatus,
    pub has_user_interacted: bool,
}

impl PlaybackState {
    pub fn new(volume: f32) -> Self {
        Self {
            current_index: 0,
            is_playing: false,
            position_secs: 0.0,
            duration_secs: None,
            volume,
            load_status: LoadStatus::Idle,
            has_user_interacted: false,
        }
    }
}

/// Immutable view of the controller for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSnapshot {
    pub track: Track,
    pub index: usize,
    pub is_playing: bool,
    pub position_secs: f64,
    pub duration_secs: Option<f64>,
    pub volume: f32,
    pub load_status: LoadStatus,
    pub has_user_interacted: bool,
}

impl PlaybackSnapshot {
    /// Played fraction of the track in `[0, 1]`, `0` while the duration is unknown.
    pub fn progress(&self) -> f64 {
        match self.duration_secs {
            Some(d) if d > 0.0 => (self.position_secs / d).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }

    pub fn error(&self) -> Option<&PlaybackError> {
        match &self.load_status {
            LoadStatus::Failed(e) => Some(e),
            _ => None,
        }
    }
}
