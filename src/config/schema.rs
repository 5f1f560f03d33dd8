use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/cadence/config.toml` or `~/.config/cadence/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `CADENCE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub playback: PlaybackSettings,
    pub controls: ControlsSettings,
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub log: LogSettings,
    pub playlist: PlaylistSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Volume applied when the player starts, in `[0.0, 1.0]`.
    pub initial_volume: f32,
    /// Pressing "previous" later than this many seconds into a track restarts
    /// it instead of going back one track.
    pub restart_threshold_secs: f64,
    /// Start playing on the first key press once the first track is ready.
    pub autoplay: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            initial_volume: 0.7,
            restart_threshold_secs: 3.0,
            autoplay: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Fraction of the track duration to jump when pressing `H` / `L`.
    pub seek_step: f64,
    /// Volume change when pressing `+` / `-`.
    pub volume_step: f32,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            seek_step: 0.05,
            volume_step: 0.1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            quit_fade_out_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Separator between elapsed and total time.
    pub time_separator: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ now playing ~ ".to_string(),
            time_separator: " / ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Log file. The terminal belongs to the UI, so nothing is logged when unset.
    pub file: Option<PathBuf>,
    /// `tracing` filter directive, overridden by `RUST_LOG`.
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            file: None,
            filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaylistSettings {
    /// Directory that relative track sources are resolved against.
    /// Defaults to the current working directory.
    pub base_dir: Option<PathBuf>,
    pub tracks: Vec<TrackEntry>,
}

impl Default for PlaylistSettings {
    fn default() -> Self {
        Self {
            base_dir: None,
            tracks: vec![
                TrackEntry::new(1, "Track 1", "music/track.mp3"),
                TrackEntry::new(2, "Track 2", "music/track2.mp3"),
                TrackEntry::new(3, "Track 3", "music/track3.mp3"),
            ],
        }
    }
}

/// One `[[playlist.tracks]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackEntry {
    pub id: u32,
    pub name: String,
    pub src: String,
}

impl TrackEntry {
    pub fn new(id: u32, name: &str, src: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            src: src.to_string(),
        }
    }
}
