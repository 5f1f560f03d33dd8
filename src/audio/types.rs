//! Commands understood by the audio thread.

use std::path::PathBuf;

use super::backend::{LoadId, PlayTicket};

#[derive(Debug)]
pub enum AudioCmd {
    /// Open and decode `path`, leaving it paused at the start.
    Load { load: LoadId, path: PathBuf },
    /// Resume the loaded track and answer with `PlayResolved`.
    Play(PlayTicket),
    Pause,
    /// Jump to an absolute position in seconds.
    Seek(f64),
    SetVolume(f32),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}
