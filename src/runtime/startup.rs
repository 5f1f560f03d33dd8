use std::path::PathBuf;

use crate::config::PlaylistSettings;
use crate::error::PlaylistError;
use crate::playlist::Playlist;

/// Tracks given on the command line replace the configured playlist.
pub fn build_playlist(
    paths: &[PathBuf],
    settings: &PlaylistSettings,
) -> Result<Playlist, PlaylistError> {
    if paths.is_empty() {
        Playlist::from_settings(settings)
    } else {
        Playlist::from_paths(paths)
    }
}
