use std::collections::HashSet;
use std::path::PathBuf;

use crate::config::PlaylistSettings;
use crate::error::PlaylistError;

/// One playable item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// Stable identifier, unique within the playlist.
    pub id: u32,
    pub name: String,
    /// Path or `file://` URI of the audio resource.
    pub source: String,
}

impl Track {
    pub fn new(id: u32, name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            source: source.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    pub fn new(tracks: Vec<Track>) -> Result<Self, PlaylistError> {
        if tracks.is_empty() {
            return Err(PlaylistError::Empty);
        }

        let mut seen = HashSet::with_capacity(tracks.len());
        for t in &tracks {
            if !seen.insert(t.id) {
                return Err(PlaylistError::DuplicateId(t.id));
            }
        }

        Ok(Self { tracks })
    }

    /// Build the playlist from the `[playlist]` config section.
    pub fn from_settings(settings: &PlaylistSettings) -> Result<Self, PlaylistError> {
        let tracks = settings
            .tracks
            .iter()
            .map(|e| Track::new(e.id, e.name.clone(), e.src.clone()))
            .collect();
        Self::new(tracks)
    }

    /// Build an ad-hoc playlist from file paths, numbering ids from 1 and
    /// naming each track after its file stem.
    pub fn from_paths(paths: &[PathBuf]) -> Result<Self, PlaylistError> {
        let tracks = paths
            .iter()
            .zip(1u32..)
            .map(|(p, id)| {
                let name = p
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .filter(|s| !s.trim().is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Track {id}"));
                Track::new(id, name, p.to_string_lossy())
            })
            .collect();
        Self::new(tracks)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Track at `index`, wrapped into range.
    pub fn track(&self, index: usize) -> &Track {
        &self.tracks[index % self.tracks.len()]
    }

    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.tracks.len()
    }

    pub fn prev_index(&self, index: usize) -> usize {
        let len = self.tracks.len();
        (index % len + len - 1) % len
    }
}
