//! Utilities for turning track locators into paused `rodio` sinks.
//!
//! The helpers here encapsulate resolving a locator to a file, opening and
//! decoding it, probing its duration and preparing a paused `Sink` at the
//! requested start position.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::prelude::AudioFile;
use rodio::{Decoder, OutputStream, Sink, Source};

use crate::error::PlaybackError;

/// Map a track locator (plain path or `file://` URI) onto a filesystem path.
/// Relative paths are resolved against `base_dir` when one is configured.
pub(crate) fn resolve_locator(locator: &str, base_dir: Option<&Path>) -> PathBuf {
    let raw = locator.strip_prefix("file://").unwrap_or(locator);
    let path = PathBuf::from(raw);
    match base_dir {
        Some(base) if path.is_relative() => base.join(path),
        _ => path,
    }
}

fn open_decoder(path: &Path) -> Result<Decoder<BufReader<File>>, PlaybackError> {
    let file = File::open(path).map_err(|e| {
        PlaybackError::resource_unavailable(format!("{}: {e}", path.display()))
    })?;
    Decoder::new(BufReader::new(file))
        .map_err(|e| PlaybackError::resource_unavailable(format!("{}: {e}", path.display())))
}

/// Open `path` far enough to know it decodes, and report its duration.
///
/// The decoder's own estimate is used when it has one; otherwise the
/// container metadata is read with `lofty`.
pub(super) fn probe(path: &Path) -> Result<Option<Duration>, PlaybackError> {
    let decoder = open_decoder(path)?;
    let duration = decoder.total_duration().or_else(|| {
        lofty::read_from_path(path)
            .ok()
            .map(|tagged| tagged.properties().duration())
    });
    Ok(duration.filter(|d| !d.is_zero()))
}

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    path: &Path,
    start_at: Duration,
    volume: f32,
) -> Result<Sink, PlaybackError> {
    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    let source = open_decoder(path)?.skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.set_volume(volume);
    sink.append(source);
    sink.pause();
    Ok(sink)
}
