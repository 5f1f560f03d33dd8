use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use super::player::AudioPlayer;
use super::sink::{probe, resolve_locator};
use super::thread::{Loaded, do_load, do_play, do_seek, report_progress};
use super::{LoadId, MediaBackend, MediaEvent, PlayTicket};
use crate::error::PlaybackError;

/// A loaded track with no output device behind it.
fn loaded(duration: Option<Duration>) -> Loaded {
    Loaded {
        load: LoadId(3),
        path: PathBuf::from("music/track.mp3"),
        duration,
        sink: None,
        paused: true,
        started_at: None,
        accumulated: Duration::ZERO,
    }
}

#[test]
fn resolve_locator_joins_relative_paths_onto_base_dir() {
    assert_eq!(
        resolve_locator("music/track.mp3", Some(Path::new("/srv/site"))),
        PathBuf::from("/srv/site/music/track.mp3")
    );
    assert_eq!(
        resolve_locator("music/track.mp3", None),
        PathBuf::from("music/track.mp3")
    );
}

#[test]
fn resolve_locator_keeps_absolute_paths_and_strips_file_scheme() {
    assert_eq!(
        resolve_locator("/abs/a.ogg", Some(Path::new("/srv/site"))),
        PathBuf::from("/abs/a.ogg")
    );
    assert_eq!(
        resolve_locator("file:///abs/b.flac", Some(Path::new("/srv/site"))),
        PathBuf::from("/abs/b.flac")
    );
}

#[test]
fn probe_reports_missing_file_as_resource_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let err = probe(&dir.path().join("missing.mp3")).unwrap_err();
    assert!(matches!(err, PlaybackError::ResourceUnavailable(_)));
}

#[test]
fn probe_reports_undecodable_file_as_resource_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.mp3");
    std::fs::write(&path, b"definitely not audio").unwrap();
    let err = probe(&path).unwrap_err();
    assert!(matches!(err, PlaybackError::ResourceUnavailable(_)));
}

#[test]
fn play_without_a_loaded_track_is_rejected() {
    let (tx, _rx) = mpsc::channel();
    assert_eq!(
        do_play(None, None, 1.0, &tx),
        Err(PlaybackError::playback_rejected("no track loaded"))
    );
}

#[test]
fn play_without_an_output_device_is_rejected() {
    let (tx, rx) = mpsc::channel();
    let mut cur = loaded(Some(Duration::from_secs(10)));
    assert_eq!(
        do_play(None, Some(&mut cur), 1.0, &tx),
        Err(PlaybackError::playback_rejected("no audio output device"))
    );
    assert!(cur.paused);
    assert!(rx.try_recv().is_err());
}

#[test]
fn load_of_missing_file_reports_error_for_that_load() {
    let dir = tempfile::tempdir().unwrap();
    let (tx, rx) = mpsc::channel();

    let cur = do_load(None, LoadId(1), dir.path().join("missing.mp3"), 1.0, &tx);

    assert!(cur.is_none());
    match rx.try_recv().unwrap() {
        MediaEvent::Error { load, error } => {
            assert_eq!(load, LoadId(1));
            assert!(matches!(error, PlaybackError::ResourceUnavailable(_)));
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert!(rx.try_recv().is_err());
}

#[test]
fn seek_to_the_end_finishes_the_track() {
    let (tx, rx) = mpsc::channel();
    let mut cur = loaded(Some(Duration::from_secs(10)));

    do_seek(None, &mut cur, 10.0, 1.0, &tx);

    assert_eq!(rx.try_recv().unwrap(), MediaEvent::Ended { load: LoadId(3) });
    assert!(cur.paused);
    assert_eq!(cur.accumulated, Duration::from_secs(10));
}

#[test]
fn seek_inside_the_track_moves_position_without_events() {
    let (tx, rx) = mpsc::channel();
    let mut cur = loaded(Some(Duration::from_secs(10)));

    do_seek(None, &mut cur, 4.0, 1.0, &tx);

    assert!(rx.try_recv().is_err());
    assert_eq!(cur.accumulated, Duration::from_secs(4));

    // Unknown duration never counts as the end.
    let mut cur = loaded(None);
    do_seek(None, &mut cur, 500.0, 1.0, &tx);
    assert!(rx.try_recv().is_err());
}

#[test]
fn progress_is_reported_only_while_playing() {
    let (tx, rx) = mpsc::channel();
    let mut cur = loaded(Some(Duration::from_secs(10)));
    cur.accumulated = Duration::from_secs(2);

    report_progress(&mut cur, &tx);
    assert!(rx.try_recv().is_err());

    cur.paused = false;
    cur.started_at = Some(Instant::now());
    report_progress(&mut cur, &tx);
    match rx.try_recv().unwrap() {
        MediaEvent::TimeUpdate { load, secs } => {
            assert_eq!(load, LoadId(3));
            assert!(secs >= 2.0);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn player_without_audio_thread_answers_with_failures() {
    let (mut player, rx) = AudioPlayer::detached(Some(PathBuf::from("/srv/music")));

    player.load(LoadId(5), "a.ogg");
    player.play(PlayTicket(9));
    player.pause();
    player.set_volume(0.5);

    match rx.try_recv().unwrap() {
        MediaEvent::Error { load, error } => {
            assert_eq!(load, LoadId(5));
            assert!(matches!(error, PlaybackError::ResourceUnavailable(_)));
        }
        other => panic!("unexpected event: {other:?}"),
    }
    match rx.try_recv().unwrap() {
        MediaEvent::PlayResolved { ticket, result } => {
            assert_eq!(ticket, PlayTicket(9));
            assert!(matches!(result, Err(PlaybackError::PlaybackRejected(_))));
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert!(rx.try_recv().is_err());
}
