use super::*;
use crate::error::PlaybackError;
use crate::playlist::Track;
use std::sync::mpsc;

fn snapshot() -> PlaybackSnapshot {
    PlaybackSnapshot {
        track: Track::new(7, "Test Title", "/tmp/music/test.mp3"),
        index: 0,
        is_playing: false,
        position_secs: 0.0,
        duration_secs: Some(1.234567),
        volume: 0.5,
        load_status: LoadStatus::Ready,
        has_user_interacted: false,
    }
}

fn iface() -> (PlayerIface, Arc<Mutex<SharedState>>, mpsc::Receiver<ControlCmd>) {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };
    (iface, state, rx)
}

#[test]
fn publish_copies_snapshot_into_shared_state() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let handle = MprisHandle {
        state: state.clone(),
    };

    handle.publish(&snapshot());

    let s = state.lock().unwrap();
    assert_eq!(s.status, Status::Paused);
    assert_eq!(s.title.as_deref(), Some("Test Title"));
    assert_eq!(s.length_micros, Some(1_234_567));
    assert_eq!(s.volume, 0.5);
    assert_eq!(
        s.track_id.as_ref().map(|p| p.as_str()),
        Some("/org/mpris/MediaPlayer2/track/7")
    );
}

#[test]
fn playback_status_maps_snapshot_to_mpris_strings() {
    let (iface, state, _rx) = iface();
    let handle = MprisHandle {
        state: state.clone(),
    };

    let mut s = snapshot();
    handle.publish(&s);
    assert_eq!(iface.playback_status(), "Paused");

    s.is_playing = true;
    handle.publish(&s);
    assert_eq!(iface.playback_status(), "Playing");

    s.is_playing = false;
    s.load_status = LoadStatus::Failed(PlaybackError::resource_unavailable("gone"));
    handle.publish(&s);
    assert_eq!(iface.playback_status(), "Stopped");
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let (iface, state, _rx) = iface();
    assert!(iface.metadata().is_empty());

    MprisHandle { state }.publish(&snapshot());
    let map = iface.metadata();
    for k in ["mpris:trackid", "xesam:title", "mpris:length"] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}

#[test]
fn player_methods_forward_control_commands() {
    let (iface, _state, rx) = iface();
    iface.play_pause();
    iface.next();
    iface.previous();
    iface.stop();
    let cmds: Vec<ControlCmd> = rx.try_iter().collect();
    assert_eq!(
        cmds,
        vec![
            ControlCmd::PlayPause,
            ControlCmd::Next,
            ControlCmd::Previous,
            ControlCmd::Pause
        ]
    );
}
