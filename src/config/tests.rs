use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_cadence_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("CADENCE_CONFIG_PATH", "/tmp/cadence-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/cadence-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("cadence")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("cadence")
            .join("config.toml")
    );
}

#[test]
fn defaults_describe_the_bundled_playlist() {
    let s = Settings::default();
    assert_eq!(s.playback.initial_volume, 0.7);
    assert_eq!(s.playback.restart_threshold_secs, 3.0);
    assert!(s.playback.autoplay);
    assert_eq!(s.playlist.tracks.len(), 3);
    assert_eq!(s.playlist.tracks[0].src, "music/track.mp3");
    assert!(s.log.file.is_none());
    assert!(s.validate().is_ok());
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
initial_volume = 0.4
restart_threshold_secs = 5.5
autoplay = false

[controls]
seek_step = 0.1
volume_step = 0.05

[audio]
quit_fade_out_ms = 0

[ui]
header_text = "hello"
time_separator = " | "

[log]
file = "/tmp/cadence.log"
filter = "cadence=debug"

[playlist]
base_dir = "/srv/music"

[[playlist.tracks]]
id = 10
name = "Intro"
src = "intro.flac"

[[playlist.tracks]]
id = 11
name = "Outro"
src = "file:///srv/music/outro.ogg"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("CADENCE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("CADENCE__PLAYBACK__INITIAL_VOLUME");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.initial_volume, 0.4);
    assert_eq!(s.playback.restart_threshold_secs, 5.5);
    assert!(!s.playback.autoplay);
    assert_eq!(s.controls.seek_step, 0.1);
    assert_eq!(s.controls.volume_step, 0.05);
    assert_eq!(s.audio.quit_fade_out_ms, 0);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.ui.time_separator, " | ");
    assert_eq!(
        s.log.file.as_deref(),
        Some(std::path::Path::new("/tmp/cadence.log"))
    );
    assert_eq!(s.log.filter, "cadence=debug");
    assert_eq!(
        s.playlist.base_dir.as_deref(),
        Some(std::path::Path::new("/srv/music"))
    );
    assert_eq!(s.playlist.tracks.len(), 2);
    assert_eq!(s.playlist.tracks[0].id, 10);
    assert_eq!(s.playlist.tracks[0].name, "Intro");
    assert_eq!(s.playlist.tracks[1].src, "file:///srv/music/outro.ogg");
    assert!(s.validate().is_ok());
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
initial_volume = 0.9
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("CADENCE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("CADENCE__PLAYBACK__INITIAL_VOLUME", "0.25");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.initial_volume, 0.25);
    // Untouched sections keep their defaults.
    assert_eq!(s.playlist.tracks.len(), 3);
}

#[test]
fn validate_rejects_out_of_range_values() {
    let mut s = Settings::default();
    s.playback.initial_volume = 1.5;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.playback.restart_threshold_secs = -1.0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.controls.seek_step = 0.0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.controls.volume_step = f32::NAN;
    assert!(s.validate().is_err());
}
