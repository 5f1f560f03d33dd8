use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::error::PlaybackError;

use super::backend::{LoadId, MediaBackend, MediaEvent, PlayTicket};
use super::sink::resolve_locator;
use super::thread::spawn_audio_thread;
use super::types::AudioCmd;

/// `MediaBackend` backed by a `rodio` audio thread.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    /// Used to answer requests directly when the audio thread is gone.
    events: Sender<MediaEvent>,
    base_dir: Option<PathBuf>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    /// Spawn the audio thread. Media events are delivered on the returned receiver.
    pub fn new(base_dir: Option<PathBuf>) -> (Self, Receiver<MediaEvent>) {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (events_tx, events_rx) = mpsc::channel::<MediaEvent>();

        let audio_handle = spawn_audio_thread(rx, events_tx.clone());

        let player = Self {
            tx,
            events: events_tx,
            base_dir,
            join: Mutex::new(Some(audio_handle)),
        };
        (player, events_rx)
    }

    /// A player whose audio thread has already gone away.
    #[cfg(test)]
    pub(super) fn detached(base_dir: Option<PathBuf>) -> (Self, Receiver<MediaEvent>) {
        let (tx, _) = mpsc::channel::<AudioCmd>();
        let (events_tx, events_rx) = mpsc::channel::<MediaEvent>();
        let player = Self {
            tx,
            events: events_tx,
            base_dir,
            join: Mutex::new(None),
        };
        (player, events_rx)
    }

    fn send(&self, cmd: AudioCmd) -> Result<(), mpsc::SendError<AudioCmd>> {
        self.tx.send(cmd)
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl MediaBackend for AudioPlayer {
    fn load(&mut self, load: LoadId, locator: &str) {
        let path = resolve_locator(locator, self.base_dir.as_deref());
        if self.send(AudioCmd::Load { load, path }).is_err() {
            let _ = self.events.send(MediaEvent::Error {
                load,
                error: PlaybackError::resource_unavailable("audio thread is not running"),
            });
        }
    }

    fn play(&mut self, ticket: PlayTicket) {
        if self.send(AudioCmd::Play(ticket)).is_err() {
            let _ = self.events.send(MediaEvent::PlayResolved {
                ticket,
                result: Err(PlaybackError::playback_rejected("audio thread is not running")),
            });
        }
    }

    fn pause(&mut self) {
        let _ = self.send(AudioCmd::Pause);
    }

    fn set_position(&mut self, secs: f64) {
        let _ = self.send(AudioCmd::Seek(secs));
    }

    fn set_volume(&mut self, volume: f32) {
        let _ = self.send(AudioCmd::SetVolume(volume));
    }
}
