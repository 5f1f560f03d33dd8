use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, warn};

use crate::error::PlaybackError;

use super::backend::{LoadId, MediaEvent};
use super::sink::{create_sink_at, probe};
use super::types::AudioCmd;

/// How often the thread reports playback position and checks for the end of a track.
const TICK: Duration = Duration::from_millis(200);

/// The track currently loaded on the audio thread.
pub(super) struct Loaded {
    pub(super) load: LoadId,
    pub(super) path: PathBuf,
    pub(super) duration: Option<Duration>,
    /// `None` when there is no output device to play on.
    pub(super) sink: Option<Sink>,
    pub(super) paused: bool,
    // Track start time and accumulated elapsed when paused.
    pub(super) started_at: Option<Instant>,
    pub(super) accumulated: Duration,
}

impl Loaded {
    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    fn pause(&mut self) {
        if self.paused {
            return;
        }
        if let Some(s) = self.sink.as_ref() {
            s.pause();
        }
        if let Some(st) = self.started_at.take() {
            self.accumulated += st.elapsed();
        }
        self.paused = true;
    }
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<MediaEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut s) => {
                // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
                // but noisy for a TUI app.
                s.log_on_drop(false);
                Some(s)
            }
            Err(e) => {
                warn!(error = %e, "no audio output device, play requests will be rejected");
                None
            }
        };

        // The controller sends the real volume before the first load.
        let mut volume = 1.0;
        let mut current: Option<Loaded> = None;
        let mut last_tick = Instant::now();

        loop {
            // Steady command traffic must not starve position reports.
            match rx.recv_timeout(TICK.saturating_sub(last_tick.elapsed())) {
                Ok(cmd) => match cmd {
                    AudioCmd::Load { load, path } => {
                        if let Some(old) = current.take() {
                            if let Some(s) = old.sink.as_ref() {
                                s.stop();
                            }
                        }
                        current = do_load(stream.as_ref(), load, path, volume, &events);
                    }

                    AudioCmd::Play(ticket) => {
                        let result = do_play(stream.as_ref(), current.as_mut(), volume, &events);
                        if let Err(ref e) = result {
                            debug!(ticket = ticket.0, error = %e, "play request rejected");
                        }
                        let _ = events.send(MediaEvent::PlayResolved { ticket, result });
                    }

                    AudioCmd::Pause => {
                        if let Some(cur) = current.as_mut() {
                            cur.pause();
                        }
                    }

                    AudioCmd::Seek(secs) => {
                        if let Some(cur) = current.as_mut() {
                            do_seek(stream.as_ref(), cur, secs, volume, &events);
                        }
                    }

                    AudioCmd::SetVolume(v) => {
                        volume = v;
                        if let Some(s) = current.as_ref().and_then(|c| c.sink.as_ref()) {
                            s.set_volume(v);
                        }
                    }

                    AudioCmd::Quit { fade_out_ms } => {
                        if let Some(cur) = current.as_ref() {
                            if let Some(s) = cur.sink.as_ref() {
                                if !cur.paused {
                                    fade_out_sink(s, volume, fade_out_ms);
                                }
                                s.stop();
                            }
                        }
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            if last_tick.elapsed() >= TICK {
                last_tick = Instant::now();
                if let Some(cur) = current.as_mut() {
                    report_progress(cur, &events);
                }
            }
        }
    })
}

/// Send the position of a playing track and detect its end.
pub(super) fn report_progress(cur: &mut Loaded, events: &Sender<MediaEvent>) {
    if cur.paused {
        return;
    }
    let _ = events.send(MediaEvent::TimeUpdate {
        load: cur.load,
        secs: cur.elapsed().as_secs_f64(),
    });
    if cur.sink.as_ref().is_some_and(|s| s.empty()) {
        cur.pause();
        let _ = events.send(MediaEvent::Ended { load: cur.load });
    }
}

pub(super) fn do_load(
    stream: Option<&OutputStream>,
    load: LoadId,
    path: PathBuf,
    volume: f32,
    events: &Sender<MediaEvent>,
) -> Option<Loaded> {
    let opened = probe(&path).and_then(|duration| {
        let sink = stream
            .map(|s| create_sink_at(s, &path, Duration::ZERO, volume))
            .transpose()?;
        Ok((duration, sink))
    });

    match opened {
        Ok((duration, sink)) => {
            if let Some(d) = duration {
                let _ = events.send(MediaEvent::DurationKnown {
                    load,
                    secs: d.as_secs_f64(),
                });
            }
            let _ = events.send(MediaEvent::CanPlay { load });
            Some(Loaded {
                load,
                path,
                duration,
                sink,
                paused: true,
                started_at: None,
                accumulated: Duration::ZERO,
            })
        }
        Err(error) => {
            warn!(path = %path.display(), error = %error, "failed to load track");
            let _ = events.send(MediaEvent::Error { load, error });
            None
        }
    }
}

pub(super) fn do_play(
    stream: Option<&OutputStream>,
    current: Option<&mut Loaded>,
    volume: f32,
    events: &Sender<MediaEvent>,
) -> Result<(), PlaybackError> {
    let Some(cur) = current else {
        return Err(PlaybackError::playback_rejected("no track loaded"));
    };
    let Some(stream) = stream else {
        return Err(PlaybackError::playback_rejected("no audio output device"));
    };

    // A finished sink has nothing left to play; start the track over.
    if cur.sink.as_ref().is_none_or(|s| s.empty()) {
        if let Some(s) = cur.sink.take() {
            s.stop();
        }
        cur.sink = Some(create_sink_at(stream, &cur.path, Duration::ZERO, volume)?);
        cur.accumulated = Duration::ZERO;
        let _ = events.send(MediaEvent::TimeUpdate {
            load: cur.load,
            secs: 0.0,
        });
    }

    if cur.paused {
        if let Some(s) = cur.sink.as_ref() {
            s.play();
        }
        cur.started_at = Some(Instant::now());
        cur.paused = false;
    }
    Ok(())
}

/// Rebuild the sink at `secs` using `Source::skip_duration`. Seeking to or
/// past the known end finishes the track instead.
pub(super) fn do_seek(
    stream: Option<&OutputStream>,
    cur: &mut Loaded,
    secs: f64,
    volume: f32,
    events: &Sender<MediaEvent>,
) {
    let target = Duration::from_secs_f64(secs.max(0.0));

    if cur.duration.is_some_and(|d| target >= d) {
        if let Some(s) = cur.sink.take() {
            s.stop();
        }
        cur.pause();
        cur.started_at = None;
        cur.accumulated = target;
        let _ = events.send(MediaEvent::Ended { load: cur.load });
        return;
    }

    let Some(stream) = stream else {
        cur.accumulated = target;
        return;
    };
    if let Some(s) = cur.sink.take() {
        s.stop();
    }
    match create_sink_at(stream, &cur.path, target, volume) {
        Ok(sink) => {
            if !cur.paused {
                sink.play();
            }
            cur.sink = Some(sink);
            cur.accumulated = target;
            cur.started_at = (!cur.paused).then(Instant::now);
        }
        Err(error) => {
            cur.paused = true;
            cur.started_at = None;
            let _ = events.send(MediaEvent::Error {
                load: cur.load,
                error,
            });
        }
    }
}

fn fade_out_sink(sink: &Sink, from: f32, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(from * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}
