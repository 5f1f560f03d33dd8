use tracing::{debug, info, warn};

use crate::audio::{LoadId, MediaBackend, MediaEvent, PlayTicket};
use crate::config::PlaybackSettings;
use crate::error::{CommandError, PlaybackError};
use crate::playlist::Playlist;

use super::state::{LoadStatus, PlaybackSnapshot, PlaybackState};

/// Tunables of the controller.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ControllerPolicy {
    pub initial_volume: f32,
    /// `previous()` later than this many seconds into a track restarts it.
    pub restart_threshold_secs: f64,
}

impl Default for ControllerPolicy {
    fn default() -> Self {
        Self {
            initial_volume: 0.7,
            restart_threshold_secs: 3.0,
        }
    }
}

impl From<&PlaybackSettings> for ControllerPolicy {
    fn from(s: &PlaybackSettings) -> Self {
        Self {
            initial_volume: s.initial_volume,
            restart_threshold_secs: s.restart_threshold_secs,
        }
    }
}

/// Why a play request was issued. Automatic continuations fail silently.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum PlayOrigin {
    User,
    Autoplay,
    Continuation,
}

#[derive(Debug, Copy, Clone)]
struct PendingPlay {
    ticket: PlayTicket,
    index: usize,
    origin: PlayOrigin,
}

/// Result of `attempt_autoplay_if_permitted`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AutoplayOutcome {
    /// No user gesture recorded yet.
    NoInteraction,
    /// Autoplay already ran, or the user started playback themselves.
    AlreadyAttempted,
    /// Something is already playing or about to.
    AlreadyActive,
    NotReady,
    Requested,
}

/// Single authority over transport state.
///
/// Commands come from the host one at a time; media reports come back through
/// `handle_event`. The controller never renders, it only updates its state
/// and tells the backend what to do.
pub struct PlaybackController<B: MediaBackend> {
    playlist: Playlist,
    backend: B,
    policy: ControllerPolicy,
    state: PlaybackState,
    load_id: LoadId,
    next_ticket: u64,
    pending_play: Option<PendingPlay>,
    /// Play again as soon as the newly loaded track is ready.
    resume_on_ready: bool,
    autoplay_attempted: bool,
}

impl<B: MediaBackend> PlaybackController<B> {
    /// Take ownership of `backend` and start loading the first track.
    pub fn new(playlist: Playlist, backend: B, policy: ControllerPolicy) -> Self {
        let volume = if policy.initial_volume.is_nan() {
            ControllerPolicy::default().initial_volume
        } else {
            policy.initial_volume.clamp(0.0, 1.0)
        };

        let mut controller = Self {
            playlist,
            backend,
            policy,
            state: PlaybackState::new(volume),
            load_id: LoadId(0),
            next_ticket: 1,
            pending_play: None,
            resume_on_ready: false,
            autoplay_attempted: false,
        };
        controller.backend.set_volume(volume);
        controller.begin_load();
        controller
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        let s = &self.state;
        PlaybackSnapshot {
            track: self.playlist.track(s.current_index).clone(),
            index: s.current_index,
            is_playing: s.is_playing,
            position_secs: s.position_secs,
            duration_secs: s.duration_secs,
            volume: s.volume,
            load_status: s.load_status.clone(),
            has_user_interacted: s.has_user_interacted,
        }
    }

    /// Record a user gesture. Latches; never resets.
    pub fn notify_user_interacted(&mut self) {
        if !self.state.has_user_interacted {
            debug!("first user interaction recorded");
            self.state.has_user_interacted = true;
        }
    }

    pub fn toggle_play(&mut self) {
        self.notify_user_interacted();
        if self.playback_active() {
            self.pause_now();
        } else {
            self.autoplay_attempted = true;
            self.request_play(PlayOrigin::User);
        }
    }

    /// Start playback unless it is already running or requested.
    pub fn play(&mut self) {
        if !self.playback_active() {
            self.toggle_play();
        } else {
            self.notify_user_interacted();
        }
    }

    /// Pause, cancelling any outstanding play request or pending resume.
    pub fn pause(&mut self) {
        self.notify_user_interacted();
        if self.playback_active() {
            self.pause_now();
        }
    }

    pub fn next(&mut self) {
        self.notify_user_interacted();
        let resume = self.playback_active();
        let index = self.playlist.next_index(self.state.current_index);
        self.switch_to(index, resume);
    }

    /// Restart the current track when past the threshold, otherwise go back one track.
    pub fn previous(&mut self) {
        self.notify_user_interacted();
        if self.state.position_secs > self.policy.restart_threshold_secs {
            debug!(
                position = self.state.position_secs,
                "restarting current track"
            );
            self.state.position_secs = 0.0;
            self.backend.set_position(0.0);
            return;
        }
        let resume = self.playback_active();
        let index = self.playlist.prev_index(self.state.current_index);
        self.switch_to(index, resume);
    }

    /// Jump to `fraction` of the track. Refused, with no state change, unless
    /// the track is ready and its duration known.
    pub fn seek(&mut self, fraction: f64) -> Result<(), CommandError> {
        if !self.state.load_status.is_ready() {
            return Err(CommandError::NotReady(self.state.load_status.label()));
        }
        if !fraction.is_finite() {
            return Err(CommandError::InvalidFraction(fraction));
        }
        let Some(duration) = self.state.duration_secs else {
            return Err(CommandError::DurationUnknown);
        };

        self.notify_user_interacted();
        let secs = fraction.clamp(0.0, 1.0) * duration;
        self.state.position_secs = secs;
        self.backend.set_position(secs);
        Ok(())
    }

    /// Set the volume, clamped into `[0, 1]`. NaN is ignored.
    pub fn set_volume(&mut self, volume: f32) {
        self.notify_user_interacted();
        if volume.is_nan() {
            return;
        }
        let volume = volume.clamp(0.0, 1.0);
        self.state.volume = volume;
        self.backend.set_volume(volume);
    }

    /// Continuous-playlist advance: always tries to keep playing.
    pub fn on_track_ended(&mut self) {
        let index = self.playlist.next_index(self.state.current_index);
        self.switch_to(index, true);
    }

    /// Start playback on behalf of the host once a gesture has been recorded
    /// and the track is ready. Attempted at most once.
    pub fn attempt_autoplay_if_permitted(&mut self) -> AutoplayOutcome {
        if !self.state.has_user_interacted {
            return AutoplayOutcome::NoInteraction;
        }
        if self.autoplay_attempted {
            return AutoplayOutcome::AlreadyAttempted;
        }
        if self.playback_active() {
            return AutoplayOutcome::AlreadyActive;
        }
        if !self.state.load_status.is_ready() {
            return AutoplayOutcome::NotReady;
        }
        self.autoplay_attempted = true;
        self.request_play(PlayOrigin::Autoplay);
        AutoplayOutcome::Requested
    }

    /// Route one backend report into the state machine.
    pub fn handle_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::PlayResolved { ticket, result } => self.resolve_play(ticket, result),
            MediaEvent::CanPlay { load } if load == self.load_id => {
                self.state.load_status = LoadStatus::Ready;
                self.on_ready();
            }
            MediaEvent::DurationKnown { load, secs } if load == self.load_id => {
                if secs.is_finite() && secs >= 0.0 {
                    self.state.duration_secs = Some(secs);
                    self.state.position_secs = self.state.position_secs.min(secs);
                }
                if self.state.load_status == LoadStatus::Loading {
                    self.state.load_status = LoadStatus::Ready;
                    self.on_ready();
                }
            }
            MediaEvent::TimeUpdate { load, secs } if load == self.load_id => {
                let mut secs = secs.max(0.0);
                if let Some(d) = self.state.duration_secs {
                    secs = secs.min(d);
                }
                self.state.position_secs = secs;
            }
            MediaEvent::Ended { load } if load == self.load_id => self.on_track_ended(),
            MediaEvent::Error { load, error } if load == self.load_id => {
                warn!(
                    track = self.playlist.track(self.state.current_index).id,
                    %error,
                    "track failed"
                );
                self.pending_play = None;
                self.resume_on_ready = false;
                self.state.is_playing = false;
                self.state.load_status = LoadStatus::Failed(error);
            }
            other => debug!(?other, "ignoring event from a previous load"),
        }
    }

    /// Stop reacting to the backend: later reports and play results are ignored.
    pub fn teardown(&mut self) {
        self.load_id = LoadId(self.load_id.0 + 1);
        self.pending_play = None;
        self.resume_on_ready = false;
        self.state.is_playing = false;
        self.backend.pause();
    }

    /// Playing, waiting on a play request, or waiting to resume after a switch.
    fn playback_active(&self) -> bool {
        self.state.is_playing || self.pending_play.is_some() || self.resume_on_ready
    }

    fn pause_now(&mut self) {
        if let Some(p) = self.pending_play.take() {
            debug!(ticket = p.ticket.0, "cancelling outstanding play request");
        }
        self.resume_on_ready = false;
        self.state.is_playing = false;
        self.backend.pause();
    }

    fn request_play(&mut self, origin: PlayOrigin) {
        let ticket = PlayTicket(self.next_ticket);
        self.next_ticket += 1;
        self.pending_play = Some(PendingPlay {
            ticket,
            index: self.state.current_index,
            origin,
        });
        debug!(ticket = ticket.0, ?origin, "requesting playback");
        self.backend.play(ticket);
    }

    fn resolve_play(&mut self, ticket: PlayTicket, result: Result<(), PlaybackError>) {
        let pending = match self.pending_play {
            Some(p) if p.ticket == ticket && p.index == self.state.current_index => {
                self.pending_play.take()
            }
            _ => None,
        };

        let Some(pending) = pending else {
            debug!(ticket = ticket.0, "discarding stale play completion");
            // A late success must not leave audio running that nobody asked for.
            if result.is_ok() && !self.playback_active() {
                self.backend.pause();
            }
            return;
        };

        match result {
            Ok(()) => {
                self.state.is_playing = true;
                if matches!(self.state.load_status, LoadStatus::Failed(_)) {
                    self.state.load_status = LoadStatus::Ready;
                }
            }
            Err(error) => {
                self.state.is_playing = false;
                match pending.origin {
                    PlayOrigin::Continuation => {
                        debug!(%error, "automatic continuation could not start playback");
                    }
                    PlayOrigin::User | PlayOrigin::Autoplay => {
                        info!(%error, "playback request failed");
                        self.state.load_status = LoadStatus::Failed(error);
                    }
                }
            }
        }
    }

    fn on_ready(&mut self) {
        if self.resume_on_ready {
            self.resume_on_ready = false;
            self.request_play(PlayOrigin::Continuation);
        }
    }

    fn switch_to(&mut self, index: usize, resume: bool) {
        if let Some(p) = self.pending_play.take() {
            debug!(ticket = p.ticket.0, "dropping play request for previous track");
        }
        self.state.current_index = index;
        self.state.is_playing = false;
        self.state.position_secs = 0.0;
        self.state.duration_secs = None;
        self.resume_on_ready = resume;

        let track = self.playlist.track(index);
        info!(index, id = track.id, name = %track.name, resume, "switching track");
        self.begin_load();
    }

    fn begin_load(&mut self) {
        self.load_id = LoadId(self.load_id.0 + 1);
        self.state.load_status = LoadStatus::Loading;
        let track = self.playlist.track(self.state.current_index);
        self.backend.load(self.load_id, &track.source);
    }
}
