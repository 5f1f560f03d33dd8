use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, info};

use crate::audio::{AudioPlayer, MediaEvent};
use crate::config;
use crate::controller::{AutoplayOutcome, PlaybackController, PlaybackSnapshot};
use crate::mpris::{ControlCmd, MprisHandle};
use crate::ui;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Last snapshot drawn and published to MPRIS.
    last_snapshot: Option<PlaybackSnapshot>,
    needs_redraw: bool,
}

impl EventLoopState {
    pub fn new() -> Self {
        Self {
            last_snapshot: None,
            needs_redraw: true,
        }
    }
}

/// Main terminal event loop: feeds media reports and commands into the
/// controller, redraws on change and keeps MPRIS in sync. Returns `Ok(())`
/// when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    controller: &mut PlaybackController<AudioPlayer>,
    media_rx: &Receiver<MediaEvent>,
    mpris: &MprisHandle,
    control_rx: &Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        while let Ok(ev) = media_rx.try_recv() {
            controller.handle_event(ev);
        }

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, controller) {
                return Ok(());
            }
        }

        if settings.playback.autoplay
            && controller.attempt_autoplay_if_permitted() == AutoplayOutcome::Requested
        {
            info!("autoplay requested after first interaction");
        }

        let snapshot = controller.snapshot();
        if state.last_snapshot.as_ref() != Some(&snapshot) {
            mpris.publish(&snapshot);
            state.needs_redraw = true;
        }
        if state.needs_redraw {
            terminal.draw(|f| {
                ui::draw(
                    f,
                    &snapshot,
                    controller.playlist(),
                    &settings.ui,
                    &settings.controls,
                )
            })?;
            state.needs_redraw = false;
        }
        state.last_snapshot = Some(snapshot);

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if handle_key_event(key, settings, controller) {
                        break;
                    }
                }
                Event::Resize(_, _) => state.needs_redraw = true,
                _ => {}
            }
        }
    }

    Ok(())
}

/// Apply a command from MPRIS. Returns `true` when the app should quit.
fn handle_control_cmd(
    cmd: ControlCmd,
    controller: &mut PlaybackController<AudioPlayer>,
) -> bool {
    debug!(?cmd, "control command");
    match cmd {
        ControlCmd::Quit => return true,
        ControlCmd::Play => controller.play(),
        ControlCmd::Pause => controller.pause(),
        ControlCmd::PlayPause => controller.toggle_play(),
        ControlCmd::Next => controller.next(),
        ControlCmd::Previous => controller.previous(),
    }
    false
}

/// Apply a key press. Returns `true` when the app should quit.
fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    controller: &mut PlaybackController<AudioPlayer>,
) -> bool {
    // Any key counts as the gesture that unlocks autoplay.
    controller.notify_user_interacted();

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Char(' ') | KeyCode::Char('p') => controller.toggle_play(),
        KeyCode::Char('l') | KeyCode::Char('n') | KeyCode::Right => controller.next(),
        KeyCode::Char('h') | KeyCode::Left => controller.previous(),
        KeyCode::Char('L') => seek_by(controller, settings.controls.seek_step),
        KeyCode::Char('H') => seek_by(controller, -settings.controls.seek_step),
        KeyCode::Char(c @ '0'..='9') => {
            let tenth = f64::from(c.to_digit(10).unwrap_or(0)) / 10.0;
            seek_to(controller, tenth);
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let v = controller.state().volume + settings.controls.volume_step;
            controller.set_volume(v);
        }
        KeyCode::Char('-') => {
            let v = controller.state().volume - settings.controls.volume_step;
            controller.set_volume(v);
        }
        _ => {}
    }
    false
}

fn seek_by(controller: &mut PlaybackController<AudioPlayer>, step: f64) {
    let s = controller.state();
    let fraction = match s.duration_secs {
        Some(d) if d > 0.0 => s.position_secs / d + step,
        _ => step,
    };
    seek_to(controller, fraction);
}

fn seek_to(controller: &mut PlaybackController<AudioPlayer>, fraction: f64) {
    if let Err(e) = controller.seek(fraction) {
        debug!(error = %e, fraction, "seek ignored");
    }
}
