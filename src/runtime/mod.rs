use std::env;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::audio::AudioPlayer;
use crate::controller::{ControllerPolicy, PlaybackController};
use crate::mpris::ControlCmd;

mod event_loop;
mod logging;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();
    logging::init(&settings.log);

    let paths: Vec<PathBuf> = env::args_os().skip(1).map(PathBuf::from).collect();
    let playlist = startup::build_playlist(&paths, &settings.playlist)?;
    info!(tracks = playlist.len(), "starting cadence");

    let (audio_player, media_rx) = AudioPlayer::new(settings.playlist.base_dir.clone());
    let mut controller = PlaybackController::new(
        playlist,
        audio_player,
        ControllerPolicy::from(&settings.playback),
    );

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);
    mpris.publish(&controller.snapshot());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = event_loop::EventLoopState::new();
    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut controller,
        &media_rx,
        &mpris,
        &control_rx,
        &mut state,
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    controller
        .backend()
        .quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
    controller.teardown();
    info!("shut down");

    run_result
}
