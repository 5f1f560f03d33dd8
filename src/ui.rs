//! UI rendering helpers for the terminal user interface.
//!
//! Everything drawn here comes from a `PlaybackSnapshot`; the UI never talks
//! to the controller directly.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::config::{ControlsSettings, UiSettings};
use crate::controller::{LoadStatus, PlaybackSnapshot};
use crate::playlist::Playlist;

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("space/p", "play/pause");
    map.insert("h/l", "prev/next track");
    // H/L and +/- are filled dynamically from config.
    map.insert("0-9", "jump to 0-90%");
    map.insert("q", "quit");
    map
});

/// Render the controls help text, incorporating the configured steps.
fn controls_text(controls: &ControlsSettings) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = ["space/p", "h/l", "H/L", "0-9", "+/-", "q"];
    order
        .iter()
        .filter_map(|k| match *k {
            "H/L" => Some(format!(
                "[H/L] seek -/+{}%",
                (controls.seek_step * 100.0).round()
            )),
            "+/-" => Some(format!(
                "[+/-] volume {}%",
                (controls.volume_step * 100.0).round()
            )),
            _ => CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v)),
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format seconds as `m:ss`; unknown or invalid values render as `0:00`.
fn format_time(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return "0:00".to_string();
    }
    let total = secs.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// One-word transport state for the now-playing box.
fn transport_text(s: &PlaybackSnapshot) -> &'static str {
    if s.is_playing {
        return "Playing";
    }
    match s.load_status {
        LoadStatus::Idle => "Idle",
        LoadStatus::Loading => "Loading",
        LoadStatus::Ready => "Paused",
        LoadStatus::Failed(_) => "Stopped",
    }
}

/// Message line under the track name: errors first, then the start hint.
fn message_text(s: &PlaybackSnapshot) -> Option<&'static str> {
    if let Some(e) = s.error() {
        return Some(e.user_message());
    }
    if !s.has_user_interacted {
        return Some("Press any key to start the music");
    }
    None
}

fn time_text(s: &PlaybackSnapshot, ui: &UiSettings) -> String {
    format!(
        "{}{}{}",
        format_time(s.position_secs),
        ui.time_separator,
        format_time(s.duration_secs.unwrap_or(f64::NAN))
    )
}

/// Render the entire UI into the provided `frame` from `snapshot`.
pub fn draw(
    frame: &mut Frame,
    snapshot: &PlaybackSnapshot,
    playlist: &Playlist,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" cadence ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let mut now_playing = format!(
        "{} • {}",
        snapshot.track.name,
        transport_text(snapshot)
    );
    if let Some(msg) = message_text(snapshot) {
        now_playing.push('\n');
        now_playing.push_str(msg);
    }
    let now_playing = Paragraph::new(now_playing)
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" now playing "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(now_playing, chunks[1]);

    let progress = Gauge::default()
        .block(Block::bordered().title(" progress "))
        .ratio(snapshot.progress())
        .label(time_text(snapshot, ui_settings));
    frame.render_widget(progress, chunks[2]);

    let volume = f64::from(snapshot.volume).clamp(0.0, 1.0);
    let volume_gauge = Gauge::default()
        .block(Block::bordered().title(" volume "))
        .ratio(volume)
        .label(format!("{:.0}%", volume * 100.0));
    frame.render_widget(volume_gauge, chunks[3]);

    let items: Vec<ListItem> = playlist
        .tracks()
        .iter()
        .map(|t| ListItem::new(t.name.as_str()))
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" playlist "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(snapshot.index));
    frame.render_stateful_widget(list, chunks[4], &mut state);

    let footer = Paragraph::new(controls_text(controls_settings))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[5]);
}
