use crossterm::event::{KeyCode, KeyEvent};
use handhit::session::Phase;
use ratatui::Frame;

use crate::{
    ui::{board_area, end_message, render_overlay, start_message},
    App, Mode,
};

/// A UI Screen boundary: responsible for rendering and optional key handling
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
    /// Optional per-screen key handling. Returns true if the key was handled.
    fn on_key(&mut self, _key: KeyEvent, _app: &mut App) -> bool {
        false
    }
}

/// Before the first session: board plus the start prompt
pub struct ReadyScreen;

impl Screen for ReadyScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(app, f.area());
        render_overlay(&start_message(), board_area(f.area()), f.buffer_mut());
    }

    fn on_key(&mut self, key: KeyEvent, app: &mut App) -> bool {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                app.start_or_restart();
                true
            }
            _ => false,
        }
    }
}

/// A session in progress
pub struct PlayScreen;

impl Screen for PlayScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(app, f.area());
    }
}

/// Countdown ran out: frozen board plus the results box
pub struct EndedScreen;

impl Screen for EndedScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(app, f.area());
        let session = app.game.session();
        render_overlay(
            &end_message(session.score(), session.tallies()),
            board_area(f.area()),
            f.buffer_mut(),
        );
    }

    fn on_key(&mut self, key: KeyEvent, app: &mut App) -> bool {
        match key.code {
            KeyCode::Enter => {
                app.start_or_restart();
                true
            }
            _ => false,
        }
    }
}

/// Free-play pads, no clock
pub struct WarmupScreen;

impl Screen for WarmupScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(app, f.area());
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(app: &App) -> Box<dyn Screen> {
    match (app.mode, app.game.phase()) {
        (Mode::Warmup, _) => Box::new(WarmupScreen),
        (Mode::Play, Phase::Ready) => Box::new(ReadyScreen),
        (Mode::Play, Phase::Running) => Box::new(PlayScreen),
        (Mode::Play, Phase::Ended) => Box::new(EndedScreen),
    }
}
