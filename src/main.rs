mod ui;

use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
    sync::Mutex,
    time::Duration,
};

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyCode, KeyModifiers, MouseButton, MouseEvent,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use handhit::{
    app_dirs,
    chance::{Chance, RngChance},
    config::{Config, ConfigStore, FileConfigStore},
    feed::{FrameSource, PointerFeed, ReplayFeed},
    game::Game,
    geometry::HandPoints,
    landmark::{HandSide, LandmarkFrame},
    runtime::{Clock, CrosstermEventSource, FixedTicker, GameEvent, Runner, SystemClock},
    session::Phase,
    timers::Millis,
    warmup::WarmupPad,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Terminal,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::ui::screen::current_screen;

/// hit the glowing targets with the matching hand before the clock runs out
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Targets light up magenta (left hand) or red (right hand). Move the matching hand into a lit target before it fades: +100 for the right hand, -50 for the wrong one. Hands come from a landmark recording (--replay) or from the mouse: hold the left or right button to move that hand."
)]
pub struct Cli {
    /// number of seconds in a session
    #[clap(short = 's', long)]
    secs: Option<u32>,

    /// play back a JSON-lines landmark recording instead of using the mouse
    #[clap(short = 'r', long)]
    replay: Option<PathBuf>,

    /// open the warm-up pad instead of the game
    #[clap(short = 'w', long)]
    warmup: bool,

    /// seed for target timing and hand choice
    #[clap(long)]
    seed: Option<u64>,

    /// config file to use instead of the per-user one
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// write the effective settings back to the config file
    #[clap(long)]
    save_config: bool,

    /// where to write logs (filter with HANDHIT_LOG)
    #[clap(long)]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Play,
    Warmup,
}

#[derive(Debug)]
pub struct App {
    pub game: Game,
    pub mode: Mode,
    pub warmup: WarmupPad,
    pub pointer: PointerFeed,
    pub replay: Option<ReplayFeed>,
    pub last_frame: LandmarkFrame,
    pub clock: SystemClock,
}

impl App {
    pub fn new(config: &Config, chance: Box<dyn Chance>, replay: Option<ReplayFeed>, mode: Mode) -> Self {
        Self {
            game: Game::new(config, chance),
            mode,
            warmup: WarmupPad::default(),
            pointer: PointerFeed::new(),
            replay,
            last_frame: LandmarkFrame::empty(),
            clock: SystemClock::new(),
        }
    }

    pub fn start_or_restart(&mut self) {
        self.restart_at(self.clock.now_ms());
    }

    fn restart_at(&mut self, now: Millis) {
        self.mode = Mode::Play;
        if let Some(replay) = self.replay.as_mut() {
            replay.restart();
        }
        self.game.start_or_restart(now);
    }

    fn source(&mut self) -> &mut dyn FrameSource {
        match self.replay.as_mut() {
            Some(replay) => replay,
            None => &mut self.pointer,
        }
    }

    /// One render frame: pull landmarks, advance the game or the pad
    pub fn on_tick(&mut self) {
        self.tick_at(self.clock.now_ms());
    }

    fn tick_at(&mut self, now: Millis) {
        // a recording only counts frames it just released; the last one stays on screen
        let frame = self.source().next_frame(now);
        if let Some(frame) = &frame {
            self.last_frame = frame.clone();
        }
        let frame = frame.unwrap_or_default();

        match self.mode {
            Mode::Play => {
                self.game.on_frame(&frame, now);
            }
            Mode::Warmup => {
                let hands = HandPoints::from_frame(&frame, self.game.canvas());
                self.warmup.update(&hands);
            }
        }
    }

    pub fn toggle_warmup(&mut self) {
        if self.game.phase() == Phase::Running {
            return;
        }
        self.mode = match self.mode {
            Mode::Play => Mode::Warmup,
            Mode::Warmup => Mode::Play,
        };
    }

    /// Mouse buttons stand in for hands while no recording is playing
    pub fn on_mouse(&mut self, mouse: MouseEvent, screen: Rect) {
        if self.replay.is_some() {
            return;
        }
        let side = match mouse.kind {
            MouseEventKind::Down(b) | MouseEventKind::Drag(b) | MouseEventKind::Up(b) => match b {
                MouseButton::Left => HandSide::Left,
                MouseButton::Right => HandSide::Right,
                MouseButton::Middle => return,
            },
            _ => return,
        };

        match mouse.kind {
            MouseEventKind::Up(_) => self.pointer.release(side),
            _ => match ui::normalize_cell(mouse.column, mouse.row, ui::board_inner(screen)) {
                Some((x, y)) => self.pointer.press(side, x, y),
                None => self.pointer.release(side),
            },
        }
    }
}

fn init_logging(log_file: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let Some(path) = log_file.or_else(app_dirs::log_path) else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("HANDHIT_LOG").unwrap_or_else(|_| "handhit=info".into()),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let store = match &cli.config {
        Some(path) => FileConfigStore::with_path(path),
        None => FileConfigStore::new(),
    };
    let mut config = store.load();
    if let Some(secs) = cli.secs {
        config.time_budget_secs = secs;
    }
    if cli.save_config {
        store.save(&config)?;
    }

    init_logging(cli.log_file.clone())?;
    info!("handhit v{} starting", env!("CARGO_PKG_VERSION"));

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let replay = cli.replay.as_ref().map(ReplayFeed::open).transpose()?;
    let chance: Box<dyn Chance> = match cli.seed {
        Some(seed) => Box::new(RngChance::seeded(seed)),
        None => Box::new(RngChance::from_entropy()),
    };
    let mode = if cli.warmup { Mode::Warmup } else { Mode::Play };
    let mut app = App::new(&config, chance, replay, mode);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app, config.frame_interval_ms);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen,
    )?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    frame_interval_ms: u64,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(frame_interval_ms)),
    );

    loop {
        match runner.step() {
            GameEvent::Tick => app.on_tick(),
            GameEvent::Resize => {}
            GameEvent::Mouse(mouse) => {
                let size = terminal.size()?;
                app.on_mouse(mouse, Rect::new(0, 0, size.width, size.height));
            }
            GameEvent::Key(key) => {
                if key.code == KeyCode::Esc
                    || (key.modifiers.contains(KeyModifiers::CONTROL)
                        && key.code == KeyCode::Char('c'))
                {
                    break;
                }

                let mut screen = current_screen(app);
                if !screen.on_key(key, app) {
                    match key.code {
                        KeyCode::Char('r') => app.start_or_restart(),
                        KeyCode::Char('w') => app.toggle_warmup(),
                        _ => debug!(?key, "unbound key"),
                    }
                }
            }
        }

        terminal.draw(|f| current_screen(app).render(app, f))?;
    }

    info!(
        score = app.game.session().score(),
        phase = %app.game.phase(),
        "quitting"
    );
    Ok(())
}
