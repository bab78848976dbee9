use std::io::Write;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use handhit::chance::{RngChance, ScriptedChance};
use handhit::config::Config;
use handhit::feed::{FrameSource, PointerFeed, ReplayFeed};
use handhit::game::Game;
use handhit::landmark::HandSide;
use handhit::runtime::{Clock, FixedTicker, GameEvent, ManualClock, Runner, TestEventSource};
use handhit::session::Phase;
use handhit::target::Outcome;

const FRAME_MS: u64 = 33;

fn enter() -> GameEvent {
    GameEvent::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))
}

// Headless loop using the internal runtime without a TTY: Enter starts a
// session, every tick advances the manual clock by one frame.
fn drive(
    game: &mut Game,
    source: &mut dyn FrameSource,
    events: Vec<GameEvent>,
    max_steps: u32,
    until: impl Fn(&Game) -> bool,
) -> Vec<Outcome> {
    let (tx, rx) = mpsc::channel();
    for ev in events {
        tx.send(ev).unwrap();
    }
    drop(tx);

    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );
    let clock = ManualClock::new(0);
    let mut outcomes = Vec::new();

    for _ in 0..max_steps {
        match runner.step() {
            GameEvent::Key(key) if key.code == KeyCode::Enter => {
                source.restart();
                game.start_or_restart(clock.now_ms());
            }
            GameEvent::Tick => {
                clock.advance(FRAME_MS);
                let now = clock.now_ms();
                if let Some(frame) = source.next_frame(now) {
                    outcomes.extend(game.on_frame(&frame, now).iter().map(|h| h.outcome));
                } else {
                    game.advance_to(now);
                }
            }
            _ => {}
        }
        if until(game) {
            break;
        }
    }
    outcomes
}

#[test]
fn headless_pointer_session_runs_to_the_end() {
    let config = Config {
        time_budget_secs: 5,
        ..Config::default()
    };
    let mut game = Game::new(&config, Box::new(RngChance::seeded(7)));
    let mut pointer = PointerFeed::new();
    // resting the left hand on the first target
    pointer.press(HandSide::Left, 0.125, 0.25);

    let outcomes = drive(&mut game, &mut pointer, vec![enter()], 1_000, |g| {
        g.phase() == Phase::Ended
    });

    assert_eq!(game.phase(), Phase::Ended);
    assert_eq!(game.session().time_remaining(), 0);
    assert_eq!(game.timers().live_count(), 0);

    let tallies = game.session().tallies();
    assert_eq!(tallies.correct + tallies.incorrect, outcomes.len() as u32);
    assert_eq!(
        game.session().score(),
        100 * tallies.correct as i64 - 50 * tallies.incorrect as i64
    );
}

#[test]
fn headless_without_start_stays_ready() {
    let mut game = Game::new(&Config::default(), Box::new(ScriptedChance::new(HandSide::Left)));
    let mut pointer = PointerFeed::new();
    pointer.press(HandSide::Left, 0.125, 0.25);

    let outcomes = drive(&mut game, &mut pointer, vec![], 200, |_| false);

    assert!(outcomes.is_empty());
    assert_eq!(game.phase(), Phase::Ready);
    assert_eq!(game.session().score(), 0);
}

#[test]
fn headless_replay_scores_recorded_hand() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, r#"{{"t":0}}"#).unwrap();
    writeln!(file, "not json").unwrap();
    writeln!(file, r#"{{"t":1100,"leftHand":[{{"x":0.125,"y":0.25}}]}}"#).unwrap();
    writeln!(file, r#"{{"t":1200,"pose":[{{"x":0.5,"y":0.5}}]}}"#).unwrap();
    file.flush().unwrap();

    let mut replay = ReplayFeed::open(file.path()).unwrap();
    assert_eq!(replay.len(), 3);

    let mut game = Game::new(&Config::default(), Box::new(ScriptedChance::new(HandSide::Left)));
    let outcomes = drive(&mut game, &mut replay, vec![enter()], 200, |g| {
        g.session().time_remaining() <= 27
    });

    assert_eq!(outcomes, vec![Outcome::Correct]);
    assert_eq!(game.session().score(), 100);
    assert!(replay.is_finished());
}

#[test]
fn headless_frames_keep_running_during_a_drag_burst() {
    let (tx, rx) = mpsc::channel();
    for _ in 0..60 {
        tx.send(GameEvent::Mouse(MouseEvent {
            kind: MouseEventKind::Drag(MouseButton::Left),
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        }))
        .unwrap();
    }
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );
    let clock = ManualClock::new(0);
    let mut game = Game::new(&Config::default(), Box::new(ScriptedChance::new(HandSide::Left)));
    let mut pointer = PointerFeed::new();
    game.start_or_restart(clock.now_ms());

    let mut drags_left = 60;
    let mut drags_left_at_hit = None;
    for _ in 0..120 {
        std::thread::sleep(Duration::from_millis(2));
        match runner.step() {
            // every drag lands on the first target
            GameEvent::Mouse(_) => {
                drags_left -= 1;
                pointer.press(HandSide::Left, 0.125, 0.25);
            }
            GameEvent::Tick => {
                clock.advance(FRAME_MS);
                let now = clock.now_ms();
                let frame = pointer.next_frame(now).unwrap_or_default();
                if !game.on_frame(&frame, now).is_empty() && drags_left_at_hit.is_none() {
                    drags_left_at_hit = Some(drags_left);
                }
            }
            _ => {}
        }
    }

    // targets arm at 1_000 ms, i.e. on the 31st tick, while drags are still queued
    assert_eq!(drags_left, 0);
    assert!(matches!(drags_left_at_hit, Some(n) if n > 0));
    assert_eq!(game.session().score(), 100);
}
