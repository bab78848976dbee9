//! Scoring and session control around the target engine.
//!
//! All state moves forward through two calls: `advance_to` fires timers that
//! came due, `on_frame` additionally hit-tests the frame's hands. Rendering
//! only ever sees a `GameSnapshot`.

use tracing::{debug, info, trace};

use crate::chance::Chance;
use crate::config::Config;
use crate::engine::{Hit, TargetEngine, Transition};
use crate::geometry::{Canvas, HandPoints};
use crate::landmark::LandmarkFrame;
use crate::session::{Phase, Session, SessionSnapshot};
use crate::target::TargetSnapshot;
use crate::timers::{Millis, TimerAction, TimerKey, TimerQueue};

const COUNTDOWN_STEP_MS: Millis = 1_000;

#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    pub targets: Vec<TargetSnapshot>,
    pub session: SessionSnapshot,
}

#[derive(Debug)]
pub struct Game {
    canvas: Canvas,
    engine: TargetEngine,
    session: Session,
    timers: TimerQueue,
}

impl Game {
    pub fn new(config: &Config, chance: Box<dyn Chance>) -> Self {
        Self {
            canvas: config.canvas,
            engine: TargetEngine::new(&config.targets, config.timings(), chance),
            session: Session::new(config.session_config()),
            timers: TimerQueue::new(),
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    /// Begin a fresh session, from any phase
    pub fn start_or_restart(&mut self, now: Millis) {
        self.timers.cancel_all();
        self.session.restart();
        self.engine.reset(&mut self.timers);
        if !self.session.is_running() {
            info!(at = now, "empty time budget, session ended at once");
            return;
        }
        self.timers.schedule(
            TimerKey::Countdown,
            now + COUNTDOWN_STEP_MS,
            TimerAction::CountdownTick,
        );
        self.engine.schedule_first_arming(&mut self.timers, now);
        info!(
            at = now,
            budget = self.session.time_remaining(),
            "session started"
        );
    }

    /// Fire every timer due at or before `now`, in deadline order
    pub fn advance_to(&mut self, now: Millis) {
        while let Some(fired) = self.timers.pop_due(now) {
            match fired.key {
                TimerKey::Countdown => self.on_countdown(fired.due),
                TimerKey::Target(id) => {
                    if !self.session.is_running() {
                        debug!(id, action = ?fired.action, "target timer outside a running session");
                        continue;
                    }
                    if let Some(Transition::Expired) =
                        self.engine.fire(id, fired.action, fired.due, &mut self.timers)
                    {
                        self.session.record_expiry();
                    }
                }
            }
        }
    }

    fn on_countdown(&mut self, due: Millis) {
        if self.session.tick() {
            self.timers.cancel_all();
            info!(
                at = due,
                score = self.session.score(),
                correct = self.session.tallies().correct,
                incorrect = self.session.tallies().incorrect,
                "session ended"
            );
        } else if self.session.is_running() {
            self.timers.schedule(
                TimerKey::Countdown,
                due + COUNTDOWN_STEP_MS,
                TimerAction::CountdownTick,
            );
        }
    }

    /// Run one frame: catch timers up to `now`, then score this frame's hands
    pub fn on_frame(&mut self, frame: &LandmarkFrame, now: Millis) -> Vec<Hit> {
        self.advance_to(now);
        if !self.session.is_running() {
            return Vec::new();
        }

        let hands = HandPoints::from_frame(frame, &self.canvas);
        if hands.is_empty() {
            trace!(at = now, "no usable hand landmarks this frame");
            return Vec::new();
        }

        let hits = self.engine.evaluate_frame(&hands, now, &mut self.timers);
        for hit in &hits {
            let delta = self.session.apply(hit.outcome, hit.reaction_ms);
            debug!(id = hit.target, delta, score = self.session.score(), "scored");
        }
        hits
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            targets: self.engine.snapshot(),
            session: self.session.snapshot(),
        }
    }
}
