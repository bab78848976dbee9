use crate::target::Outcome;
use crate::timers::Millis;
use crate::util::{mean_and_spread, percentage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub time_budget_secs: u32,
    pub hit_reward: i64,
    pub miss_penalty: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            time_budget_secs: 30,
            hit_reward: 100,
            miss_penalty: 50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum Phase {
    Ready,
    Running,
    Ended,
}

/// Per-session counters shown on the end screen; never persisted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tallies {
    pub correct: u32,
    pub incorrect: u32,
    pub expired: u32,
    pub reaction_ms: Vec<Millis>,
}

impl Tallies {
    /// Share of hits made with the right hand, in percent
    pub fn accuracy(&self) -> Option<f64> {
        percentage(self.correct, self.correct + self.incorrect)
    }

    /// Mean and standard deviation of correct-hit reaction times
    pub fn reaction(&self) -> Option<(f64, f64)> {
        mean_and_spread(&self.reaction_ms)
    }
}

/// The one session record; restarted in place, never replaced
#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    phase: Phase,
    score: i64,
    time_remaining: u32,
    tallies: Tallies,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            phase: Phase::Ready,
            score: 0,
            time_remaining: config.time_budget_secs,
            tallies: Tallies::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn tallies(&self) -> &Tallies {
        &self.tallies
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// A zero budget ends the new session on the spot
    pub(crate) fn restart(&mut self) {
        self.phase = if self.config.time_budget_secs == 0 {
            Phase::Ended
        } else {
            Phase::Running
        };
        self.score = 0;
        self.time_remaining = self.config.time_budget_secs;
        self.tallies = Tallies::default();
    }

    /// Score a hit. Returns the score delta, zero when not running.
    pub(crate) fn apply(&mut self, outcome: Outcome, reaction_ms: Millis) -> i64 {
        if !self.is_running() {
            return 0;
        }
        let delta = match outcome {
            Outcome::Correct => {
                self.tallies.correct += 1;
                self.tallies.reaction_ms.push(reaction_ms);
                self.config.hit_reward
            }
            Outcome::Incorrect => {
                self.tallies.incorrect += 1;
                -self.config.miss_penalty
            }
        };
        self.score += delta;
        delta
    }

    pub(crate) fn record_expiry(&mut self) {
        if self.is_running() {
            self.tallies.expired += 1;
        }
    }

    /// One second of the countdown. Returns true when this tick ended the session.
    pub(crate) fn tick(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            self.phase = Phase::Ended;
            return true;
        }
        false
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            score: self.score,
            time_remaining: self.time_remaining,
            phase: self.phase,
            tallies: self.tallies.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub score: i64,
    pub time_remaining: u32,
    pub phase: Phase,
    pub tallies: Tallies,
}
