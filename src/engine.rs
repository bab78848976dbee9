//! Target lifecycle: every target independently cycles
//! `Idle -> Armed -> (Correct | Incorrect | expired) -> Idle`.
//!
//! The engine never looks at the session phase itself. The game only feeds it
//! timer firings and frames while running, and cancels its timers otherwise.

use tracing::debug;

use crate::chance::{Chance, DelayRange};
use crate::geometry::{collides, Circle, HandPoints};
use crate::landmark::HandSide;
use crate::target::{Outcome, Target, TargetSnapshot, TargetState};
use crate::timers::{Millis, TimerAction, TimerKey, TimerQueue};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineTimings {
    /// How long an armed target waits for a hand
    pub arm_duration_ms: u64,
    /// How long the correct/incorrect color stays up
    pub feedback_ms: u64,
    /// Delay before the first arming after a (re)start
    pub first_arm_delay: DelayRange,
    /// Delay before re-arming once a target is idle again
    pub rearm_delay: DelayRange,
}

impl Default for EngineTimings {
    fn default() -> Self {
        Self {
            arm_duration_ms: 1_200,
            feedback_ms: 500,
            first_arm_delay: DelayRange::new(1_000, 4_000),
            rearm_delay: DelayRange::new(1_000, 3_000),
        }
    }
}

/// A target registered a hand this frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hit {
    pub target: usize,
    pub outcome: Outcome,
    pub hand: HandSide,
    pub at: Millis,
    /// Time between arming and the hit
    pub reaction_ms: Millis,
}

/// What a fired timer did to its target
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Armed(HandSide),
    Expired,
    Cleared,
}

#[derive(Debug)]
pub struct TargetEngine {
    targets: Vec<Target>,
    timings: EngineTimings,
    chance: Box<dyn Chance>,
}

impl TargetEngine {
    pub fn new(layout: &[Circle], timings: EngineTimings, chance: Box<dyn Chance>) -> Self {
        Self {
            targets: layout
                .iter()
                .enumerate()
                .map(|(id, circle)| Target::new(id, *circle))
                .collect(),
            timings,
            chance,
        }
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn snapshot(&self) -> Vec<TargetSnapshot> {
        self.targets.iter().map(Target::snapshot).collect()
    }

    /// Drop every pending target timer, leaving states as they are
    pub fn suspend(&self, timers: &mut TimerQueue) {
        for target in &self.targets {
            timers.cancel(TimerKey::Target(target.id()));
        }
    }

    /// Every target back to `Idle` with no pending timer
    pub fn reset(&mut self, timers: &mut TimerQueue) {
        self.suspend(timers);
        for target in &mut self.targets {
            target.reset();
        }
    }

    pub fn schedule_first_arming(&mut self, timers: &mut TimerQueue, now: Millis) {
        for id in 0..self.targets.len() {
            let delay = self.chance.delay_ms(self.timings.first_arm_delay);
            timers.schedule(TimerKey::Target(id), now + delay, TimerAction::Arm);
        }
    }

    fn schedule_rearm(&mut self, id: usize, timers: &mut TimerQueue, from: Millis) {
        let delay = self.chance.delay_ms(self.timings.rearm_delay);
        timers.schedule(TimerKey::Target(id), from + delay, TimerAction::Arm);
    }

    /// Apply a fired target timer. `due` is the instant it was scheduled for,
    /// so chained timers keep their spacing even when frames arrive late.
    pub fn fire(
        &mut self,
        id: usize,
        action: TimerAction,
        due: Millis,
        timers: &mut TimerQueue,
    ) -> Option<Transition> {
        let Some(state) = self.targets.get(id).map(Target::state) else {
            debug!(id, "timer fired for unknown target");
            return None;
        };

        match (action, state) {
            (TimerAction::Arm, TargetState::Idle) => {
                let side = self.chance.pick_side();
                self.targets[id].arm(side, due);
                timers.schedule(
                    TimerKey::Target(id),
                    due + self.timings.arm_duration_ms,
                    TimerAction::Expire,
                );
                debug!(id, %side, at = due, "target armed");
                Some(Transition::Armed(side))
            }
            (TimerAction::Expire, s) if s.is_armed() => {
                self.targets[id].reset();
                self.schedule_rearm(id, timers, due);
                debug!(id, at = due, "target expired");
                Some(Transition::Expired)
            }
            (TimerAction::ClearFeedback, s) if s.is_feedback() => {
                self.targets[id].reset();
                self.schedule_rearm(id, timers, due);
                Some(Transition::Cleared)
            }
            (action, state) => {
                debug!(id, ?action, %state, "ignoring timer that no longer applies");
                None
            }
        }
    }

    /// Hit-test every armed target against this frame's hands.
    ///
    /// The matching hand is tested before the other one, and a target that
    /// leaves the armed state is not looked at again this frame.
    pub fn evaluate_frame(
        &mut self,
        hands: &HandPoints,
        now: Millis,
        timers: &mut TimerQueue,
    ) -> Vec<Hit> {
        let mut hits = Vec::new();
        if hands.is_empty() {
            return hits;
        }

        for target in &mut self.targets {
            let Some(matching) = target.state().matching_hand() else {
                continue;
            };

            let outcome = if collides(hands.side(matching), target.circle()) {
                Some((Outcome::Correct, matching))
            } else if collides(hands.side(matching.opposite()), target.circle()) {
                Some((Outcome::Incorrect, matching.opposite()))
            } else {
                None
            };

            if let Some((outcome, hand)) = outcome {
                let reaction_ms = now.saturating_sub(target.armed_at().unwrap_or(now));
                target.settle(outcome);
                timers.schedule(
                    TimerKey::Target(target.id()),
                    now + self.timings.feedback_ms,
                    TimerAction::ClearFeedback,
                );
                debug!(id = target.id(), ?outcome, %hand, reaction_ms, "target hit");
                hits.push(Hit {
                    target: target.id(),
                    outcome,
                    hand,
                    at: now,
                    reaction_ms,
                });
            }
        }
        hits
    }
}
