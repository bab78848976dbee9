use crate::geometry::{Circle, Point};
use crate::landmark::HandSide;
use crate::timers::Millis;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

/// Where a target is in its idle -> armed -> feedback cycle.
///
/// `ArmedPrimary` expects the left hand, `ArmedSecondary` the right one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum TargetState {
    Idle,
    ArmedPrimary,
    ArmedSecondary,
    Correct,
    Incorrect,
}

impl TargetState {
    pub fn armed(side: HandSide) -> Self {
        match side {
            HandSide::Left => TargetState::ArmedPrimary,
            HandSide::Right => TargetState::ArmedSecondary,
        }
    }

    pub fn matching_hand(&self) -> Option<HandSide> {
        match self {
            TargetState::ArmedPrimary => Some(HandSide::Left),
            TargetState::ArmedSecondary => Some(HandSide::Right),
            _ => None,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.matching_hand().is_some()
    }

    pub fn is_feedback(&self) -> bool {
        matches!(self, TargetState::Correct | TargetState::Incorrect)
    }
}

impl From<Outcome> for TargetState {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Correct => TargetState::Correct,
            Outcome::Incorrect => TargetState::Incorrect,
        }
    }
}

/// A fixed circular hit region. Only the engine mutates it.
#[derive(Clone, Debug, PartialEq)]
pub struct Target {
    id: usize,
    circle: Circle,
    state: TargetState,
    armed_at: Option<Millis>,
}

impl Target {
    pub fn new(id: usize, circle: Circle) -> Self {
        Self {
            id,
            circle,
            state: TargetState::Idle,
            armed_at: None,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn circle(&self) -> &Circle {
        &self.circle
    }

    pub fn state(&self) -> TargetState {
        self.state
    }

    pub fn armed_at(&self) -> Option<Millis> {
        self.armed_at
    }

    pub(crate) fn arm(&mut self, side: HandSide, now: Millis) {
        self.state = TargetState::armed(side);
        self.armed_at = Some(now);
    }

    pub(crate) fn settle(&mut self, outcome: Outcome) {
        self.state = outcome.into();
    }

    pub(crate) fn reset(&mut self) {
        self.state = TargetState::Idle;
        self.armed_at = None;
    }

    pub fn snapshot(&self) -> TargetSnapshot {
        TargetSnapshot {
            id: self.id,
            center: self.circle.center,
            radius: self.circle.radius,
            state: self.state,
            armed_at: self.armed_at,
        }
    }
}

/// Read-only view handed to the renderer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetSnapshot {
    pub id: usize,
    pub center: Point,
    pub radius: f64,
    pub state: TargetState,
    pub armed_at: Option<Millis>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_target_is_idle() {
        let t = Target::new(3, Circle::new(100.0, 150.0, 40.0));
        assert_eq!(t.id(), 3);
        assert_eq!(t.state(), TargetState::Idle);
        assert_eq!(t.armed_at(), None);
        assert_eq!(t.circle().center, Point::new(100.0, 150.0));
        assert_eq!(t.snapshot().radius, 40.0);
    }

    #[test]
    fn arm_settle_reset_cycle() {
        let mut t = Target::new(0, Circle::new(0.0, 0.0, 10.0));

        t.arm(HandSide::Right, 1_234);
        assert_eq!(t.state(), TargetState::ArmedSecondary);
        assert_eq!(t.state().matching_hand(), Some(HandSide::Right));
        assert_eq!(t.armed_at(), Some(1_234));

        t.settle(Outcome::Incorrect);
        assert_eq!(t.state(), TargetState::Incorrect);
        assert!(t.state().is_feedback());
        assert!(!t.state().is_armed());
        assert_eq!(t.armed_at(), Some(1_234));

        t.reset();
        assert_eq!(t.snapshot().state, TargetState::Idle);
        assert_eq!(t.snapshot().armed_at, None);
    }

    #[test]
    fn armed_variants_encode_matching_hand() {
        assert_eq!(TargetState::armed(HandSide::Left), TargetState::ArmedPrimary);
        assert_eq!(TargetState::ArmedPrimary.matching_hand(), Some(HandSide::Left));
        assert_eq!(TargetState::Idle.matching_hand(), None);
        assert_eq!(TargetState::Correct.matching_hand(), None);
    }
}
