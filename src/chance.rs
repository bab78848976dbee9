use std::collections::VecDeque;
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::landmark::HandSide;

/// Half-open delay window `[min_ms, max_ms)`.
///
/// A window with `max_ms <= min_ms` always yields `min_ms`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    pub const fn fixed(ms: u64) -> Self {
        Self::new(ms, ms)
    }

    pub fn contains(&self, ms: u64) -> bool {
        if self.max_ms <= self.min_ms {
            ms == self.min_ms
        } else {
            (self.min_ms..self.max_ms).contains(&ms)
        }
    }
}

/// Source of the engine's random decisions
pub trait Chance: fmt::Debug {
    fn delay_ms(&mut self, range: DelayRange) -> u64;
    fn pick_side(&mut self) -> HandSide;
}

/// Production randomness backed by any `rand` generator
#[derive(Debug)]
pub struct RngChance<R> {
    rng: R,
}

impl<R: Rng + fmt::Debug> RngChance<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngChance<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng + fmt::Debug> Chance for RngChance<R> {
    fn delay_ms(&mut self, range: DelayRange) -> u64 {
        if range.max_ms <= range.min_ms {
            range.min_ms
        } else {
            self.rng.gen_range(range.min_ms..range.max_ms)
        }
    }

    fn pick_side(&mut self) -> HandSide {
        if self.rng.gen_bool(0.5) {
            HandSide::Left
        } else {
            HandSide::Right
        }
    }
}

/// Deterministic chance for tests and replays.
///
/// Hands out queued sides and delays in order; once a queue runs dry it
/// falls back to `fallback_side` and the lower bound of the requested range.
#[derive(Debug, Clone)]
pub struct ScriptedChance {
    sides: VecDeque<HandSide>,
    delays: VecDeque<u64>,
    fallback_side: HandSide,
}

impl ScriptedChance {
    pub fn new(fallback_side: HandSide) -> Self {
        Self {
            sides: VecDeque::new(),
            delays: VecDeque::new(),
            fallback_side,
        }
    }

    pub fn with_sides(mut self, sides: impl IntoIterator<Item = HandSide>) -> Self {
        self.sides.extend(sides);
        self
    }

    pub fn with_delays(mut self, delays: impl IntoIterator<Item = u64>) -> Self {
        self.delays.extend(delays);
        self
    }
}

impl Chance for ScriptedChance {
    fn delay_ms(&mut self, range: DelayRange) -> u64 {
        self.delays.pop_front().unwrap_or(range.min_ms)
    }

    fn pick_side(&mut self) -> HandSide {
        self.sides.pop_front().unwrap_or(self.fallback_side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rng_delays_stay_in_window() {
        let mut chance = RngChance::seeded(7);
        let range = DelayRange::new(1_000, 4_000);
        for _ in 0..500 {
            let d = chance.delay_ms(range);
            assert!(range.contains(d), "{d} outside {range:?}");
        }
    }

    #[test]
    fn degenerate_window_is_fixed() {
        let mut chance = RngChance::seeded(1);
        assert_eq!(chance.delay_ms(DelayRange::fixed(1_200)), 1_200);
        assert_eq!(chance.delay_ms(DelayRange::new(900, 100)), 900);
    }

    #[test]
    fn rng_picks_both_sides() {
        let mut chance = RngChance::seeded(42);
        let sides: Vec<HandSide> = (0..200).map(|_| chance.pick_side()).collect();
        assert!(sides.contains(&HandSide::Left));
        assert!(sides.contains(&HandSide::Right));
    }

    #[test]
    fn scripted_chance_replays_then_falls_back() {
        let mut chance = ScriptedChance::new(HandSide::Right)
            .with_sides([HandSide::Left])
            .with_delays([1_500]);
        let range = DelayRange::new(1_000, 3_000);

        assert_eq!(chance.pick_side(), HandSide::Left);
        assert_eq!(chance.pick_side(), HandSide::Right);
        assert_eq!(chance.delay_ms(range), 1_500);
        assert_eq!(chance.delay_ms(range), 1_000);
    }
}
