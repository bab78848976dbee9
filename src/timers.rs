//! Cancelable one-shot deadlines for the target engine and the countdown.
//!
//! Every key owns at most one live timer. Scheduling again (or canceling)
//! retires the previous token, so its heap entry is silently dropped when it
//! surfaces instead of firing late.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use tracing::trace;

/// Milliseconds on the session clock
pub type Millis = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerKey {
    Target(usize),
    Countdown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum TimerAction {
    Arm,
    Expire,
    ClearFeedback,
    CountdownTick,
}

/// A timer that came due
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fired {
    pub key: TimerKey,
    pub action: TimerAction,
    pub due: Millis,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pending {
    pub token: u64,
    pub due: Millis,
    pub action: TimerAction,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    due: Millis,
    seq: u64,
    key: TimerKey,
    token: u64,
    action: TimerAction,
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<Reverse<Entry>>,
    live: HashMap<TimerKey, Pending>,
    next_token: u64,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` for `key`, superseding whatever was pending for it
    pub fn schedule(&mut self, key: TimerKey, due: Millis, action: TimerAction) -> u64 {
        self.next_token += 1;
        self.next_seq += 1;
        let token = self.next_token;

        if let Some(old) = self.live.insert(key, Pending { token, due, action }) {
            trace!(?key, old_action = ?old.action, old_due = old.due, "superseded pending timer");
        }
        self.heap.push(Reverse(Entry {
            due,
            seq: self.next_seq,
            key,
            token,
            action,
        }));
        token
    }

    /// Returns true if something was pending
    pub fn cancel(&mut self, key: TimerKey) -> bool {
        self.live.remove(&key).is_some()
    }

    pub fn cancel_all(&mut self) {
        self.live.clear();
        self.heap.clear();
    }

    pub fn pending(&self, key: TimerKey) -> Option<Pending> {
        self.live.get(&key).copied()
    }

    pub fn is_pending(&self, key: TimerKey) -> bool {
        self.live.contains_key(&key)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Pop the earliest live timer due at or before `now`.
    ///
    /// Timers with equal deadlines fire in the order they were scheduled.
    pub fn pop_due(&mut self, now: Millis) -> Option<Fired> {
        while let Some(Reverse(entry)) = self.heap.peek().copied() {
            if entry.due > now {
                return None;
            }
            self.heap.pop();

            match self.live.get(&entry.key) {
                Some(p) if p.token == entry.token => {
                    self.live.remove(&entry.key);
                    return Some(Fired {
                        key: entry.key,
                        action: entry.action,
                        due: entry.due,
                    });
                }
                _ => trace!(key = ?entry.key, token = entry.token, "discarding stale timer"),
            }
        }
        None
    }
}
