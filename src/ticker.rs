//! Tick sources that decide when the engine advances.
//!
//! The engine never reads the wall clock to schedule itself. A frontend feeds
//! it `Instant`s through [`GameEngine::pump`](crate::engine::GameEngine::pump)
//! and the source answers how many ticks are due; tests use [`ManualTicks`]
//! and fire ticks explicitly.

use std::time::{Duration, Instant};

/// Single-threaded source of periodic movement ticks.
pub trait TickSource {
    /// Starts producing ticks every `interval`, counting from `now`.
    fn arm(&mut self, interval: Duration, now: Instant);

    /// Stops producing ticks. Calling it again is a no-op.
    fn cancel(&mut self);

    fn is_armed(&self) -> bool;

    /// Returns how many ticks fell due up to `now` and consumes them.
    ///
    /// Wall-clock sources report at most one tick per call so a stalled
    /// caller never replays the intervals it missed.
    fn due_ticks(&mut self, now: Instant) -> u32;
}

/// Fixed-interval source backed by caller-supplied instants.
///
/// Missed intervals are skipped, keeping the original phase.
#[derive(Debug, Clone, Default)]
pub struct IntervalTimer {
    interval: Duration,
    next_due: Option<Instant>,
}

impl IntervalTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Instant at which the next tick falls due, if armed.
    #[must_use]
    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }
}

impl TickSource for IntervalTimer {
    fn arm(&mut self, interval: Duration, now: Instant) {
        debug_assert!(!interval.is_zero(), "tick interval must be positive");
        self.interval = interval;
        self.next_due = Some(now + interval);
    }

    fn cancel(&mut self) {
        self.next_due = None;
    }

    fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    fn due_ticks(&mut self, now: Instant) -> u32 {
        let Some(mut next_due) = self.next_due else {
            return 0;
        };
        if next_due > now {
            return 0;
        }

        let missed = now.duration_since(next_due).as_nanos() / self.interval.as_nanos().max(1);
        let skipped = u32::try_from(missed + 1).unwrap_or(u32::MAX);
        next_due += self.interval.saturating_mul(skipped);

        self.next_due = Some(next_due);
        1
    }
}

/// Test source whose ticks are queued by hand.
#[derive(Debug, Clone, Default)]
pub struct ManualTicks {
    armed: bool,
    pending: u32,
}

impl ManualTicks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `count` ticks. Ignored while the source is not armed.
    pub fn fire(&mut self, count: u32) {
        if self.armed {
            self.pending += count;
        }
    }
}

impl TickSource for ManualTicks {
    fn arm(&mut self, _interval: Duration, _now: Instant) {
        self.armed = true;
    }

    fn cancel(&mut self) {
        self.armed = false;
        self.pending = 0;
    }

    fn is_armed(&self) -> bool {
        self.armed
    }

    fn due_ticks(&mut self, _now: Instant) -> u32 {
        std::mem::take(&mut self.pending)
    }
}
