#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Timing systems that turn frame time into movement ticks and restarts.
//!
//! The simulation never schedules itself. An external frame driver reports
//! elapsed time through `Command::Tick`; these systems observe the resulting
//! `Event::TimeAdvanced` values and decide when a movement step or a restart
//! is due.

use std::time::Duration;

use grid_snake_core::{Command, Event};

/// Fixed-interval scheduler that emits one movement step per interval.
///
/// Firing restarts the interval from zero instead of carrying the overshoot,
/// so a slow frame lengthens the effective interval but never queues extra
/// steps.
#[derive(Clone, Copy, Debug)]
pub struct MovementClock {
    interval: Duration,
    elapsed: Duration,
    armed: bool,
}

impl MovementClock {
    /// Creates an armed clock firing every `interval`.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            elapsed: Duration::ZERO,
            armed: true,
        }
    }

    /// Reports whether the clock will fire again.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.armed
    }

    /// Time accumulated toward the next step.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Advances the clock and returns whether a step is due.
    pub fn tick(&mut self, dt: Duration) -> bool {
        if !self.armed {
            return false;
        }

        self.elapsed = self.elapsed.saturating_add(dt);
        if self.elapsed < self.interval {
            return false;
        }

        self.elapsed = Duration::ZERO;
        true
    }

    /// Stops the clock; no further steps fire until it is rearmed.
    pub fn cancel(&mut self) {
        self.armed = false;
        self.elapsed = Duration::ZERO;
    }

    /// Restarts the clock with a fresh interval.
    pub fn rearm(&mut self) {
        self.armed = true;
        self.elapsed = Duration::ZERO;
    }

    /// Consumes world events and emits a step command when one is due.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        let mut due = false;
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => due |= self.tick(*dt),
                Event::RoundOver { .. } => {
                    self.cancel();
                    due = false;
                }
                _ => {}
            }
        }

        if due {
            out.push(Command::Step);
        }
    }
}

/// Countdown that reports once when a finished round should be replaced.
#[derive(Clone, Copy, Debug)]
pub struct RestartCountdown {
    delay: Duration,
    remaining: Option<Duration>,
}

impl RestartCountdown {
    /// Creates an idle countdown that waits `delay` after a round ends.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            remaining: None,
        }
    }

    /// Reports whether the countdown is running.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.remaining.is_some()
    }

    /// Consumes world events and returns `true` exactly once when the restart is due.
    pub fn handle(&mut self, events: &[Event]) -> bool {
        for event in events {
            match event {
                Event::RoundOver { .. } if self.remaining.is_none() => {
                    self.remaining = Some(self.delay);
                }
                Event::TimeAdvanced { dt } => {
                    if let Some(remaining) = self.remaining {
                        self.remaining = Some(remaining.saturating_sub(*dt));
                    }
                }
                _ => {}
            }
        }

        match self.remaining {
            Some(remaining) if remaining.is_zero() => {
                self.remaining = None;
                true
            }
            _ => false,
        }
    }
}
