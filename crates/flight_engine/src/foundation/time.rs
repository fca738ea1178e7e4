//! Time management utilities

use std::time::Instant;

/// Monotonic millisecond time source
///
/// The scheduler only ever reads time through this trait, so hosts and
/// tests can drive it with simulated clocks.
pub trait Clock {
    /// Milliseconds elapsed since an arbitrary fixed origin
    fn now_ms(&self) -> f64;
}

/// Wall clock backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    /// Create a clock whose origin is now
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// One-shot countdown advanced by simulation time
///
/// Timed gameplay behaviour (weapon cooldowns, reloads) is expressed with
/// these instead of host callbacks: the owner ticks it during its update and
/// reacts when it reports completion. A countdown never fires on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Countdown {
    duration: f32,
    remaining: Option<f32>,
}

impl Countdown {
    /// Create an idle countdown of `duration` seconds
    pub fn new(duration: f32) -> Self {
        Self { duration, remaining: None }
    }

    /// Start (or restart) the countdown from its full duration
    pub fn start(&mut self) {
        self.remaining = Some(self.duration);
    }

    /// Stop the countdown without firing
    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    /// Whether the countdown is currently running
    pub fn is_running(&self) -> bool {
        self.remaining.is_some()
    }

    /// Seconds left, zero when idle
    pub fn remaining(&self) -> f32 {
        self.remaining.unwrap_or(0.0)
    }

    /// Configured duration in seconds
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Advance by `dt` seconds; returns true exactly once, on the tick that
    /// reaches zero. The countdown is idle afterwards.
    pub fn tick(&mut self, dt: f32) -> bool {
        match self.remaining {
            Some(left) if left - dt <= 0.0 => {
                self.remaining = None;
                true
            }
            Some(left) => {
                self.remaining = Some(left - dt);
                false
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_countdown_fires_once() {
        let mut countdown = Countdown::new(1.0);
        assert!(!countdown.tick(0.5));

        countdown.start();
        assert!(countdown.is_running());
        assert!(!countdown.tick(0.5));
        assert_relative_eq!(countdown.remaining(), 0.5);
        assert!(countdown.tick(0.5));
        assert!(!countdown.is_running());
        assert!(!countdown.tick(0.5));
    }

    #[test]
    fn test_countdown_cancel_and_restart() {
        let mut countdown = Countdown::new(2.0);
        countdown.start();
        countdown.tick(1.5);
        countdown.cancel();
        assert!(!countdown.tick(1.0));

        countdown.start();
        assert_relative_eq!(countdown.remaining(), 2.0);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }
}
