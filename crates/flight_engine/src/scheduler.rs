//! Frame scheduling
//!
//! The host (a window's repaint callback, a headless driver) calls back at
//! whatever rate it likes. The [`FrameScheduler`] decides on every host tick
//! whether enough time has passed for another simulation pass, keeping the
//! long-run pass rate at the configured target without drifting.
//!
//! After a step the clock's reference time is snapped back by the overshoot
//! (`delta % interval`), so late ticks do not push the whole schedule later.
//! If a tick arrives several intervals late the missed passes are dropped,
//! not replayed.

use crate::foundation::time::Clock;

/// Callback-driven environment the simulation runs in
pub trait Host: Clock {
    /// Ask for one more tick; the scheduler calls this once per handled tick
    fn request_next_tick(&mut self);
}

/// Outcome of polling the scheduler on a host tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// Too early; re-arm and wait
    Skip,
    /// Run exactly one pass with this frame number
    Step(u64),
    /// The scheduler was stopped or never started
    Stopped,
}

/// Timing state of the simulation, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    /// Reference time of the last step
    pub last_tick: f64,
    /// Target time between steps
    pub frame_interval: f64,
    /// Steps taken so far
    pub frame_count: u64,
}

impl FrameClock {
    /// Create a clock for `fps_limit` steps per second, starting at `now`
    pub fn new(fps_limit: f64, now: f64) -> Self {
        Self {
            last_tick: now,
            frame_interval: 1000.0 / fps_limit,
            frame_count: 0,
        }
    }

    /// Fixed step length in seconds
    pub fn step_seconds(&self) -> f32 {
        (self.frame_interval / 1000.0) as f32
    }

    /// Advance if a full interval has elapsed since the last step
    pub fn advance(&mut self, now: f64) -> Option<u64> {
        let delta = now - self.last_tick;
        if delta < self.frame_interval {
            return None;
        }
        self.last_tick = now - (delta % self.frame_interval);
        self.frame_count += 1;
        Some(self.frame_count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepState {
    Idle,
    Stepping,
}

/// Decides when host ticks turn into simulation passes
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    clock: FrameClock,
    state: StepState,
    running: bool,
}

impl FrameScheduler {
    /// Create a stopped scheduler targeting `fps_limit` passes per second
    pub fn new(fps_limit: f64) -> Self {
        Self {
            clock: FrameClock::new(fps_limit, 0.0),
            state: StepState::Idle,
            running: false,
        }
    }

    /// Start (or restart) the schedule with `now` as the reference time
    pub fn start(&mut self, now: f64) {
        self.clock.last_tick = now;
        self.state = StepState::Idle;
        self.running = true;
        log::info!(
            "Frame scheduler started ({:.3} ms interval)",
            self.clock.frame_interval
        );
    }

    /// Decide what the current host tick should do
    pub fn poll(&mut self, now: f64) -> Poll {
        if !self.running {
            return Poll::Stopped;
        }
        match self.clock.advance(now) {
            Some(frame) => Poll::Step(frame),
            None => Poll::Skip,
        }
    }

    /// Enter the stepping state; false if a pass is already running
    pub fn begin_step(&mut self) -> bool {
        if self.state == StepState::Stepping {
            log::warn!("Pass requested while frame {} is still running", self.clock.frame_count);
            return false;
        }
        self.state = StepState::Stepping;
        true
    }

    /// Return to idle after a pass
    pub fn end_step(&mut self) {
        self.state = StepState::Idle;
    }

    /// Stop re-arming; later polls report [`Poll::Stopped`]
    pub fn stop(&mut self) {
        if self.running {
            log::info!("Frame scheduler stopped after {} frames", self.clock.frame_count);
        }
        self.running = false;
    }

    /// Whether the scheduler still accepts ticks
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether a pass is in progress
    pub fn is_stepping(&self) -> bool {
        self.state == StepState::Stepping
    }

    /// Timing state
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_skips_until_interval_elapsed() {
        let mut scheduler = FrameScheduler::new(50.0);
        assert_eq!(scheduler.poll(100.0), Poll::Stopped);

        scheduler.start(0.0);
        assert_eq!(scheduler.poll(19.9), Poll::Skip);
        assert_eq!(scheduler.poll(20.0), Poll::Step(1));
        assert_eq!(scheduler.poll(25.0), Poll::Skip);
    }

    #[test]
    fn test_overshoot_is_carried() {
        let mut scheduler = FrameScheduler::new(50.0);
        scheduler.start(0.0);
        assert_eq!(scheduler.poll(27.0), Poll::Step(1));
        assert_relative_eq!(scheduler.clock().last_tick, 20.0);
        assert_eq!(scheduler.poll(40.0), Poll::Step(2));
    }

    #[test]
    fn test_late_tick_drops_missed_frames() {
        let mut scheduler = FrameScheduler::new(50.0);
        scheduler.start(0.0);
        assert_eq!(scheduler.poll(70.0), Poll::Step(1));
        assert_relative_eq!(scheduler.clock().last_tick, 60.0);
        assert_eq!(scheduler.poll(79.0), Poll::Skip);
    }

    #[test]
    fn test_pass_count_converges_under_irregular_ticks() {
        let gaps = [3.0, 11.5, 7.25, 16.0, 1.0, 9.0, 14.75, 5.5];
        let mut scheduler = FrameScheduler::new(60.0);
        scheduler.start(0.0);

        let window = 10_000.0;
        let mut now = 0.0;
        let mut passes = 0_u64;
        for gap in gaps.iter().cycle() {
            now += gap;
            if now > window {
                break;
            }
            if let Poll::Step(_) = scheduler.poll(now) {
                passes += 1;
            }
        }

        let expected = window / scheduler.clock().frame_interval;
        assert!((passes as f64 - expected).abs() <= 1.0, "passes {passes}, expected {expected}");
    }

    #[test]
    fn test_step_state_and_stop() {
        let mut scheduler = FrameScheduler::new(60.0);
        scheduler.start(0.0);
        assert!(scheduler.begin_step());
        assert!(!scheduler.begin_step());
        scheduler.end_step();
        assert!(!scheduler.is_stepping());

        scheduler.stop();
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.poll(1_000.0), Poll::Stopped);
    }
}
