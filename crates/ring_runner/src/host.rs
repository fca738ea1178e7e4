//! Windowless host
//!
//! Stands in for a display's repaint callback: it delivers one tick per
//! simulated refresh, with some jitter, for as long as the engine keeps
//! asking for ticks and the run has time left.

use crate::config::GameSettings;
use flight_engine::foundation::time::{Clock, SystemClock};
use flight_engine::scheduler::Host;
use flight_engine::{Application, Engine, EngineError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

enum TimeSource {
    /// Real time; waiting sleeps the thread
    Wall(SystemClock),
    /// Virtual milliseconds; waiting advances them instantly
    Simulated(f64),
}

/// Host that drives the engine from a simulated display refresh
pub struct HeadlessHost {
    time: TimeSource,
    refresh_ms: f64,
    jitter_ms: f64,
    rng: StdRng,
    armed: bool,
    ticks: u64,
}

impl HeadlessHost {
    /// Host that sleeps between refreshes
    pub fn realtime(settings: &GameSettings) -> Self {
        Self::with_time(TimeSource::Wall(SystemClock::new()), settings)
    }

    /// Host that runs as fast as possible on a virtual clock
    pub fn simulated(settings: &GameSettings) -> Self {
        Self::with_time(TimeSource::Simulated(0.0), settings)
    }

    fn with_time(time: TimeSource, settings: &GameSettings) -> Self {
        Self {
            time,
            refresh_ms: 1000.0 / settings.display_refresh_hz,
            jitter_ms: settings.refresh_jitter_ms.max(0.0),
            rng: StdRng::seed_from_u64(settings.seed ^ 0x7465_6d70),
            armed: false,
            ticks: 0,
        }
    }

    /// Ticks delivered so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Whether the engine asked for another tick
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    fn wait_for_refresh(&mut self) {
        let jitter = if self.jitter_ms > 0.0 {
            self.rng.gen_range(-self.jitter_ms..=self.jitter_ms)
        } else {
            0.0
        };
        let wait = (self.refresh_ms + jitter).max(0.0);
        match &mut self.time {
            TimeSource::Wall(_) => std::thread::sleep(Duration::from_secs_f64(wait / 1000.0)),
            TimeSource::Simulated(now) => *now += wait,
        }
    }

    /// Run the engine for `duration_ms`, or until it stops asking for ticks
    ///
    /// The application's cleanup always runs. Returns the number of passes
    /// the engine completed.
    pub fn run<A>(&mut self, engine: &mut Engine, app: &mut A, duration_ms: f64) -> Result<u64, EngineError>
    where
        A: Application + ?Sized,
    {
        engine.start(self);
        let deadline = self.now_ms() + duration_ms;
        log::info!("Headless run for {:.0} ms at {:.1} ms per refresh", duration_ms, self.refresh_ms);

        let mut result = Ok(());
        while self.armed && self.now_ms() < deadline {
            self.armed = false;
            self.wait_for_refresh();
            self.ticks += 1;
            if let Err(err) = engine.on_host_tick(self, app) {
                result = Err(err);
                break;
            }
        }

        engine.shutdown(app);
        result.map(|()| engine.scheduler().clock().frame_count)
    }
}

impl Clock for HeadlessHost {
    fn now_ms(&self) -> f64 {
        match &self.time {
            TimeSource::Wall(clock) => clock.now_ms(),
            TimeSource::Simulated(now) => *now,
        }
    }
}

impl Host for HeadlessHost {
    fn request_next_tick(&mut self) {
        self.armed = true;
    }
}
