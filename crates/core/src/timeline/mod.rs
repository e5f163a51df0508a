use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Simulation rate of the demo.
pub const TICKS_PER_SECOND: u32 = 60;
/// Length of the black splash between the intro and the demo, in ticks.
pub const SPLASH_TICKS: u64 = 90;

const MAX_CATCH_UP: u32 = 8;

/// Top-level sequence of the demo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Intro,
    Splash,
    Demo,
}

/// Black fade used while switching phases.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Transition {
    progress: f64,
}

impl Transition {
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn set(&mut self, progress: f64) {
        self.progress = progress.clamp(0.0, 1.0);
    }

    pub fn reset(&mut self) {
        self.progress = 0.0;
    }

    /// Advances a running fade by one tick. Idle or finished fades stay put.
    pub fn tick(&mut self) {
        if self.is_active() {
            self.set(self.progress + 0.02);
        }
    }

    pub fn is_active(&self) -> bool {
        self.progress > 0.0 && self.progress < 1.0
    }

    /// Alpha of the black overlay, fully opaque at the start of the fade.
    pub fn overlay_alpha(&self) -> Option<u8> {
        self.is_active()
            .then(|| (255.0 * (1.0 - self.progress)) as u8)
    }
}

/// Converts wall-clock time into whole simulation ticks.
#[derive(Debug, Clone)]
pub struct FixedStep {
    step: Duration,
    accumulated: Duration,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(TICKS_PER_SECOND)
    }
}

impl FixedStep {
    pub fn new(ticks_per_second: u32) -> Self {
        Self {
            step: Duration::from_secs(1) / ticks_per_second.max(1),
            accumulated: Duration::ZERO,
        }
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Adds `elapsed` and returns how many ticks are due. A long stall runs
    /// at most a handful of ticks and drops the rest.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulated += elapsed;
        let mut due = 0;
        while self.accumulated >= self.step && due < MAX_CATCH_UP {
            self.accumulated -= self.step;
            due += 1;
        }
        if due == MAX_CATCH_UP {
            self.accumulated = self.accumulated.min(self.step);
        }
        due
    }

    /// Time left until the next tick is due.
    pub fn until_next(&self) -> Duration {
        self.step.saturating_sub(self.accumulated)
    }
}
