//! Game clocks: the in-game timer and the accumulator that decides when the world steps.

use crate::constants::{LOOP_FREQ, SPEED_FACTOR};

/// Gates world steps behind the car's speed.
///
/// Every tick adds `speed / SPEED_FACTOR`. Once a whole step has built up the world
/// advances by one row, so at full speed the world steps every tick and at a crawl it
/// steps every few seconds. No more than one step is ever committed per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepAccumulator {
    progress: f32,
}

impl StepAccumulator {
    /// Accumulates one tick at `speed`, returning true if a step is due.
    pub fn advance(&mut self, speed: f32) -> bool {
        self.progress += speed.max(0.0) / SPEED_FACTOR;
        if self.progress >= 1.0 {
            self.progress = 0.0;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.progress = 0.0;
    }
}

/// Counts running game ticks. Only advanced while a race is on and not paused.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameTimer {
    ticks: u32,
}

impl GameTimer {
    pub fn tick(&mut self) {
        self.ticks = self.ticks.wrapping_add(1);
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Seconds of racing so far.
    pub fn elapsed(&self) -> f32 {
        self.ticks as f32 / LOOP_FREQ
    }

    pub fn reset(&mut self) {
        self.ticks = 0;
    }
}
