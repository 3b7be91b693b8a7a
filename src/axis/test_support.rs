//! Motion primitive double for axis unit tests.

use crate::error::Result;
use crate::motion::MotionPrimitive;

/// Moves one step toward the target on every `run` call, with no ramp.
#[derive(Debug, Default)]
pub struct InstantMotion {
    pub position: i64,
    pub target: i64,
    pub speed: f32,
    pub max_speed: f32,
    pub acceleration: f32,
    pub stop_calls: u32,
}

impl MotionPrimitive for InstantMotion {
    fn set_max_speed(&mut self, steps_per_sec: f32) {
        self.max_speed = steps_per_sec;
    }

    fn set_acceleration(&mut self, steps_per_sec2: f32) {
        self.acceleration = steps_per_sec2;
    }

    fn move_by(&mut self, relative: i64) {
        self.target = self.position + relative;
    }

    fn move_to(&mut self, absolute: i64) {
        self.target = absolute;
    }

    fn stop(&mut self) {
        self.stop_calls += 1;
        self.target = self.position;
    }

    fn run(&mut self) -> Result<bool> {
        let remaining = self.target - self.position;
        self.position += remaining.signum();
        Ok(self.target != self.position)
    }

    fn run_speed(&mut self) -> Result<bool> {
        if self.speed == 0.0 {
            return Ok(false);
        }
        self.position += if self.speed > 0.0 { 1 } else { -1 };
        Ok(true)
    }

    fn set_speed(&mut self, steps_per_sec: f32) {
        self.speed = steps_per_sec;
    }

    fn velocity(&self) -> f32 {
        self.speed
    }

    fn current_position(&self) -> i64 {
        self.position
    }

    fn target_position(&self) -> i64 {
        self.target
    }

    fn set_current_position(&mut self, position: i64) {
        self.position = position;
        self.target = position;
        self.speed = 0.0;
    }
}

/// Active-low input that reads released a fixed number of times, then
/// stays asserted.
#[derive(Debug)]
pub struct Countdown {
    pub released_reads: u32,
}

impl Countdown {
    pub fn new(released_reads: u32) -> Self {
        Self { released_reads }
    }
}

impl embedded_hal::digital::ErrorType for Countdown {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::InputPin for Countdown {
    fn is_high(&mut self) -> core::result::Result<bool, Self::Error> {
        self.is_low().map(|low| !low)
    }

    fn is_low(&mut self) -> core::result::Result<bool, Self::Error> {
        if self.released_reads == 0 {
            return Ok(true);
        }
        self.released_reads -= 1;
        Ok(false)
    }
}
