//! Step-by-step speed ramp.
//!
//! The square of the speed changes by `2·a` on every step, which gives a
//! constant acceleration without precomputing a whole profile. Targets can
//! change mid-move; the ramp decelerates, reverses and re-accelerates as
//! needed.

use libm::{fabsf, sqrtf};

use super::profile::{start_speed, steps_to_stop, Direction, MotionPhase};

/// Runtime speed state of one motor.
#[derive(Debug, Clone)]
pub struct SpeedRamp {
    /// Current speed magnitude in steps/sec (0 at rest).
    speed: f32,

    /// Direction of travel (meaningful while `speed > 0`).
    direction: Direction,

    /// Speed ceiling in steps/sec.
    max_speed: f32,

    /// Acceleration in steps/sec².
    acceleration: f32,

    /// Current phase.
    phase: MotionPhase,
}

impl SpeedRamp {
    /// Create a ramp at rest.
    pub fn new(max_speed: f32, acceleration: f32) -> Self {
        Self {
            speed: 0.0,
            direction: Direction::Forward,
            max_speed,
            acceleration,
            phase: MotionPhase::Complete,
        }
    }

    /// Current speed magnitude in steps/sec.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Current direction of travel.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> MotionPhase {
        self.phase
    }

    /// Speed ceiling in steps/sec.
    #[inline]
    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    /// Acceleration in steps/sec².
    #[inline]
    pub fn acceleration(&self) -> f32 {
        self.acceleration
    }

    /// True when not moving.
    #[inline]
    pub fn is_at_rest(&self) -> bool {
        self.speed == 0.0
    }

    /// Set the speed ceiling. Ignores non-positive values.
    pub fn set_max_speed(&mut self, max_speed: f32) {
        if max_speed > 0.0 {
            self.max_speed = max_speed;
            if self.speed > max_speed {
                self.speed = max_speed;
            }
        }
    }

    /// Set the acceleration. Ignores non-positive values.
    pub fn set_acceleration(&mut self, acceleration: f32) {
        if acceleration > 0.0 {
            self.acceleration = acceleration;
        }
    }

    /// Lowest speed the ramp runs at while moving.
    #[inline]
    pub fn start_speed(&self) -> f32 {
        start_speed(self.max_speed, self.acceleration)
    }

    /// Steps needed to stop from the current speed.
    #[inline]
    pub fn steps_to_stop(&self) -> f32 {
        steps_to_stop(self.speed, self.acceleration)
    }

    /// Leave rest in the given direction.
    pub fn start(&mut self, direction: Direction) {
        self.direction = direction;
        self.speed = self.start_speed();
        self.phase = MotionPhase::Accelerating;
    }

    /// Run at a fixed signed velocity, clamped to the speed ceiling.
    pub fn set_constant(&mut self, velocity: f32) {
        if velocity == 0.0 {
            self.halt();
            return;
        }
        self.direction = if velocity > 0.0 {
            Direction::Forward
        } else {
            Direction::Reverse
        };
        self.speed = fabsf(velocity).min(self.max_speed);
        self.phase = MotionPhase::Cruising;
    }

    /// Drop to rest immediately.
    pub fn halt(&mut self) {
        self.speed = 0.0;
        self.phase = MotionPhase::Complete;
    }

    /// Update the speed after a step.
    ///
    /// `remaining` is the signed number of steps still to go to the target.
    pub fn advance(&mut self, remaining: i64) {
        if remaining == 0 {
            self.halt();
            return;
        }

        let toward = Direction::from_steps(remaining) == self.direction;
        let min = self.start_speed();
        let a2 = 2.0 * self.acceleration;

        if !toward || self.steps_to_stop() >= remaining.unsigned_abs() as f32 {
            let v2 = self.speed * self.speed - a2;
            if v2 <= min * min {
                self.speed = min;
                if toward {
                    self.phase = MotionPhase::Decelerating;
                } else {
                    self.direction = self.direction.reversed();
                    self.phase = MotionPhase::Accelerating;
                }
            } else {
                self.speed = sqrtf(v2);
                self.phase = MotionPhase::Decelerating;
            }
        } else if self.speed < self.max_speed {
            self.speed = sqrtf(self.speed * self.speed + a2).min(self.max_speed);
            self.phase = if self.speed >= self.max_speed {
                MotionPhase::Cruising
            } else {
                MotionPhase::Accelerating
            };
        } else {
            self.speed = self.max_speed;
            self.phase = MotionPhase::Cruising;
        }
    }
}
