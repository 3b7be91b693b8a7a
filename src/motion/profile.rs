//! Direction and ramp phase types, plus the constant-acceleration step math.

use libm::{floorf, sqrtf};

/// Direction of travel in raw step space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Positive step count.
    Forward,
    /// Negative step count.
    Reverse,
}

impl Direction {
    /// Get direction from signed step count.
    #[inline]
    pub fn from_steps(steps: i64) -> Self {
        if steps >= 0 {
            Direction::Forward
        } else {
            Direction::Reverse
        }
    }

    /// Get the sign multiplier.
    #[inline]
    pub fn sign(self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Reverse => -1,
        }
    }

    /// The opposite direction.
    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }

    /// Apply this direction to a magnitude.
    #[inline]
    pub fn apply(self, magnitude: f32) -> f32 {
        match self {
            Direction::Forward => magnitude,
            Direction::Reverse => -magnitude,
        }
    }
}

/// Current phase of a speed ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionPhase {
    /// Accelerating from rest toward cruise velocity.
    Accelerating,
    /// Moving at constant cruise velocity.
    Cruising,
    /// Decelerating toward rest (or toward a reversal).
    Decelerating,
    /// At rest.
    Complete,
}

/// Speed reached from rest after one step: v² = 2·a·1.
///
/// Capped at `max_speed` so slow axes never start faster than allowed.
#[inline]
pub fn start_speed(max_speed: f32, acceleration: f32) -> f32 {
    sqrtf(2.0 * acceleration).min(max_speed)
}

/// Steps needed to come to rest from `speed` at `acceleration`: v² / 2a.
#[inline]
pub fn steps_to_stop(speed: f32, acceleration: f32) -> f32 {
    if acceleration <= 0.0 {
        return 0.0;
    }
    speed * speed / (2.0 * acceleration)
}

/// Whole steps ahead of the current position at which a stop from `speed`
/// can be completed.
#[inline]
pub fn stopping_steps(speed: f32, acceleration: f32) -> i64 {
    floorf(steps_to_stop(speed, acceleration)) as i64
}

/// Interval between steps at `speed`, in microseconds.
#[inline]
pub fn step_interval_us(speed: f32) -> u64 {
    if speed > 0.0 {
        (1_000_000.0 / speed) as u64
    } else {
        u64::MAX
    }
}
