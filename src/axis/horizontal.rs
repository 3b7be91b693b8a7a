//! Horizontal axis: moves in stepovers.

use embedded_hal::digital::InputPin;

use crate::config::{AxisConfig, AxisKind};
use crate::error::{ConfigError, Error, Result};
use crate::motion::{Direction, MotionPrimitive};

use super::base::Axis;
use super::sensor::NoSensor;
use super::state::MoveOutcome;

/// An axis that advances by a configured stepover distance.
///
/// Inversion and scale are applied once by the wrapped [`Axis`]; the
/// [`Direction`] passed to each stepover only flips the sign locally.
pub struct HorizontalAxis<M, H = NoSensor, E = NoSensor>
where
    M: MotionPrimitive,
    H: InputPin,
    E: InputPin,
{
    axis: Axis<M, H, E>,
    stepover: f32,
}

impl<M, H, E> HorizontalAxis<M, H, E>
where
    M: MotionPrimitive,
    H: InputPin,
    E: InputPin,
{
    /// Wrap an axis with a stepover of zero.
    pub fn new(axis: Axis<M, H, E>) -> Self {
        Self {
            axis,
            stepover: 0.0,
        }
    }

    /// Wrap an axis and apply a horizontal axis configuration to it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::KindMismatch` for a vertical configuration, or
    /// any validation error for the configuration itself.
    pub fn from_config(mut axis: Axis<M, H, E>, config: &AxisConfig) -> Result<Self> {
        if config.kind != AxisKind::Horizontal {
            return Err(Error::Config(ConfigError::KindMismatch {
                axis: heapless::String::try_from(axis.name()).unwrap_or_default(),
                setting: "kind",
            }));
        }

        axis.apply_config(config)?;
        Ok(Self {
            axis,
            stepover: config.stepover.unwrap_or(0.0),
        })
    }

    /// Set the stepover distance in logical units. May be signed.
    pub fn set_stepover(&mut self, distance: f32) {
        self.stepover = distance;
    }

    /// Configured stepover distance.
    #[inline]
    pub fn stepover_distance(&self) -> f32 {
        self.stepover
    }

    /// Start one stepover. Non-blocking.
    pub fn stepover(&mut self, direction: Direction) {
        self.stepover_custom(self.stepover, direction);
    }

    /// Start half a stepover. Non-blocking.
    pub fn stepover_half(&mut self, direction: Direction) {
        self.stepover_custom(self.stepover / 2.0, direction);
    }

    /// Start a stepover of `size`. Non-blocking.
    pub fn stepover_custom(&mut self, size: f32, direction: Direction) {
        self.axis.move_by(direction.apply(size));
    }

    /// One stepover, blocking until done or e-stopped.
    ///
    /// # Errors
    ///
    /// Returns `MotorError::PinError` if an input or the motor's pins fail.
    pub fn stepover_blocking(&mut self, direction: Direction) -> Result<MoveOutcome> {
        self.stepover(direction);
        self.axis.run_to_completion()
    }

    /// Half a stepover, blocking until done or e-stopped.
    ///
    /// # Errors
    ///
    /// Returns `MotorError::PinError` if an input or the motor's pins fail.
    pub fn stepover_half_blocking(&mut self, direction: Direction) -> Result<MoveOutcome> {
        self.stepover_half(direction);
        self.axis.run_to_completion()
    }

    /// A stepover of `size`, blocking until done or e-stopped.
    ///
    /// # Errors
    ///
    /// Returns `MotorError::PinError` if an input or the motor's pins fail.
    pub fn stepover_custom_blocking(
        &mut self,
        size: f32,
        direction: Direction,
    ) -> Result<MoveOutcome> {
        self.stepover_custom(size, direction);
        self.axis.run_to_completion()
    }

    /// The cooperative step. See [`Axis::run`].
    ///
    /// # Errors
    ///
    /// Returns `MotorError::PinError` if an input or the motor's pins fail.
    pub fn run(&mut self) -> Result<bool> {
        self.axis.run()
    }

    /// The wrapped axis.
    pub fn axis(&self) -> &Axis<M, H, E> {
        &self.axis
    }

    /// The wrapped axis, mutably.
    pub fn axis_mut(&mut self) -> &mut Axis<M, H, E> {
        &mut self.axis
    }

    /// Unwrap the axis.
    pub fn into_inner(self) -> Axis<M, H, E> {
        self.axis
    }
}
