//! Vertical axis: plunges in stepdown/stepup cycles.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use log::debug;

use crate::config::{AxisConfig, AxisKind};
use crate::error::{ConfigError, Error, Result};
use crate::motion::MotionPrimitive;

use super::base::Axis;
use super::sensor::NoSensor;
use super::state::MoveOutcome;

/// An axis that plunges by a configured stepdown distance and returns.
///
/// "Down" is the positive logical sense of the wrapped [`Axis`].
pub struct ZAxis<M, H = NoSensor, E = NoSensor>
where
    M: MotionPrimitive,
    H: InputPin,
    E: InputPin,
{
    axis: Axis<M, H, E>,
    stepdown: f32,
    dwell_ms: Option<u32>,
}

impl<M, H, E> ZAxis<M, H, E>
where
    M: MotionPrimitive,
    H: InputPin,
    E: InputPin,
{
    /// Wrap an axis with a stepdown of zero.
    pub fn new(axis: Axis<M, H, E>) -> Self {
        Self {
            axis,
            stepdown: 0.0,
            dwell_ms: None,
        }
    }

    /// Wrap an axis and apply a vertical axis configuration to it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::KindMismatch` for a horizontal configuration, or
    /// any validation error for the configuration itself.
    pub fn from_config(mut axis: Axis<M, H, E>, config: &AxisConfig) -> Result<Self> {
        if config.kind != AxisKind::Vertical {
            return Err(Error::Config(ConfigError::KindMismatch {
                axis: heapless::String::try_from(axis.name()).unwrap_or_default(),
                setting: "kind",
            }));
        }

        axis.apply_config(config)?;
        Ok(Self {
            axis,
            stepdown: config.stepdown.unwrap_or(0.0),
            dwell_ms: config.dwell_ms,
        })
    }

    /// Set the stepdown distance in logical units.
    pub fn set_stepdown(&mut self, distance: f32) {
        self.stepdown = distance;
    }

    /// Configured stepdown distance.
    #[inline]
    pub fn stepdown_distance(&self) -> f32 {
        self.stepdown
    }

    /// Dwell time from the configuration, if any.
    #[inline]
    pub fn dwell_ms(&self) -> Option<u32> {
        self.dwell_ms
    }

    /// Start a stepdown. Non-blocking.
    pub fn stepdown(&mut self) {
        self.stepdown_custom(self.stepdown);
    }

    /// Start a stepdown of `size`. Non-blocking.
    pub fn stepdown_custom(&mut self, size: f32) {
        self.axis.move_by(size);
    }

    /// Start a stepup by the stepdown distance. Non-blocking.
    pub fn stepup(&mut self) {
        self.stepup_custom(self.stepdown);
    }

    /// Start a stepup of `size`. Non-blocking.
    pub fn stepup_custom(&mut self, size: f32) {
        self.axis.move_by(-size);
    }

    /// Step down, hold for `pause_ms`, step back up. Blocking.
    ///
    /// An e-stop during the stepdown skips the pause and the stepup. The
    /// pause itself always runs to the end once started; a latch set
    /// during it makes the stepup a no-op.
    ///
    /// # Errors
    ///
    /// Returns `MotorError::PinError` if an input or the motor's pins fail.
    pub fn stepdown_cycle<D: DelayNs>(&mut self, pause_ms: u32, delay: &mut D) -> Result<MoveOutcome> {
        self.stepdown();
        if self.axis.run_to_completion()? == MoveOutcome::Aborted {
            return Ok(MoveOutcome::Aborted);
        }

        debug!("{}: dwell {} ms", self.axis.name(), pause_ms);
        delay.delay_ms(pause_ms);

        self.stepup();
        self.axis.run_to_completion()
    }

    /// [`stepdown_cycle`](Self::stepdown_cycle) with the configured dwell,
    /// or no pause if none is configured.
    ///
    /// # Errors
    ///
    /// Returns `MotorError::PinError` if an input or the motor's pins fail.
    pub fn stepdown_cycle_dwell<D: DelayNs>(&mut self, delay: &mut D) -> Result<MoveOutcome> {
        let pause_ms = self.dwell_ms.unwrap_or(0);
        self.stepdown_cycle(pause_ms, delay)
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
