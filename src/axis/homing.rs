//! Blocking homing procedure.

use embedded_hal::digital::InputPin;
use log::{debug, info, warn};

use crate::error::{ConfigError, Result};
use crate::motion::MotionPrimitive;

use super::base::Axis;
use super::sensor::asserted;
use super::state::{HomeOutcome, HomingState, MoveOutcome};

impl<M, H, E> Axis<M, H, E>
where
    M: MotionPrimitive,
    H: InputPin,
    E: InputPin,
{
    /// Home at the configured speed. See [`home_at`](Self::home_at).
    ///
    /// # Errors
    ///
    /// Returns `MotorError::PinError` if an input or the motor's pins fail.
    pub fn home(&mut self) -> Result<HomeOutcome> {
        let speed = self.home_speed;
        self.home_at(speed)
    }

    /// Home against the switch at `speed` logical units per second.
    ///
    /// Without a switch the current position simply becomes zero. With one,
    /// the axis seeks toward the logical negative end at constant speed
    /// until the switch triggers, retracts by the home backoff and then
    /// redefines the position as zero.
    ///
    /// Blocks until done. The e-stop latch aborts seeking or retracting at
    /// the next loop check and leaves the position unzeroed.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidHomeSpeed` unless `speed` is finite and
    /// positive, or `MotorError::PinError` if an input or the motor's pins fail.
    pub fn home_at(&mut self, speed: f32) -> Result<HomeOutcome> {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(ConfigError::InvalidHomeSpeed(speed).into());
        }

        self.homing = HomingState::Idle;

        if !self.has_home() {
            self.motion.set_current_position(0);
            self.homing = HomingState::Zeroed;
            info!("{}: no home switch, position zeroed", self.name());
            return Ok(HomeOutcome::Homed);
        }

        if self.stopped {
            warn!("{}: homing refused while e-stopped", self.name());
            return Ok(HomeOutcome::Aborted {
                state: HomingState::Idle,
            });
        }

        self.homing = HomingState::Seeking;
        debug!("{}: seeking home at {} units/s", self.name(), speed);

        let raw_speed = self.home_direction().apply(self.scale.rate_to_steps(speed));
        self.motion.set_speed(raw_speed);

        loop {
            self.poll_estop()?;
            if self.stopped {
                return Ok(self.abort_homing());
            }
            if asserted(self.home_sensor.as_mut())? {
                break;
            }
            self.motion.run_speed()?;
        }

        self.halt();
        self.homing = HomingState::BackedOff;
        debug!(
            "{}: home switch at {} steps, retracting",
            self.name(),
            self.motion.current_position()
        );

        let backoff = self.home_backoff;
        self.move_by(backoff);
        if self.run_to_completion()? == MoveOutcome::Aborted {
            return Ok(self.abort_homing());
        }

        self.motion.set_current_position(0);
        self.homing = HomingState::Zeroed;
        info!("{}: homed", self.name());
        Ok(HomeOutcome::Homed)
    }

    fn abort_homing(&mut self) -> HomeOutcome {
        warn!(
            "{}: homing aborted while {}",
            self.name(),
            self.homing.name()
        );
        HomeOutcome::Aborted {
            state: self.homing,
        }
    }
}
