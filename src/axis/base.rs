//! The base axis: coordinate transform, limit switch, e-stop latch and the
//! cooperative run step.

use embedded_hal::digital::InputPin;
use log::{debug, info, warn};

use crate::config::units::{Scale, Steps};
use crate::config::{DEFAULT_HOME_BACKOFF, DEFAULT_HOME_SPEED};
use crate::error::{ConfigError, Result};
use crate::motion::{Direction, MotionPrimitive};

use super::sensor::{asserted, NoSensor};
use super::state::{HomingState, MoveOutcome};

/// One stepper axis in logical units.
///
/// Generic over:
/// - `M`: the motion primitive driving the stepper
/// - `H`: home/limit switch input (active low), [`NoSensor`] if absent
/// - `E`: e-stop input (active low), [`NoSensor`] if absent
///
/// Every commanded value is sign-flipped when the axis is inverted and
/// divided by the scale; every reported value is sign-flipped and
/// multiplied by the scale. The home switch sits at the logical negative end.
///
/// # Scheduling
///
/// [`run`](Self::run) is the non-blocking step and must be called every loop
/// iteration while the axis moves. The blocking operations
/// ([`run_to_completion`](Self::run_to_completion), [`home`](Self::home) and
/// the stepover/stepdown variants) own the caller's loop until they finish
/// or the e-stop latch is set. No other axis is serviced meanwhile.
pub struct Axis<M, H = NoSensor, E = NoSensor>
where
    M: MotionPrimitive,
    H: InputPin,
    E: InputPin,
{
    pub(super) motion: M,
    pub(super) inverted: bool,
    pub(super) scale: Scale,
    pub(super) home_sensor: Option<H>,
    pub(super) estop_input: Option<E>,
    pub(super) home_speed: f32,
    pub(super) home_backoff: f32,
    pub(super) stopped: bool,
    pub(super) homing: HomingState,
    pub(super) name: heapless::String<32>,
}

impl<M> Axis<M>
where
    M: MotionPrimitive,
{
    /// Wrap a motion primitive: not inverted, unit scale, no inputs attached.
    pub fn new(motion: M) -> Self {
        Self {
            motion,
            inverted: false,
            scale: Scale::UNITY,
            home_sensor: None,
            estop_input: None,
            home_speed: DEFAULT_HOME_SPEED,
            home_backoff: DEFAULT_HOME_BACKOFF,
            stopped: false,
            homing: HomingState::Idle,
            name: heapless::String::try_from("axis").unwrap_or_default(),
        }
    }
}

impl<M, H, E> Axis<M, H, E>
where
    M: MotionPrimitive,
    H: InputPin,
    E: InputPin,
{
    /// Get the axis name.
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Set the axis name used in log output. Names over 32 bytes are
    /// dropped.
    pub fn set_name(&mut self, name: &str) {
        self.name = heapless::String::try_from(name).unwrap_or_default();
    }

    /// Set the speed ceiling in logical units per second.
    pub fn set_max_speed(&mut self, speed: f32) {
        self.motion.set_max_speed(self.scale.rate_to_steps(speed));
    }

    /// Set the acceleration in logical units per second squared.
    pub fn set_acceleration(&mut self, acceleration: f32) {
        self.motion
            .set_acceleration(self.scale.rate_to_steps(acceleration));
    }

    /// Change the sign convention for subsequent commands and reports.
    ///
    /// A target already handed to the motion primitive is left as is.
    pub fn set_inverted(&mut self, inverted: bool) {
        self.inverted = inverted;
    }

    /// True if the axis is inverted.
    #[inline]
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Set the logical units per step.
    ///
    /// Speed and acceleration already pushed to the motion primitive are not
    /// rescaled; set them again afterwards.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidScale` unless `scale` is finite and positive.
    pub fn set_scale(&mut self, scale: f32) -> Result<()> {
        self.scale = Scale::new(scale)?;
        Ok(())
    }

    /// Logical units per step.
    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale.value()
    }

    /// Set the default homing speed in logical units per second.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidHomeSpeed` unless `speed` is finite and positive.
    pub fn set_home_speed(&mut self, speed: f32) -> Result<()> {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(ConfigError::InvalidHomeSpeed(speed).into());
        }
        self.home_speed = speed;
        Ok(())
    }

    /// Default homing speed in logical units per second.
    #[inline]
    pub fn home_speed(&self) -> f32 {
        self.home_speed
    }

    /// Set the distance retracted off the home switch once it triggers.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBackoff` if `distance` is negative or not finite.
    pub fn set_home_backoff(&mut self, distance: f32) -> Result<()> {
        if !distance.is_finite() || distance < 0.0 {
            return Err(ConfigError::InvalidBackoff(distance).into());
        }
        self.home_backoff = distance;
        Ok(())
    }

    /// Homing retract distance in logical units.
    #[inline]
    pub fn home_backoff(&self) -> f32 {
        self.home_backoff
    }

    /// Attach an active-low home/limit switch, replacing any previous one.
    pub fn attach_home<H2: InputPin>(mut self, pin: H2) -> Axis<M, H2, E> {
        let estop = self.estop_input.take();
        self.with_inputs(Some(pin), estop)
    }

    /// Attach an active-low e-stop input, replacing any previous one.
    ///
    /// The input is polled by [`run`](Self::run) and every blocking loop;
    /// when asserted it latches [`e_stop`](Self::e_stop).
    pub fn attach_estop<E2: InputPin>(mut self, pin: E2) -> Axis<M, H, E2> {
        let home = self.home_sensor.take();
        self.with_inputs(home, Some(pin))
    }

    fn with_inputs<H2, E2>(self, home_sensor: Option<H2>, estop_input: Option<E2>) -> Axis<M, H2, E2>
    where
        H2: InputPin,
        E2: InputPin,
    {
        Axis {
            motion: self.motion,
            inverted: self.inverted,
            scale: self.scale,
            home_sensor,
            estop_input,
            home_speed: self.home_speed,
            home_backoff: self.home_backoff,
            stopped: self.stopped,
            homing: self.homing,
            name: self.name,
        }
    }

    /// Remove the home switch. Homing then only zeroes the position.
    pub fn detach_home(&mut self) -> Option<H> {
        self.home_sensor.take()
    }

    /// True if a home switch is attached.
    #[inline]
    pub fn has_home(&self) -> bool {
        self.home_sensor.is_some()
    }

    /// Move by a relative logical distance. Ignored while e-stopped.
    ///
    /// Non-blocking: only sets the target.
    pub fn move_by(&mut self, distance: f32) {
        if self.stopped {
            debug!("{}: move ignored while e-stopped", self.name());
            return;
        }
        let steps = self.to_steps(distance);
        self.motion.move_by(steps.value());
    }

    /// Move to an absolute logical position. Ignored while e-stopped.
    ///
    /// Non-blocking: only sets the target.
    pub fn move_to(&mut self, position: f32) {
        if self.stopped {
            debug!("{}: move ignored while e-stopped", self.name());
            return;
        }
        let steps = self.to_steps(position);
        self.motion.move_to(steps.value());
    }

    /// Begin a controlled deceleration. Keep calling [`run`](Self::run) to
    /// come to rest.
    pub fn stop(&mut self) {
        self.motion.stop();
    }

    /// Current position in logical units.
    pub fn position(&self) -> f32 {
        self.to_logical(self.motion.current_position())
    }

    /// Target position in logical units.
    pub fn target_position(&self) -> f32 {
        self.to_logical(self.motion.target_position())
    }

    /// Remaining distance in logical units.
    pub fn distance_to_go(&self) -> f32 {
        self.to_logical(self.motion.distance_to_go())
    }

    /// True while the motion primitive has distance to go.
    pub fn is_running(&self) -> bool {
        self.motion.is_running()
    }

    /// Same as [`is_running`](Self::is_running).
    pub fn is_active(&self) -> bool {
        self.motion.is_running()
    }

    /// The cooperative step. Call every control-loop iteration.
    ///
    /// - Polls the e-stop input and latches if it is asserted.
    /// - While latched, only lets the motor decelerate to rest.
    /// - If the home switch is triggered and the motor is moving toward it
    ///   (or at rest with a target toward it), halts on the spot, dropping
    ///   the target.
    /// - Otherwise advances the motion primitive by at most one step.
    ///
    /// Returns `true` while the motor still has motion left.
    ///
    /// # Errors
    ///
    /// Returns `MotorError::PinError` if an input or the motor's pins fail.
    pub fn run(&mut self) -> Result<bool> {
        self.poll_estop()?;

        if self.stopped {
            self.motion.stop();
            return self.motion.run();
        }

        if asserted(self.home_sensor.as_mut())? && self.heading_toward_home() {
            if self.motion.distance_to_go() != 0 {
                warn!(
                    "{}: home switch hit at {} steps, halting",
                    self.name(),
                    self.motion.current_position()
                );
            }
            self.halt();
            return Ok(false);
        }

        self.motion.run()
    }

    /// Drive the current move to completion, blocking.
    ///
    /// Calls [`run`](Self::run) until there is no distance to go or the
    /// e-stop latch is set, then requests a stop. Not re-entrant, and no
    /// other axis is serviced while it runs.
    ///
    /// # Errors
    ///
    /// Returns `MotorError::PinError` if an input or the motor's pins fail.
    pub fn run_to_completion(&mut self) -> Result<MoveOutcome> {
        while !self.stopped && self.motion.distance_to_go() != 0 {
            self.run()?;
        }
        self.motion.stop();

        if self.stopped {
            warn!("{}: move aborted by e-stop", self.name());
            Ok(MoveOutcome::Aborted)
        } else {
            Ok(MoveOutcome::Completed)
        }
    }

    /// Latch the emergency stop and start decelerating.
    ///
    /// While latched every motion command is ignored and [`run`](Self::run)
    /// only brings the motor to rest.
    ///
    /// # Errors
    ///
    /// Returns `MotorError::PinError` if the settling step fails.
    pub fn e_stop(&mut self) -> Result<()> {
        if !self.stopped {
            info!("{}: e-stop latched", self.name());
        }
        self.stopped = true;
        self.motion.stop();
        self.motion.run()?;
        Ok(())
    }

    /// Clear the emergency stop latch.
    ///
    /// An abandoned move is not resumed; issue a new one.
    pub fn reset_e_stop(&mut self) {
        if self.stopped {
            info!("{}: e-stop reset", self.name());
        }
        self.stopped = false;
    }

    /// True while the e-stop latch is set.
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Last homing state reached.
    #[inline]
    pub fn homing_state(&self) -> HomingState {
        self.homing
    }

    /// Access the motion primitive.
    #[inline]
    pub fn motion(&self) -> &M {
        &self.motion
    }

    /// Release the motion primitive and inputs.
    pub fn into_parts(self) -> (M, Option<H>, Option<E>) {
        (self.motion, self.home_sensor, self.estop_input)
    }

    /// Latch if the e-stop input is asserted.
    pub(super) fn poll_estop(&mut self) -> Result<()> {
        if !self.stopped && asserted(self.estop_input.as_mut())? {
            self.e_stop()?;
        }
        Ok(())
    }

    /// Stop dead without redefining the position.
    pub(super) fn halt(&mut self) {
        let here = self.motion.current_position();
        self.motion.set_current_position(here);
    }

    /// Raw direction of the home switch: logical negative.
    pub(super) fn home_direction(&self) -> Direction {
        if self.inverted {
            Direction::Forward
        } else {
            Direction::Reverse
        }
    }

    /// Moving toward the switch, or at rest with nowhere to go but toward it.
    fn heading_toward_home(&self) -> bool {
        let home = self.home_direction();
        let velocity = self.motion.velocity();
        if velocity != 0.0 {
            let moving = if velocity > 0.0 {
                Direction::Forward
            } else {
                Direction::Reverse
            };
            return moving == home;
        }

        let remaining = self.motion.distance_to_go();
        remaining == 0 || Direction::from_steps(remaining) == home
    }

    pub(super) fn to_steps(&self, logical: f32) -> Steps {
        let signed = if self.inverted { -logical } else { logical };
        self.scale.to_steps(signed)
    }

    pub(super) fn to_logical(&self, raw: i64) -> f32 {
        let signed = if self.inverted { -raw } else { raw };
        self.scale.to_logical(Steps(signed))
    }
}
