//! Builder pattern for Axis.

use embedded_hal::digital::InputPin;
use heapless::String;

use crate::config::{validate_axis, AxisConfig, Scale, SystemConfig};
use crate::config::{DEFAULT_HOME_BACKOFF, DEFAULT_HOME_SPEED};
use crate::error::{ConfigError, Error, MotorError, Result};
use crate::motion::MotionPrimitive;

use super::base::Axis;
use super::sensor::NoSensor;
use super::state::HomingState;

/// Builder for creating Axis instances.
///
/// # Example
///
/// ```rust,ignore
/// use weld_axis::AxisBuilder;
///
/// let config = weld_axis::load_config("welder.toml")?;
/// let z = AxisBuilder::from_config(&config, "z")?
///     .motion(driver)
///     .home_sensor(z_limit)
///     .build()?;
/// ```
pub struct AxisBuilder<M, H = NoSensor, E = NoSensor>
where
    M: MotionPrimitive,
    H: InputPin,
    E: InputPin,
{
    motion: Option<M>,
    home_sensor: Option<H>,
    estop_input: Option<E>,
    name: String<32>,
    inverted: bool,
    scale: f32,
    max_speed: Option<f32>,
    acceleration: Option<f32>,
    home_speed: f32,
    home_backoff: f32,
}

impl<M> Default for AxisBuilder<M>
where
    M: MotionPrimitive,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<M> AxisBuilder<M>
where
    M: MotionPrimitive,
{
    /// Create a new builder with no inputs, unit scale and default homing.
    pub fn new() -> Self {
        Self {
            motion: None,
            home_sensor: None,
            estop_input: None,
            name: String::try_from("axis").unwrap_or_default(),
            inverted: false,
            scale: 1.0,
            max_speed: None,
            acceleration: None,
            home_speed: DEFAULT_HOME_SPEED,
            home_backoff: DEFAULT_HOME_BACKOFF,
        }
    }

    /// Start from the named axis of a system configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::AxisNotFound` if the name is not configured.
    pub fn from_config(config: &SystemConfig, name: &str) -> Result<Self> {
        let axis_config = config.axis(name).ok_or_else(|| {
            Error::Config(ConfigError::AxisNotFound(
                String::try_from(name).unwrap_or_default(),
            ))
        })?;

        Ok(Self::new().name(name).from_axis_config(axis_config))
    }
}

impl<M, H, E> AxisBuilder<M, H, E>
where
    M: MotionPrimitive,
    H: InputPin,
    E: InputPin,
{
    /// Set the motion primitive.
    pub fn motion(mut self, motion: M) -> Self {
        self.motion = Some(motion);
        self
    }

    /// Set the axis name used in log output.
    pub fn name(mut self, name: &str) -> Self {
        self.name = String::try_from(name).unwrap_or_default();
        self
    }

    /// Flip the sign of commands and reports.
    pub fn inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    /// Set logical units per step.
    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Set maximum speed in logical units per second.
    pub fn max_speed(mut self, speed: f32) -> Self {
        self.max_speed = Some(speed);
        self
    }

    /// Set acceleration in logical units per second squared.
    pub fn acceleration(mut self, acceleration: f32) -> Self {
        self.acceleration = Some(acceleration);
        self
    }

    /// Set the default homing speed in logical units per second.
    pub fn home_speed(mut self, speed: f32) -> Self {
        self.home_speed = speed;
        self
    }

    /// Set the homing retract distance in logical units.
    pub fn home_backoff(mut self, distance: f32) -> Self {
        self.home_backoff = distance;
        self
    }

    /// Take transform, limits and homing settings from an axis configuration.
    ///
    /// Stepover, stepdown and dwell belong to the axis wrappers and are
    /// applied by their `from_config` constructors.
    pub fn from_axis_config(mut self, config: &AxisConfig) -> Self {
        self.inverted = config.inverted;
        self.scale = config.scale.value();
        self.max_speed = Some(config.max_speed);
        self.acceleration = Some(config.acceleration);
        self.home_speed = config.home_speed;
        self.home_backoff = config.home_backoff;
        self
    }

    /// Attach an active-low home/limit switch.
    pub fn home_sensor<H2: InputPin>(self, pin: H2) -> AxisBuilder<M, H2, E> {
        AxisBuilder {
            motion: self.motion,
            home_sensor: Some(pin),
            estop_input: self.estop_input,
            name: self.name,
            inverted: self.inverted,
            scale: self.scale,
            max_speed: self.max_speed,
            acceleration: self.acceleration,
            home_speed: self.home_speed,
            home_backoff: self.home_backoff,
        }
    }

    /// Attach an active-low e-stop input.
    pub fn estop_input<E2: InputPin>(self, pin: E2) -> AxisBuilder<M, H, E2> {
        AxisBuilder {
            motion: self.motion,
            home_sensor: self.home_sensor,
            estop_input: Some(pin),
            name: self.name,
            inverted: self.inverted,
            scale: self.scale,
            max_speed: self.max_speed,
            acceleration: self.acceleration,
            home_speed: self.home_speed,
            home_backoff: self.home_backoff,
        }
    }

    /// Build the Axis.
    ///
    /// Speed and acceleration, when given, are converted to steps with the
    /// axis scale and pushed into the motion primitive.
    ///
    /// # Errors
    ///
    /// Returns an error if the motion primitive is missing or a setting is
    /// out of range.
    pub fn build(self) -> Result<Axis<M, H, E>> {
        let motion = self.motion.ok_or(MotorError::MissingPart("motion"))?;
        let scale = Scale::new(self.scale)?;

        let mut axis = Axis {
            motion,
            inverted: self.inverted,
            scale,
            home_sensor: self.home_sensor,
            estop_input: self.estop_input,
            home_speed: DEFAULT_HOME_SPEED,
            home_backoff: DEFAULT_HOME_BACKOFF,
            stopped: false,
            homing: HomingState::Idle,
            name: self.name,
        };

        axis.set_home_speed(self.home_speed)?;
        axis.set_home_backoff(self.home_backoff)?;

        if let Some(speed) = self.max_speed {
            if !(speed.is_finite() && speed > 0.0) {
                return Err(Error::Config(ConfigError::InvalidMaxSpeed(speed)));
            }
            axis.set_max_speed(speed);
        }

        if let Some(acceleration) = self.acceleration {
            if !(acceleration.is_finite() && acceleration > 0.0) {
                return Err(Error::Config(ConfigError::InvalidAcceleration(acceleration)));
            }
            axis.set_acceleration(acceleration);
        }

        Ok(axis)
    }
}

impl<M, H, E> Axis<M, H, E>
where
    M: MotionPrimitive,
    H: InputPin,
    E: InputPin,
{
    /// Apply transform, limits and homing settings from a validated axis
    /// configuration.
    pub(super) fn apply_config(&mut self, config: &AxisConfig) -> Result<()> {
        validate_axis(self.name(), config)?;

        self.inverted = config.inverted;
        self.scale = config.scale;
        self.home_speed = config.home_speed;
        self.home_backoff = config.home_backoff;
        self.set_max_speed(config.max_speed);
        self.set_acceleration(config.acceleration);
        Ok(())
    }
}
