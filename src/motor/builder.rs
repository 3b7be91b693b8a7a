//! Builder pattern for StepperDriver.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::AxisConfig;
use crate::error::{ConfigError, Error, MotorError, Result};
use crate::motion::SystemClock;

use super::driver::{StepperDriver, DEFAULT_PULSE_WIDTH_NS};

/// Builder for creating StepperDriver instances.
pub struct StepperDriverBuilder<STEP, DIR, DELAY, CLOCK>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    CLOCK: SystemClock,
{
    step_pin: Option<STEP>,
    dir_pin: Option<DIR>,
    delay: Option<DELAY>,
    clock: Option<CLOCK>,
    max_speed: Option<f32>,
    acceleration: Option<f32>,
    pulse_width_ns: u32,
}

impl<STEP, DIR, DELAY, CLOCK> Default for StepperDriverBuilder<STEP, DIR, DELAY, CLOCK>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    CLOCK: SystemClock,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<STEP, DIR, DELAY, CLOCK> StepperDriverBuilder<STEP, DIR, DELAY, CLOCK>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    CLOCK: SystemClock,
{
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            step_pin: None,
            dir_pin: None,
            delay: None,
            clock: None,
            max_speed: None,
            acceleration: None,
            pulse_width_ns: DEFAULT_PULSE_WIDTH_NS,
        }
    }

    /// Set the STEP pin.
    pub fn step_pin(mut self, pin: STEP) -> Self {
        self.step_pin = Some(pin);
        self
    }

    /// Set the DIR pin.
    pub fn dir_pin(mut self, pin: DIR) -> Self {
        self.dir_pin = Some(pin);
        self
    }

    /// Set the delay provider used for the STEP pulse.
    pub fn delay(mut self, delay: DELAY) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Set the clock used to schedule steps.
    pub fn clock(mut self, clock: CLOCK) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set maximum speed in steps per second.
    pub fn max_speed(mut self, steps_per_sec: f32) -> Self {
        self.max_speed = Some(steps_per_sec);
        self
    }

    /// Set acceleration in steps per second squared.
    pub fn acceleration(mut self, steps_per_sec2: f32) -> Self {
        self.acceleration = Some(steps_per_sec2);
        self
    }

    /// Set the STEP pulse width in nanoseconds.
    pub fn pulse_width_ns(mut self, ns: u32) -> Self {
        self.pulse_width_ns = ns;
        self
    }

    /// Take speed and acceleration from an axis configuration, converted to steps.
    pub fn from_axis_config(mut self, config: &AxisConfig) -> Self {
        self.max_speed = Some(config.max_speed_steps());
        self.acceleration = Some(config.acceleration_steps());
        self
    }

    /// Build the StepperDriver.
    ///
    /// # Errors
    ///
    /// Returns an error if a pin, the delay or the clock is missing, or if
    /// the speed or acceleration is missing or not positive.
    pub fn build(self) -> Result<StepperDriver<STEP, DIR, DELAY, CLOCK>> {
        let step_pin = self.step_pin.ok_or(MotorError::MissingPart("step_pin"))?;
        let dir_pin = self.dir_pin.ok_or(MotorError::MissingPart("dir_pin"))?;
        let delay = self.delay.ok_or(MotorError::MissingPart("delay"))?;
        let clock = self.clock.ok_or(MotorError::MissingPart("clock"))?;

        let max_speed = self.max_speed.ok_or(MotorError::MissingPart("max_speed"))?;
        if !(max_speed.is_finite() && max_speed > 0.0) {
            return Err(Error::Config(ConfigError::InvalidMaxSpeed(max_speed)));
        }

        let acceleration = self
            .acceleration
            .ok_or(MotorError::MissingPart("acceleration"))?;
        if !(acceleration.is_finite() && acceleration > 0.0) {
            return Err(Error::Config(ConfigError::InvalidAcceleration(acceleration)));
        }

        let mut driver = StepperDriver::new(step_pin, dir_pin, delay, clock, max_speed, acceleration);
        driver.set_pulse_width_ns(self.pulse_width_ns);
        Ok(driver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AxisKind, Scale};
    use core::time::Duration;

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    struct NullPin;

    impl embedded_hal::digital::ErrorType for NullPin {
        type Error = core::convert::Infallible;
    }

    impl OutputPin for NullPin {
        fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
            Ok(())
        }

        fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
            Ok(())
        }
    }

    fn zero_clock() -> Duration {
        Duration::ZERO
    }

    #[test]
    fn test_missing_clock() {
        let result = StepperDriverBuilder::<_, _, _, fn() -> Duration>::new()
            .step_pin(NullPin)
            .dir_pin(NullPin)
            .delay(NoDelay)
            .max_speed(100.0)
            .acceleration(100.0)
            .build();

        assert!(matches!(
            result,
            Err(Error::Motor(MotorError::MissingPart("clock")))
        ));
    }

    #[test]
    fn test_from_axis_config_converts_rates() {
        let mut config = AxisConfig::new(AxisKind::Vertical, 10.0, 40.0);
        config.scale = Scale::new(0.01).unwrap();

        let driver = StepperDriverBuilder::new()
            .step_pin(NullPin)
            .dir_pin(NullPin)
            .delay(NoDelay)
            .clock(zero_clock as fn() -> Duration)
            .from_axis_config(&config)
            .build()
            .unwrap();

        assert!((driver.max_speed() - 1000.0).abs() < 0.5);
        assert!((driver.acceleration() - 4000.0).abs() < 1.0);
    }

    #[test]
    fn test_rejects_zero_acceleration() {
        let result = StepperDriverBuilder::new()
            .step_pin(NullPin)
            .dir_pin(NullPin)
            .delay(NoDelay)
            .clock(zero_clock as fn() -> Duration)
            .max_speed(100.0)
            .acceleration(0.0)
            .build();

        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidAcceleration(_)))
        ));
    }
}
