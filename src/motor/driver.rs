//! Stepper motor driver.
//!
//! Generic over embedded-hal 1.0 pin types. Steps are scheduled against a
//! [`SystemClock`], so [`run`](MotionPrimitive::run) never blocks longer
//! than one step pulse.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::error::{MotorError, Result};
use crate::motion::{
    step_interval_us, stopping_steps, Direction, MotionPhase, MotionPrimitive, SpeedRamp,
    SystemClock,
};

/// STEP pulse width used when none is configured.
pub const DEFAULT_PULSE_WIDTH_NS: u32 = 2_000;

/// Stepper motor driver behind a STEP/DIR interface.
///
/// Generic over:
/// - `STEP`: STEP pin type (must implement `OutputPin`)
/// - `DIR`: DIR pin type (must implement `OutputPin`)
/// - `DELAY`: Delay provider for the STEP pulse width (must implement `DelayNs`)
/// - `CLOCK`: Time source for step scheduling (must implement `SystemClock`)
pub struct StepperDriver<STEP, DIR, DELAY, CLOCK>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    CLOCK: SystemClock,
{
    /// STEP pin (pulse to move one step).
    step_pin: STEP,

    /// DIR pin (high = forward).
    dir_pin: DIR,

    /// Delay provider for the pulse width.
    delay: DELAY,

    /// Time source.
    clock: CLOCK,

    /// Current absolute position in steps.
    position: i64,

    /// Target position in steps.
    target: i64,

    /// Speed state.
    ramp: SpeedRamp,

    /// Time of the last step, `None` when the next step is due immediately.
    last_step_us: Option<u64>,

    /// Current direction (cached to avoid unnecessary pin writes).
    current_direction: Option<Direction>,

    /// STEP high time in nanoseconds.
    pulse_width_ns: u32,
}

impl<STEP, DIR, DELAY, CLOCK> StepperDriver<STEP, DIR, DELAY, CLOCK>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    CLOCK: SystemClock,
{
    /// Create a driver at position zero, at rest.
    pub fn new(
        step_pin: STEP,
        dir_pin: DIR,
        delay: DELAY,
        clock: CLOCK,
        max_speed: f32,
        acceleration: f32,
    ) -> Self {
        Self {
            step_pin,
            dir_pin,
            delay,
            clock,
            position: 0,
            target: 0,
            ramp: SpeedRamp::new(max_speed, acceleration),
            last_step_us: None,
            current_direction: None,
            pulse_width_ns: DEFAULT_PULSE_WIDTH_NS,
        }
    }

    /// Set the STEP pulse width in nanoseconds.
    pub fn set_pulse_width_ns(&mut self, ns: u32) {
        self.pulse_width_ns = ns;
    }

    /// Current speed magnitude in steps/sec.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.ramp.speed()
    }

    /// Current direction of travel.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.ramp.direction()
    }

    /// Current ramp phase.
    #[inline]
    pub fn phase(&self) -> MotionPhase {
        self.ramp.phase()
    }

    /// Speed ceiling in steps/sec.
    #[inline]
    pub fn max_speed(&self) -> f32 {
        self.ramp.max_speed()
    }

    /// Acceleration in steps/sec².
    #[inline]
    pub fn acceleration(&self) -> f32 {
        self.ramp.acceleration()
    }

    /// Release the pins, delay and clock.
    pub fn release(self) -> (STEP, DIR, DELAY, CLOCK) {
        (self.step_pin, self.dir_pin, self.delay, self.clock)
    }

    fn step_due(&self, now: u64) -> bool {
        match self.last_step_us {
            None => true,
            Some(last) => now.saturating_sub(last) >= step_interval_us(self.ramp.speed()),
        }
    }

    fn set_direction(&mut self, direction: Direction) -> Result<()> {
        if self.current_direction == Some(direction) {
            return Ok(());
        }

        match direction {
            Direction::Forward => self.dir_pin.set_high(),
            Direction::Reverse => self.dir_pin.set_low(),
        }
        .map_err(|_| MotorError::PinError)?;

        self.current_direction = Some(direction);
        Ok(())
    }

    /// Emit one STEP pulse in the ramp's direction and count it.
    fn pulse(&mut self, now: u64) -> Result<()> {
        let direction = self.ramp.direction();
        self.set_direction(direction)?;

        self.step_pin.set_high().map_err(|_| MotorError::PinError)?;
        self.delay.delay_ns(self.pulse_width_ns);
        self.step_pin.set_low().map_err(|_| MotorError::PinError)?;

        self.position += direction.sign();
        self.last_step_us = Some(now);
        Ok(())
    }
}

impl<STEP, DIR, DELAY, CLOCK> MotionPrimitive for StepperDriver<STEP, DIR, DELAY, CLOCK>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    CLOCK: SystemClock,
{
    fn set_max_speed(&mut self, steps_per_sec: f32) {
        self.ramp.set_max_speed(steps_per_sec);
    }

    fn set_acceleration(&mut self, steps_per_sec2: f32) {
        self.ramp.set_acceleration(steps_per_sec2);
    }

    fn move_by(&mut self, relative: i64) {
        self.target = self.position + relative;
    }

    fn move_to(&mut self, absolute: i64) {
        self.target = absolute;
    }

    fn stop(&mut self) {
        if self.ramp.is_at_rest() {
            self.target = self.position;
            return;
        }

        let sign = self.ramp.direction().sign();
        let mut steps = stopping_steps(self.ramp.speed(), self.ramp.acceleration());

        // A target already ahead and closer than the stopping point is kept.
        let ahead = self.distance_to_go() * sign;
        if ahead > 0 {
            steps = steps.min(ahead);
        }

        self.target = self.position + sign * steps;
        if steps == 0 {
            self.ramp.halt();
        }
    }

    fn run(&mut self) -> Result<bool> {
        let remaining = self.distance_to_go();
        if remaining == 0 {
            self.ramp.halt();
            return Ok(false);
        }

        if self.ramp.is_at_rest() {
            self.ramp.start(Direction::from_steps(remaining));
            self.last_step_us = None;
        }

        let now = self.clock.now_us();
        if !self.step_due(now) {
            return Ok(true);
        }

        self.pulse(now)?;
        self.ramp.advance(self.distance_to_go());

        Ok(!self.ramp.is_at_rest() || self.distance_to_go() != 0)
    }

    fn run_speed(&mut self) -> Result<bool> {
        if self.ramp.is_at_rest() {
            return Ok(false);
        }

        let now = self.clock.now_us();
        if !self.step_due(now) {
            return Ok(false);
        }

        self.pulse(now)?;
        Ok(true)
    }

    fn set_speed(&mut self, steps_per_sec: f32) {
        self.ramp.set_constant(steps_per_sec);
    }

    fn velocity(&self) -> f32 {
        self.ramp.direction().apply(self.ramp.speed())
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
        self.ramp.halt();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use core::time::Duration;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTransaction};
    use std::rc::Rc;

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    #[derive(Debug, Default)]
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

    /// Clock that moves forward 100µs every time it is read.
    fn ticking_clock() -> impl Fn() -> Duration {
        let ticks = Rc::new(Cell::new(0u64));
        move || {
            ticks.set(ticks.get() + 100);
            Duration::from_micros(ticks.get())
        }
    }

    fn driver() -> StepperDriver<NullPin, NullPin, NoDelay, impl Fn() -> Duration> {
        StepperDriver::new(NullPin, NullPin, NoDelay, ticking_clock(), 1000.0, 5000.0)
    }

    #[test]
    fn test_first_step_emits_pulse() {
        let mut step = PinMock::new(&[
            PinTransaction::set(State::High),
            PinTransaction::set(State::Low),
        ]);
        let mut dir = PinMock::new(&[PinTransaction::set(State::Low)]);

        let mut motor = StepperDriver::new(
            step.clone(),
            dir.clone(),
            NoDelay,
            ticking_clock(),
            1000.0,
            5000.0,
        );
        motor.move_by(-3);
        assert!(motor.run().unwrap());
        assert_eq!(motor.current_position(), -1);
        assert_eq!(motor.distance_to_go(), -2);

        step.done();
        dir.done();
    }

    #[test]
    fn test_run_reaches_target_exactly() {
        let mut motor = driver();
        motor.move_to(400);

        let mut guard = 0;
        while motor.run().unwrap() {
            guard += 1;
            assert!(guard < 1_000_000);
        }

        assert_eq!(motor.current_position(), 400);
        assert_eq!(motor.distance_to_go(), 0);
        assert_eq!(motor.phase(), MotionPhase::Complete);
        assert!(!motor.is_running());
    }

    #[test]
    fn test_stop_at_rest_cancels_target() {
        let mut motor = driver();
        motor.move_by(100);
        motor.stop();

        assert_eq!(motor.distance_to_go(), 0);
        assert!(!motor.run().unwrap());
        assert_eq!(motor.current_position(), 0);
    }

    #[test]
    fn test_repeated_stop_shrinks_distance() {
        let mut motor = driver();
        motor.move_by(10_000);
        for _ in 0..20_000 {
            motor.run().unwrap();
        }
        assert!(motor.speed() > 500.0);

        let mut last = i64::MAX;
        let mut guard = 0;
        loop {
            motor.stop();
            motor.run().unwrap();
            let remaining = motor.distance_to_go().abs();
            assert!(remaining <= last);
            last = remaining;
            if remaining == 0 && motor.speed() == 0.0 {
                break;
            }
            guard += 1;
            assert!(guard < 1_000_000);
        }
        assert!(motor.current_position() < 10_000);
    }

    #[test]
    fn test_run_speed_holds_velocity() {
        let mut motor = driver();
        motor.set_speed(-500.0);

        // 500 steps/s at 100µs per clock read: one step every 20 reads
        let mut steps = 0;
        for _ in 0..200 {
            if motor.run_speed().unwrap() {
                steps += 1;
            }
        }
        assert_eq!(steps, 10);
        assert_eq!(motor.current_position(), -10);
        assert_eq!(motor.target_position(), 0);
        assert_eq!(motor.velocity(), -500.0);
    }

    #[test]
    fn test_velocity_follows_travel_not_target() {
        let mut motor = driver();
        motor.move_by(-2000);
        for _ in 0..5_000 {
            motor.run().unwrap();
        }
        assert!(motor.velocity() < 0.0);

        // Flipping the target does not flip the travel until the ramp reverses.
        motor.move_to(2000);
        motor.run().unwrap();
        assert!(motor.velocity() < 0.0);

        let here = motor.current_position();
        motor.set_current_position(here);
        assert_eq!(motor.velocity(), 0.0);
    }

    #[test]
    fn test_set_current_position_halts() {
        let mut motor = driver();
        motor.move_by(1000);
        for _ in 0..500 {
            motor.run().unwrap();
        }
        let here = motor.current_position();
        motor.set_current_position(here);

        assert_eq!(motor.distance_to_go(), 0);
        assert_eq!(motor.speed(), 0.0);
    }
}
