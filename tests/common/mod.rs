//! Simulated axis rig shared by the integration tests.
//!
//! One position model sits behind the STEP/DIR pins. The home switch and
//! e-stop inputs read that model, and a virtual clock advances on every
//! read so the driver's step scheduling runs without real time passing.

#![allow(dead_code)]

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;
use std::time::Duration;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use weld_axis::{StepperDriver, StepperDriverBuilder, SystemClock};

/// Virtual time added on each clock read.
pub const TICK_US: u64 = 50;

/// Upper bound on control-loop iterations in tests.
pub const LOOP_GUARD: u32 = 5_000_000;

/// Where the home switch closes, in raw steps.
#[derive(Debug, Clone, Copy)]
pub enum Switch {
    /// Closed at or below this position.
    Below(i64),
    /// Closed at or above this position.
    Above(i64),
}

#[derive(Debug, Default)]
struct RigState {
    position: i64,
    forward: bool,
    step_high: bool,
    steps_taken: u64,
    switch: Option<Switch>,
    estop_after: Option<u64>,
    time_us: u64,
    dwell_ns: u64,
}

/// Shared handle to the simulated machine.
#[derive(Debug, Clone, Default)]
pub struct Rig {
    state: Rc<RefCell<RigState>>,
}

pub type RigDriver = StepperDriver<StepPin, DirPin, RigDelay, RigClock>;

impl Rig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_switch(self, switch: Switch) -> Self {
        self.state.borrow_mut().switch = Some(switch);
        self
    }

    /// Assert the e-stop input once this many steps have been taken.
    pub fn estop_after(&self, steps: u64) {
        self.state.borrow_mut().estop_after = Some(steps);
    }

    pub fn release_estop(&self) {
        self.state.borrow_mut().estop_after = None;
    }

    pub fn driver(&self, max_speed: f32, acceleration: f32) -> RigDriver {
        StepperDriverBuilder::new()
            .step_pin(self.step_pin())
            .dir_pin(self.dir_pin())
            .delay(self.pulse_delay())
            .clock(self.clock())
            .max_speed(max_speed)
            .acceleration(acceleration)
            .build()
            .expect("rig driver")
    }

    pub fn step_pin(&self) -> StepPin {
        StepPin(self.clone())
    }

    pub fn dir_pin(&self) -> DirPin {
        DirPin(self.clone())
    }

    pub fn clock(&self) -> RigClock {
        RigClock(self.clone())
    }

    pub fn home_switch(&self) -> HomeSwitch {
        HomeSwitch(self.clone())
    }

    pub fn estop_input(&self) -> EstopInput {
        EstopInput(self.clone())
    }

    /// Delay used for STEP pulses. Only advances virtual time.
    pub fn pulse_delay(&self) -> RigDelay {
        RigDelay {
            rig: self.clone(),
            records_dwell: false,
        }
    }

    /// Delay used for dwells. Records the total requested.
    pub fn dwell_delay(&self) -> RigDelay {
        RigDelay {
            rig: self.clone(),
            records_dwell: true,
        }
    }

    pub fn position(&self) -> i64 {
        self.state.borrow().position
    }

    pub fn steps_taken(&self) -> u64 {
        self.state.borrow().steps_taken
    }

    pub fn dwell_ns(&self) -> u64 {
        self.state.borrow().dwell_ns
    }

    pub fn switch_closed(&self) -> bool {
        let state = self.state.borrow();
        match state.switch {
            Some(Switch::Below(at)) => state.position <= at,
            Some(Switch::Above(at)) => state.position >= at,
            None => false,
        }
    }

    fn estop_asserted(&self) -> bool {
        let state = self.state.borrow();
        state
            .estop_after
            .map_or(false, |after| state.steps_taken >= after)
    }
}

pub struct StepPin(Rig);

impl ErrorType for StepPin {
    type Error = Infallible;
}

impl OutputPin for StepPin {
    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.state.borrow_mut().step_high = true;
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Infallible> {
        let mut state = self.0.state.borrow_mut();
        if state.step_high {
            state.position += if state.forward { 1 } else { -1 };
            state.steps_taken += 1;
        }
        state.step_high = false;
        Ok(())
    }
}

pub struct DirPin(Rig);

impl ErrorType for DirPin {
    type Error = Infallible;
}

impl OutputPin for DirPin {
    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.state.borrow_mut().forward = true;
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.state.borrow_mut().forward = false;
        Ok(())
    }
}

/// Active-low home switch.
pub struct HomeSwitch(Rig);

impl ErrorType for HomeSwitch {
    type Error = Infallible;
}

impl InputPin for HomeSwitch {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(!self.0.switch_closed())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(self.0.switch_closed())
    }
}

/// Active-low e-stop input.
pub struct EstopInput(Rig);

impl ErrorType for EstopInput {
    type Error = Infallible;
}

impl InputPin for EstopInput {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(!self.0.estop_asserted())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(self.0.estop_asserted())
    }
}

pub struct RigClock(Rig);

impl SystemClock for RigClock {
    fn elapsed(&self) -> Duration {
        let mut state = self.0.state.borrow_mut();
        state.time_us += TICK_US;
        Duration::from_micros(state.time_us)
    }
}

pub struct RigDelay {
    rig: Rig,
    records_dwell: bool,
}

impl DelayNs for RigDelay {
    fn delay_ns(&mut self, ns: u32) {
        let mut state = self.rig.state.borrow_mut();
        state.time_us += u64::from(ns) / 1_000;
        if self.records_dwell {
            state.dwell_ns += u64::from(ns);
        }
    }
}
