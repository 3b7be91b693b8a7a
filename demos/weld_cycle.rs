//! Weld cycle example.
//!
//! Homes a horizontal and a vertical axis, then runs three stepover/stepdown
//! weld cycles with a dwell at the bottom of each plunge.
//!
//! The pins are simulated: a shared position counter sits behind each
//! STEP/DIR pair and the home switches read it.

use std::cell::Cell;
use std::rc::Rc;

use weld_axis::{
    parse_config, AxisBuilder, Direction, HorizontalAxis, OperatingSystemClock,
    StepperDriverBuilder, ZAxis,
};

const WELDER_CONFIG: &str = r#"
[axes.x]
kind = "horizontal"
scale = 0.05
max_speed = 100.0
acceleration = 1000.0
home_speed = 25.0
home_backoff = 2.0
stepover = 6.0

[axes.z]
kind = "vertical"
inverted = true
scale = 0.02
max_speed = 40.0
acceleration = 400.0
home_speed = 10.0
home_backoff = 1.0
stepdown = 3.0
dwell_ms = 150
"#;

/// Delay provider backed by the OS scheduler.
struct SleepDelay;

impl embedded_hal::delay::DelayNs for SleepDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(ns as u64));
    }
}

/// Simulated carriage shared by one axis's pins and home switch.
#[derive(Clone)]
struct Carriage {
    position: Rc<Cell<i64>>,
    forward: Rc<Cell<bool>>,
    /// Home switch closes at or below this raw position.
    switch_below: Option<i64>,
    /// Home switch closes at or above this raw position.
    switch_above: Option<i64>,
}

impl Carriage {
    fn new(start: i64) -> Self {
        Self {
            position: Rc::new(Cell::new(start)),
            forward: Rc::new(Cell::new(true)),
            switch_below: None,
            switch_above: None,
        }
    }
}

struct StepPin {
    carriage: Carriage,
    high: bool,
}

impl embedded_hal::digital::ErrorType for StepPin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for StepPin {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high = true;
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        if self.high {
            let delta = if self.carriage.forward.get() { 1 } else { -1 };
            self.carriage.position.set(self.carriage.position.get() + delta);
        }
        self.high = false;
        Ok(())
    }
}

struct DirPin(Carriage);

impl embedded_hal::digital::ErrorType for DirPin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for DirPin {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.forward.set(true);
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.forward.set(false);
        Ok(())
    }
}

struct HomeSwitch(Carriage);

impl embedded_hal::digital::ErrorType for HomeSwitch {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::InputPin for HomeSwitch {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.is_low().map(|closed| !closed)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        let position = self.0.position.get();
        let closed = self.0.switch_below.map_or(false, |at| position <= at)
            || self.0.switch_above.map_or(false, |at| position >= at);
        Ok(closed)
    }
}

fn main() {
    println!("=== Weld Cycle Example ===\n");

    let config = parse_config(WELDER_CONFIG).expect("Failed to parse config");
    for name in config.axis_names() {
        println!("Configured axis: {}", name);
    }

    // X carriage starts 60 steps off its switch; Z is inverted so its
    // switch sits on the raw positive side.
    let mut x_carriage = Carriage::new(0);
    x_carriage.switch_below = Some(-60);
    let mut z_carriage = Carriage::new(0);
    z_carriage.switch_above = Some(40);

    let x_config = config.axis("x").expect("x axis missing");
    let x_driver = StepperDriverBuilder::new()
        .step_pin(StepPin {
            carriage: x_carriage.clone(),
            high: false,
        })
        .dir_pin(DirPin(x_carriage.clone()))
        .delay(SleepDelay)
        .clock(OperatingSystemClock::new())
        .from_axis_config(x_config)
        .build()
        .expect("Failed to build x driver");
    let x_axis = AxisBuilder::from_config(&config, "x")
        .expect("x axis missing")
        .motion(x_driver)
        .home_sensor(HomeSwitch(x_carriage.clone()))
        .build()
        .expect("Failed to build x axis");
    let mut x = HorizontalAxis::from_config(x_axis, x_config).expect("x is not horizontal");

    let z_config = config.axis("z").expect("z axis missing");
    let z_driver = StepperDriverBuilder::new()
        .step_pin(StepPin {
            carriage: z_carriage.clone(),
            high: false,
        })
        .dir_pin(DirPin(z_carriage.clone()))
        .delay(SleepDelay)
        .clock(OperatingSystemClock::new())
        .from_axis_config(z_config)
        .build()
        .expect("Failed to build z driver");
    let z_axis = AxisBuilder::from_config(&config, "z")
        .expect("z axis missing")
        .motion(z_driver)
        .home_sensor(HomeSwitch(z_carriage.clone()))
        .build()
        .expect("Failed to build z axis");
    let mut z = ZAxis::from_config(z_axis, z_config).expect("z is not vertical");

    println!("\n=== Homing ===");
    let outcome = z.axis_mut().home().expect("z homing failed");
    println!("Z: {:?}, raw carriage at {}", outcome, z_carriage.position.get());
    let outcome = x.axis_mut().home().expect("x homing failed");
    println!("X: {:?}, raw carriage at {}", outcome, x_carriage.position.get());

    println!("\n=== Weld Cycles ===");
    let mut dwell = SleepDelay;
    for cycle in 1..=3 {
        let over = x
            .stepover_blocking(Direction::Forward)
            .expect("stepover failed");
        let plunge = z.stepdown_cycle_dwell(&mut dwell).expect("stepdown failed");
        println!(
            "Cycle {}: stepover {:?}, plunge {:?}, x = {:.2}, z = {:.2}",
            cycle,
            over,
            plunge,
            x.axis().position(),
            z.axis().position()
        );
    }

    println!("\n=== Return ===");
    x.axis_mut().move_to(0.0);
    let outcome = x.axis_mut().run_to_completion().expect("return failed");
    println!("X back at {:.2} ({:?})", x.axis().position(), outcome);

    println!("\n=== Example Complete ===");
}
