//! # weld-axis
//!
//! Axis control for stepper-driven CNC-style machines, built on embedded-hal 1.0.
//!
//! ## Features
//!
//! - **Logical units**: Sign inversion and a units-per-step scale applied on every command and report
//! - **Homing**: Blocking seek/retract/zero procedure against an active-low limit switch
//! - **Emergency stop**: Per-axis latch, optionally fed by an active-low input
//! - **Stepover and stepdown**: Horizontal and vertical motion profiles built on one axis type
//! - **embedded-hal 1.0**: `OutputPin` for STEP/DIR, `InputPin` for switches, `DelayNs` for timing
//! - **no_std compatible**: Core library works without standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use weld_axis::{AxisBuilder, Direction, HorizontalAxis, StepperDriverBuilder};
//!
//! let config = weld_axis::load_config("welder.toml")?;
//!
//! let driver = StepperDriverBuilder::new()
//!     .step_pin(step_pin)
//!     .dir_pin(dir_pin)
//!     .delay(delay)
//!     .clock(clock)
//!     .from_axis_config(config.axis("x").unwrap())
//!     .build()?;
//!
//! let axis = AxisBuilder::from_config(&config, "x")?
//!     .motion(driver)
//!     .home_sensor(x_limit)
//!     .build()?;
//!
//! let mut x = HorizontalAxis::from_config(axis, config.axis("x").unwrap())?;
//! x.axis_mut().home()?;
//! x.stepover_blocking(Direction::Forward)?;
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O, TOML parsing and the OS clock
//! - `defmt`: Derives `defmt::Format` on the public state types

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

// Core modules
pub mod axis;
pub mod config;
pub mod error;
pub mod motion;
pub mod motor;

// Re-exports for ergonomic API
pub use axis::{
    Axis, AxisBuilder, HomeOutcome, HomingState, HorizontalAxis, MoveOutcome, NoSensor, ZAxis,
};
pub use config::{validate_config, AxisConfig, AxisKind, SystemConfig};
pub use error::{Error, Result};
pub use motion::{Direction, MotionPhase, MotionPrimitive, SystemClock};
pub use motor::{StepperDriver, StepperDriverBuilder};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

#[cfg(feature = "std")]
pub use motion::OperatingSystemClock;

// Unit types
pub use config::units::{Scale, Steps};
