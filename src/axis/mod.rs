//! Axis module for weld-axis.
//!
//! Wraps a [`MotionPrimitive`](crate::motion::MotionPrimitive) with sign
//! inversion, unit scaling, a home/limit switch and an e-stop latch, and
//! adds the stepover and stepdown profiles on top.

mod base;
mod builder;
mod homing;
mod horizontal;
mod sensor;
mod state;
mod vertical;

#[cfg(test)]
mod test_support;

pub use base::Axis;
pub use builder::AxisBuilder;
pub use horizontal::HorizontalAxis;
pub use sensor::NoSensor;
pub use state::{HomeOutcome, HomingState, MoveOutcome};
pub use vertical::ZAxis;
