//! Motor module for weld-axis.
//!
//! Provides the STEP/DIR stepper driver implementing [`MotionPrimitive`](crate::motion::MotionPrimitive).

mod builder;
mod driver;

pub use builder::StepperDriverBuilder;
pub use driver::{StepperDriver, DEFAULT_PULSE_WIDTH_NS};
