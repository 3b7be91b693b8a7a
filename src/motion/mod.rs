//! Motion module for weld-axis.
//!
//! Provides the motion primitive contract, the step-by-step speed ramp
//! and the clock used to schedule steps.

mod clock;
mod primitive;
mod profile;
mod ramp;

#[cfg(feature = "std")]
pub use clock::OperatingSystemClock;
pub use clock::SystemClock;
pub use primitive::MotionPrimitive;
pub use profile::{start_speed, step_interval_us, steps_to_stop, stopping_steps, Direction, MotionPhase};
pub use ramp::SpeedRamp;
