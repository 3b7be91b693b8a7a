//! The motion primitive an axis drives.

use crate::error::Result;

/// Acceleration-limited step generator for one physical stepper.
///
/// Positions and distances are raw steps; speeds are steps/sec and
/// accelerations steps/sec². Two motion modes are exposed and must not be
/// mixed within one move: profile motion toward a target (`move_*` +
/// [`run`](Self::run)) and constant-velocity motion ([`set_speed`](Self::set_speed)
/// + [`run_speed`](Self::run_speed)).
pub trait MotionPrimitive {
    /// Set the speed ceiling used by subsequent profile motion.
    fn set_max_speed(&mut self, steps_per_sec: f32);

    /// Set the acceleration used by subsequent profile motion.
    fn set_acceleration(&mut self, steps_per_sec2: f32);

    /// Target a position relative to the current position.
    fn move_by(&mut self, relative: i64);

    /// Target an absolute position.
    fn move_to(&mut self, absolute: i64);

    /// Retarget to the nearest position the motor can decelerate to.
    ///
    /// At rest this cancels any pending target. Non-blocking: keep calling
    /// [`run`](Self::run) to actually come to rest.
    fn stop(&mut self);

    /// Take at most one step if one is due under the active profile.
    ///
    /// Returns `true` while the motor is still moving or has distance to go.
    fn run(&mut self) -> Result<bool>;

    /// Take at most one step at the constant speed set by
    /// [`set_speed`](Self::set_speed). Returns `true` if a step was taken.
    fn run_speed(&mut self) -> Result<bool>;

    /// Set the signed constant speed used by [`run_speed`](Self::run_speed).
    fn set_speed(&mut self, steps_per_sec: f32);

    /// Signed current velocity in steps/sec, zero at rest.
    fn velocity(&self) -> f32;

    /// Current position in steps.
    fn current_position(&self) -> i64;

    /// Most recently set target position in steps.
    fn target_position(&self) -> i64;

    /// Steps from the current position to the target.
    fn distance_to_go(&self) -> i64 {
        self.target_position() - self.current_position()
    }

    /// Redefine the current position. Also sets the target there and drops
    /// the speed to zero, which halts the motor on the spot.
    fn set_current_position(&mut self, position: i64);

    /// True while there is distance left to go.
    fn is_running(&self) -> bool {
        self.distance_to_go() != 0
    }
}
