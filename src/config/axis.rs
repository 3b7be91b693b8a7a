//! Axis configuration from TOML.

use serde::Deserialize;

use super::units::Scale;

/// Default homing speed in logical units per second.
pub const DEFAULT_HOME_SPEED: f32 = 500.0;

/// Default homing retract distance in logical units.
pub const DEFAULT_HOME_BACKOFF: f32 = 100.0;

/// Which motion profile an axis carries on top of the base axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisKind {
    /// Lateral axis moved in stepovers.
    Horizontal,
    /// Plunge axis moved in stepdown/stepup cycles.
    Vertical,
}

/// Complete axis configuration from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct AxisConfig {
    /// Axis kind.
    pub kind: AxisKind,

    /// Flip the sign of every commanded and reported position.
    #[serde(default)]
    pub inverted: bool,

    /// Logical units per motor step.
    #[serde(default)]
    pub scale: Scale,

    /// Maximum speed in logical units per second.
    pub max_speed: f32,

    /// Acceleration in logical units per second squared.
    pub acceleration: f32,

    /// Constant speed used while seeking the home switch.
    #[serde(default = "default_home_speed")]
    pub home_speed: f32,

    /// Retract distance after the home switch triggers.
    #[serde(default = "default_home_backoff")]
    pub home_backoff: f32,

    /// Stepover distance (horizontal axes only).
    #[serde(default)]
    pub stepover: Option<f32>,

    /// Stepdown distance (vertical axes only).
    #[serde(default)]
    pub stepdown: Option<f32>,

    /// Dwell at the bottom of a stepdown cycle in milliseconds (vertical axes only).
    #[serde(default)]
    pub dwell_ms: Option<u32>,
}

fn default_home_speed() -> f32 {
    DEFAULT_HOME_SPEED
}

fn default_home_backoff() -> f32 {
    DEFAULT_HOME_BACKOFF
}

impl AxisConfig {
    /// Create a configuration with the given kind and motion limits, all
    /// other settings at their defaults.
    pub fn new(kind: AxisKind, max_speed: f32, acceleration: f32) -> Self {
        Self {
            kind,
            inverted: false,
            scale: Scale::UNITY,
            max_speed,
            acceleration,
            home_speed: DEFAULT_HOME_SPEED,
            home_backoff: DEFAULT_HOME_BACKOFF,
            stepover: None,
            stepdown: None,
            dwell_ms: None,
        }
    }

    /// Maximum speed in steps per second.
    pub fn max_speed_steps(&self) -> f32 {
        self.scale.rate_to_steps(self.max_speed)
    }

    /// Acceleration in steps per second squared.
    pub fn acceleration_steps(&self) -> f32 {
        self.scale.rate_to_steps(self.acceleration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_rates_follow_scale() {
        let mut config = AxisConfig::new(AxisKind::Horizontal, 100.0, 400.0);
        config.scale = Scale::new(0.05).unwrap();

        // 100 units/s at 0.05 units/step = 2000 steps/s
        assert!((config.max_speed_steps() - 2000.0).abs() < 0.5);
        assert!((config.acceleration_steps() - 8000.0).abs() < 1.0);
    }

    #[test]
    fn test_defaults() {
        let config = AxisConfig::new(AxisKind::Vertical, 100.0, 400.0);
        assert!(!config.inverted);
        assert_eq!(config.scale, Scale::UNITY);
        assert_eq!(config.home_speed, DEFAULT_HOME_SPEED);
        assert_eq!(config.home_backoff, DEFAULT_HOME_BACKOFF);
    }
}
