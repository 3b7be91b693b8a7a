//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::{AxisConfig, AxisKind, SystemConfig};

/// Validate a system configuration.
///
/// Checks:
/// - Speeds and accelerations are positive
/// - The homing retract is non-negative
/// - Stepover is only set on horizontal axes, stepdown and dwell only on vertical ones
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    for (name, axis) in config.axes.iter() {
        validate_axis(name.as_str(), axis)?;
    }

    Ok(())
}

/// Validate a single axis configuration.
pub fn validate_axis(name: &str, config: &AxisConfig) -> Result<()> {
    if !is_positive(config.max_speed) {
        return Err(Error::Config(ConfigError::InvalidMaxSpeed(config.max_speed)));
    }

    if !is_positive(config.acceleration) {
        return Err(Error::Config(ConfigError::InvalidAcceleration(
            config.acceleration,
        )));
    }

    if !is_positive(config.home_speed) {
        return Err(Error::Config(ConfigError::InvalidHomeSpeed(config.home_speed)));
    }

    if !config.home_backoff.is_finite() || config.home_backoff < 0.0 {
        return Err(Error::Config(ConfigError::InvalidBackoff(config.home_backoff)));
    }

    for distance in [config.stepover, config.stepdown].into_iter().flatten() {
        if !distance.is_finite() {
            return Err(Error::Config(ConfigError::InvalidStepDistance(distance)));
        }
    }

    let misplaced = match config.kind {
        AxisKind::Horizontal if config.stepdown.is_some() => Some("stepdown"),
        AxisKind::Horizontal if config.dwell_ms.is_some() => Some("dwell_ms"),
        AxisKind::Vertical if config.stepover.is_some() => Some("stepover"),
        _ => None,
    };

    if let Some(setting) = misplaced {
        return Err(Error::Config(ConfigError::KindMismatch {
            axis: heapless::String::try_from(name).unwrap_or_default(),
            setting,
        }));
    }

    Ok(())
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
