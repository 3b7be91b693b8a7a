//! Unit types for axis quantities.
//!
//! Raw positions are counted in motor [`Steps`]. Everything callers see is in
//! logical units, related to steps by a validated [`Scale`].

use serde::Deserialize;

use crate::error::ConfigError;

/// Motor position in raw steps (absolute from origin).
///
/// Uses i64 for unlimited range in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Steps(pub i64);

impl Steps {
    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> i64 {
        self.0
    }
}

/// Logical units per raw step.
///
/// Reading a position multiplies steps by the scale; commanding one divides
/// by it, so a commanded value reads back unchanged up to half a step.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Scale(f32);

impl Scale {
    /// One logical unit per step.
    pub const UNITY: Self = Self(1.0);

    /// Create a new Scale with validation.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidScale` unless the value is finite and positive.
    pub fn new(value: f32) -> Result<Self, ConfigError> {
        if Self::is_valid(value) {
            Ok(Self(value))
        } else {
            Err(ConfigError::InvalidScale(value))
        }
    }

    /// Get the raw multiplier.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }

    /// Check if a value is usable as a scale.
    #[inline]
    pub fn is_valid(value: f32) -> bool {
        value.is_finite() && value > 0.0
    }

    /// Convert a logical quantity to steps, rounding to the nearest step.
    #[inline]
    pub fn to_steps(self, logical: f32) -> Steps {
        Steps(libm::roundf(logical / self.0) as i64)
    }

    /// Convert steps to a logical quantity.
    #[inline]
    pub fn to_logical(self, steps: Steps) -> f32 {
        steps.0 as f32 * self.0
    }

    /// Convert a logical rate (units/s or units/s²) to a step rate.
    #[inline]
    pub fn rate_to_steps(self, logical_rate: f32) -> f32 {
        logical_rate / self.0
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::UNITY
    }
}

impl TryFrom<f32> for Scale {
    type Error = ConfigError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for Scale {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use core::fmt::Write;
        let value = f32::deserialize(deserializer)?;
        Scale::new(value).map_err(|e| {
            let mut buf = heapless::String::<128>::new();
            let _ = write!(buf, "{}", e);
            serde::de::Error::custom(buf.as_str())
        })
    }
}
