//! Error types for weld-axis library.
//!
//! Motion faults are handled by the per-axis emergency-stop latch, not by
//! errors. What remains here is configuration and hardware failure.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all weld-axis operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Motor or GPIO error
    Motor(MotorError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Axis name not found in configuration
    AxisNotFound(heapless::String<32>),
    /// Invalid scale (must be finite and > 0)
    InvalidScale(f32),
    /// Invalid max speed (must be > 0)
    InvalidMaxSpeed(f32),
    /// Invalid acceleration (must be > 0)
    InvalidAcceleration(f32),
    /// Invalid homing speed (must be > 0)
    InvalidHomeSpeed(f32),
    /// Invalid homing retract distance (must be >= 0)
    InvalidBackoff(f32),
    /// Stepover or stepdown distance is not a finite number
    InvalidStepDistance(f32),
    /// Setting does not apply to this kind of axis
    KindMismatch {
        /// Axis name
        axis: heapless::String<32>,
        /// Offending setting
        setting: &'static str,
    },
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Motor and GPIO errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MotorError {
    /// Pin operation failed
    PinError,
    /// A required part was not supplied to a builder
    MissingPart(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Motor(e) => write!(f, "Motor error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::AxisNotFound(name) => write!(f, "Axis '{}' not found", name),
            ConfigError::InvalidScale(v) => write!(f, "Invalid scale: {}. Must be finite and > 0", v),
            ConfigError::InvalidMaxSpeed(v) => write!(f, "Invalid max speed: {}. Must be > 0", v),
            ConfigError::InvalidAcceleration(v) => {
                write!(f, "Invalid acceleration: {}. Must be > 0", v)
            }
            ConfigError::InvalidHomeSpeed(v) => write!(f, "Invalid home speed: {}. Must be > 0", v),
            ConfigError::InvalidBackoff(v) => write!(f, "Invalid home backoff: {}. Must be >= 0", v),
            ConfigError::InvalidStepDistance(v) => {
                write!(f, "Invalid step distance: {}. Must be finite", v)
            }
            ConfigError::KindMismatch { axis, setting } => {
                write!(f, "Setting '{}' does not apply to axis '{}'", setting, axis)
            }
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::PinError => write!(f, "GPIO pin operation failed"),
            MotorError::MissingPart(part) => write!(f, "{} is required", part),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Error::Motor(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for MotorError {}
