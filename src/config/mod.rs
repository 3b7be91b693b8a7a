//! Configuration module for weld-axis.
//!
//! Provides types for loading and validating axis configurations
//! from TOML files (with `std` feature) or pre-parsed data.

mod axis;
mod system;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use axis::{AxisConfig, AxisKind, DEFAULT_HOME_BACKOFF, DEFAULT_HOME_SPEED};
pub use system::SystemConfig;
pub use validation::{validate_axis, validate_config};

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Scale, Steps};
