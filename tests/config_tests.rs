//! Configuration parsing and validation through the public API.

use weld_axis::config::{load_config, validate_config, AxisKind, SystemConfig};
use weld_axis::error::{ConfigError, Error};

const WELDER_TOML: &str = r#"
[axes.y]
kind = "horizontal"
inverted = true
scale = 0.0125
max_speed = 50.0
acceleration = 200.0
stepover = 18.5

[axes.z]
kind = "vertical"
max_speed = 20.0
acceleration = 100.0
stepdown = 4.0
dwell_ms = 300
"#;

/// Test that a two-axis welder configuration passes validation.
#[test]
fn test_valid_config_passes_validation() {
    let config: SystemConfig = toml::from_str(WELDER_TOML).expect("Failed to parse TOML");
    assert!(validate_config(&config).is_ok());

    let names: Vec<&str> = config.axis_names().collect();
    assert_eq!(names, ["y", "z"]);
}

/// Test the serde defaults for homing and transform.
#[test]
fn test_defaults_applied() {
    let config: SystemConfig = toml::from_str(WELDER_TOML).expect("Failed to parse TOML");
    let z = config.axis("z").expect("Axis not found");

    assert_eq!(z.kind, AxisKind::Vertical);
    assert!(!z.inverted);
    assert_eq!(z.scale.value(), 1.0);
    assert_eq!(z.home_speed, 500.0);
    assert_eq!(z.home_backoff, 100.0);
    assert_eq!(z.stepover, None);
}

/// Test that an unknown axis kind fails to parse.
#[test]
fn test_unknown_kind_rejected() {
    let toml_str = r#"
[axes.a]
kind = "rotary"
max_speed = 10.0
acceleration = 10.0
"#;

    let result: Result<SystemConfig, _> = toml::from_str(toml_str);
    assert!(result.is_err());
}

/// Test validation fails for stepover on a vertical axis.
#[test]
fn test_stepover_on_vertical_axis() {
    let toml_str = r#"
[axes.z]
kind = "vertical"
max_speed = 20.0
acceleration = 100.0
stepover = 3.0
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    let result = validate_config(&config);

    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::KindMismatch { setting: "stepover", .. }))
    ));
}

/// Test validation fails for a zero home speed.
#[test]
fn test_zero_home_speed() {
    let toml_str = r#"
[axes.y]
kind = "horizontal"
max_speed = 20.0
acceleration = 100.0
home_speed = 0.0
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidHomeSpeed(_)))
    ));
}

/// Test loading configuration from a file on disk.
#[test]
fn test_load_config_from_file() {
    let path = std::env::temp_dir().join(format!("weld-axis-{}.toml", std::process::id()));
    std::fs::write(&path, WELDER_TOML).expect("Failed to write config");

    let result = load_config(&path);
    let _ = std::fs::remove_file(&path);

    let config = result.expect("Failed to load config");
    let y = config.axis("y").expect("Axis not found");
    assert!(y.inverted);
    assert_eq!(y.stepover, Some(18.5));
}
