//! Unit tests for TOML configuration parsing.

use std::io::Write;

use stepper_focuser::config::{load_config, FocuserConfig};
use stepper_focuser::{Direction, MoveMode, StepMode};

/// Test parsing a complete focuser configuration from TOML.
#[test]
fn test_parse_full_config() {
    let toml_str = r#"
name = "main focuser"

[motor]
step_mode = 64
move_mode = "smooth"
speed = 12000
acceleration = 200
ramp_interval_ms = 25
direction = "counter_clockwise"
idle_timeout_us = 2000000
hold_torque = false
pulse_width_us = 10

[temperature]
enabled = true
coefficient = -12
interval_ms = 60000

[jog]
steps_per_count = 2
boost_divisor = 10
"#;

    let config: FocuserConfig = toml::from_str(toml_str).expect("Failed to parse TOML");

    assert_eq!(config.name(), "main focuser");
    assert_eq!(config.motor.step_mode, StepMode::SixtyFourth);
    assert_eq!(config.motor.move_mode, MoveMode::Smooth);
    assert_eq!(config.motor.speed, 12_000);
    assert_eq!(config.motor.acceleration, 200);
    assert_eq!(config.motor.ramp_interval_ms, 25);
    assert_eq!(config.motor.direction, Direction::CounterClockwise);
    assert_eq!(config.motor.idle_timeout(), Some(2_000_000));
    assert_eq!(config.motor.pulse_width_us, 10);
    assert!(config.temperature.enabled);
    assert_eq!(config.temperature.coefficient, -12);
    assert_eq!(config.temperature.interval_ms, 60_000);
    assert_eq!(config.jog.steps_per_count, 2);
    assert_eq!(config.jog.boost_divisor, 10);
}

/// Missing tables take the power-on defaults.
#[test]
fn test_partial_config_uses_defaults() {
    let toml_str = r#"
[motor]
speed = 500
"#;

    let config: FocuserConfig = toml::from_str(toml_str).expect("Failed to parse TOML");

    assert_eq!(config.name(), "focuser");
    assert_eq!(config.motor.speed, 500);
    assert_eq!(config.motor.step_mode, StepMode::Eighth);
    assert_eq!(config.motor.move_mode, MoveMode::PerStep);
    assert_eq!(config.motor.acceleration, 100);
    assert_eq!(config.motor.ramp_interval_ms, 50);
    assert_eq!(config.motor.idle_timeout(), Some(1_000_000));
    assert!(!config.temperature.enabled);
    assert_eq!(config.temperature.interval_ms, 30_000);
}

/// Speeds above the step mode cap parse and are clamped later.
#[test]
fn test_speed_above_cap_is_accepted() {
    let toml_str = r#"
[motor]
step_mode = 8
speed = 50000
"#;

    let config: FocuserConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    assert_eq!(config.motor.speed, 50_000);
    assert_eq!(config.motor.effective_speed(), 3_000);
}

/// Unknown move mode names are rejected.
#[test]
fn test_invalid_move_mode() {
    let toml_str = r#"
[motor]
move_mode = "bouncy"
"#;

    let result: Result<FocuserConfig, _> = toml::from_str(toml_str);
    assert!(result.is_err());
}

/// Test loading a configuration file from disk.
#[test]
fn test_load_config_from_file() {
    let path = std::env::temp_dir().join("stepper_focuser_load_test.toml");
    {
        let mut file = std::fs::File::create(&path).expect("Failed to create temp file");
        writeln!(file, "[motor]\nstep_mode = 16\nhold_torque = true").unwrap();
    }

    let config = load_config(&path).expect("Failed to load config");
    assert_eq!(config.motor.step_mode, StepMode::Sixteenth);
    assert_eq!(config.motor.idle_timeout(), None);

    let _ = std::fs::remove_file(&path);
}
