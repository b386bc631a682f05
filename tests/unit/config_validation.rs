//! Unit tests for configuration validation.

use stepper_focuser::config::{parse_config, validate_config, FocuserConfig};
use stepper_focuser::error::{ConfigError, Error};

fn parse(toml_str: &str) -> FocuserConfig {
    toml::from_str(toml_str).expect("Failed to parse TOML")
}

/// Test validation of a valid configuration.
#[test]
fn test_valid_config_passes_validation() {
    let config = parse(
        r#"
[motor]
step_mode = 32
speed = 7000
"#,
    );
    assert!(validate_config(&config).is_ok());
}

#[test]
fn test_zero_acceleration() {
    let config = parse("[motor]\nacceleration = 0\n");
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidAcceleration(0)))
    ));
}

#[test]
fn test_zero_ramp_interval() {
    let config = parse("[motor]\nramp_interval_ms = 0\n");
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidRampInterval(0)))
    ));
}

#[test]
fn test_pulse_width_bounds() {
    let config = parse("[motor]\npulse_width_us = 0\n");
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidPulseWidth(0)))
    ));

    let config = parse("[motor]\npulse_width_us = 1001\n");
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidPulseWidth(1001)))
    ));

    let config = parse("[motor]\npulse_width_us = 1000\n");
    assert!(validate_config(&config).is_ok());
}

#[test]
fn test_zero_idle_timeout() {
    let config = parse("[motor]\nidle_timeout_us = 0\n");
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidIdleTimeout(0)))
    ));
}

#[test]
fn test_zero_compensation_interval() {
    let config = parse("[temperature]\ninterval_ms = 0\n");
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidCompensationInterval(0)))
    ));
}

#[test]
fn test_jog_parameters() {
    let config = parse("[jog]\nsteps_per_count = 0\n");
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidJog("steps_per_count")))
    ));

    let config = parse("[jog]\nboost_divisor = 0\n");
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidJog("boost_divisor")))
    ));
}

/// `parse_config` validates after parsing.
#[test]
fn test_parse_config_validates() {
    let result = parse_config("[motor]\nacceleration = 0\n");
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidAcceleration(0)))
    ));
}
