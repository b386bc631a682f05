//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::{FocuserConfig, JogConfig, MotorConfig, TemperatureConfig};

/// Longest step pulse the engine will busy-wait for.
const MAX_PULSE_WIDTH_US: u32 = 1_000;

/// Validate a focuser configuration.
///
/// Checks:
/// - Ramp acceleration and period are non-zero
/// - Pulse width is within 1..=1000 µs
/// - Idle timeout is non-zero unless torque is held
/// - Compensation period and jog parameters are non-zero
///
/// Speeds above the step mode cap are accepted and clamped later.
pub fn validate_config(config: &FocuserConfig) -> Result<()> {
    validate_motor(&config.motor)?;
    validate_temperature(&config.temperature)?;
    validate_jog(&config.jog)?;
    Ok(())
}

fn validate_motor(config: &MotorConfig) -> Result<()> {
    if config.acceleration == 0 {
        return Err(Error::Config(ConfigError::InvalidAcceleration(
            config.acceleration,
        )));
    }

    if config.ramp_interval_ms == 0 {
        return Err(Error::Config(ConfigError::InvalidRampInterval(
            config.ramp_interval_ms,
        )));
    }

    if config.pulse_width_us == 0 || config.pulse_width_us > MAX_PULSE_WIDTH_US {
        return Err(Error::Config(ConfigError::InvalidPulseWidth(
            config.pulse_width_us,
        )));
    }

    if !config.hold_torque && config.idle_timeout_us == 0 {
        return Err(Error::Config(ConfigError::InvalidIdleTimeout(
            config.idle_timeout_us,
        )));
    }

    Ok(())
}

fn validate_temperature(config: &TemperatureConfig) -> Result<()> {
    if config.interval_ms == 0 {
        return Err(Error::Config(ConfigError::InvalidCompensationInterval(
            config.interval_ms,
        )));
    }
    Ok(())
}

fn validate_jog(config: &JogConfig) -> Result<()> {
    if config.steps_per_count == 0 {
        return Err(Error::Config(ConfigError::InvalidJog("steps_per_count")));
    }
    if config.boost_divisor == 0 {
        return Err(Error::Config(ConfigError::InvalidJog("boost_divisor")));
    }
    Ok(())
}
