//! Configuration loading from files (std only).

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Error, Result};

use super::FocuserConfig;

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
///
/// # Example
///
/// ```rust,ignore
/// use stepper_focuser::load_config;
///
/// let config = load_config("focuser.toml")?;
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<FocuserConfig> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| {
        let msg = heapless::String::try_from(e.to_string().as_str()).unwrap_or_default();
        Error::Config(ConfigError::IoError(msg))
    })?;

    parse_config(&content)
}

/// Parse configuration from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or fails validation.
pub fn parse_config(content: &str) -> Result<FocuserConfig> {
    let config: FocuserConfig = toml::from_str(content).map_err(|e| {
        let msg = heapless::String::try_from(e.message()).unwrap_or_default();
        Error::Config(ConfigError::ParseError(msg))
    })?;

    super::validation::validate_config(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{MoveMode, StepMode};

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config("").unwrap();
        assert_eq!(config, FocuserConfig::default());
    }

    #[test]
    fn test_parse_motor_table() {
        let toml = r#"
name = "refractor"

[motor]
step_mode = 32
move_mode = "smooth"
speed = 7000
"#;

        let config = parse_config(toml).unwrap();
        assert_eq!(config.name(), "refractor");
        assert_eq!(config.motor.step_mode, StepMode::ThirtySecond);
        assert_eq!(config.motor.move_mode, MoveMode::Smooth);
        assert_eq!(config.motor.effective_speed(), 7_000);
    }

    #[test]
    fn test_parse_rejects_unknown_step_mode() {
        let toml = r#"
[motor]
step_mode = 4
"#;

        let result = parse_config(toml);
        assert!(matches!(result, Err(Error::Config(ConfigError::ParseError(_)))));
    }

    #[test]
    fn test_missing_file() {
        let result = load_config("/nonexistent/focuser.toml");
        assert!(matches!(result, Err(Error::Config(ConfigError::IoError(_)))));
    }
}
