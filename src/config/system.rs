//! Focuser configuration - root configuration structure.

use heapless::String;
use serde::Deserialize;

use super::jog::JogConfig;
use super::motor::MotorConfig;
use super::temperature::TemperatureConfig;

/// Root configuration structure from TOML.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FocuserConfig {
    /// Human-readable name (max 32 chars).
    pub name: String<32>,

    /// Motor and driver settings.
    pub motor: MotorConfig,

    /// Temperature compensation settings.
    pub temperature: TemperatureConfig,

    /// Manual jog settings.
    pub jog: JogConfig,
}

impl Default for FocuserConfig {
    fn default() -> Self {
        let mut name = String::new();
        let _ = name.push_str("focuser");
        Self {
            name,
            motor: MotorConfig::default(),
            temperature: TemperatureConfig::default(),
            jog: JogConfig::default(),
        }
    }
}

impl FocuserConfig {
    /// Focuser name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}
