//! Temperature compensation configuration.

use serde::Deserialize;

use crate::compensation::DEFAULT_COMPENSATION_INTERVAL_MS;

/// Settings from the `[temperature]` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TemperatureConfig {
    /// Start with compensation switched on.
    pub enabled: bool,

    /// Steps per degree Celsius. Positive moves outward as it cools.
    pub coefficient: i32,

    /// Minimum time between compensation passes.
    pub interval_ms: u32,
}

impl Default for TemperatureConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            coefficient: 0,
            interval_ms: DEFAULT_COMPENSATION_INTERVAL_MS,
        }
    }
}
