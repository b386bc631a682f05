//! Manual jog (rotary encoder) configuration.

use serde::Deserialize;

/// Settings from the `[jog]` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct JogConfig {
    /// Steps per encoder count before acceleration.
    pub steps_per_count: u32,

    /// Larger values soften the acceleration of fast turns.
    pub boost_divisor: u32,
}

impl Default for JogConfig {
    fn default() -> Self {
        Self {
            steps_per_count: 1,
            boost_divisor: 20,
        }
    }
}
