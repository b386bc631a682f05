//! Motor configuration from TOML.

use serde::Deserialize;

use crate::motion::{
    Direction, MoveMode, StepMode, DEFAULT_ACCELERATION, DEFAULT_RAMP_INTERVAL_MS,
};
use crate::motor::{DEFAULT_IDLE_TIMEOUT_US, DEFAULT_PULSE_WIDTH_US, DEFAULT_SPEED};

/// Motor and driver settings from the `[motor]` table.
///
/// Every field is optional; missing fields take the power-on defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MotorConfig {
    /// Microstep divisor: 8, 16, 32 or 64.
    pub step_mode: StepMode,

    /// `"per_step"` or `"smooth"`.
    pub move_mode: MoveMode,

    /// Cruise speed in steps/s. Values above the step mode cap are clamped.
    pub speed: u32,

    /// Speed increment per ramp update, steps/s.
    pub acceleration: u32,

    /// Ramp update period.
    pub ramp_interval_ms: u32,

    /// Logical rotation sense.
    pub direction: Direction,

    /// Idle time before the driver is disabled.
    pub idle_timeout_us: u64,

    /// Keep the coils powered while idle (ignores `idle_timeout_us`).
    pub hold_torque: bool,

    /// Step pulse width.
    pub pulse_width_us: u32,
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            step_mode: StepMode::default(),
            move_mode: MoveMode::default(),
            speed: DEFAULT_SPEED,
            acceleration: DEFAULT_ACCELERATION,
            ramp_interval_ms: DEFAULT_RAMP_INTERVAL_MS,
            direction: Direction::default(),
            idle_timeout_us: DEFAULT_IDLE_TIMEOUT_US,
            hold_torque: false,
            pulse_width_us: DEFAULT_PULSE_WIDTH_US,
        }
    }
}

impl MotorConfig {
    /// Idle power-down delay, or `None` when holding torque.
    pub fn idle_timeout(&self) -> Option<u64> {
        (!self.hold_torque).then_some(self.idle_timeout_us)
    }

    /// Cruise speed after clamping to the step mode cap.
    pub fn effective_speed(&self) -> u32 {
        self.step_mode.clamp_speed(self.speed)
    }
}
