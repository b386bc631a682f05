//! Motion value types: logical direction, microstep resolution, move mode.

use embedded_hal::digital::PinState;
use serde::Deserialize;

use crate::error::ConfigError;

/// Logical rotation sense of the focuser.
///
/// Applied on top of the sign of the remaining distance: it selects which
/// DIR level means "increasing position".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Increasing position drives DIR low.
    #[default]
    Clockwise,
    /// Increasing position drives DIR high.
    CounterClockwise,
}

impl Direction {
    /// Get the DIR level for a step toward increasing (`forward`) or
    /// decreasing position.
    #[inline]
    pub fn level(self, forward: bool) -> PinState {
        let high = match self {
            Direction::Clockwise => !forward,
            Direction::CounterClockwise => forward,
        };
        PinState::from(high)
    }
}

/// Microstep resolution of the driver.
///
/// Discriminants are the 3-bit codes written to the mode-select lines
/// (bit2 → MS1, bit1 → MS2, bit0 → MS3). Each resolution carries its own
/// step-rate cap; finer resolutions allow a higher rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum StepMode {
    /// 1/8 step, capped at 3000 steps/s.
    #[default]
    Eighth = 0,
    /// 1/32 step, capped at 10000 steps/s.
    ThirtySecond = 1,
    /// 1/16 step, capped at 5000 steps/s.
    Sixteenth = 2,
    /// 1/64 step, capped at 20000 steps/s.
    SixtyFourth = 3,
}

impl StepMode {
    /// All supported resolutions, coarsest first.
    pub const ALL: [StepMode; 4] = [
        StepMode::Eighth,
        StepMode::Sixteenth,
        StepMode::ThirtySecond,
        StepMode::SixtyFourth,
    ];

    /// Mode-select encoding.
    #[inline]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decode a mode-select encoding.
    pub fn from_bits(bits: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.bits() == bits)
    }

    /// Maximum step rate in steps/s.
    #[inline]
    pub const fn max_speed(self) -> u32 {
        match self {
            StepMode::Eighth => 3_000,
            StepMode::Sixteenth => 5_000,
            StepMode::ThirtySecond => 10_000,
            StepMode::SixtyFourth => 20_000,
        }
    }

    /// Microstep divisor (8 for 1/8 step, ...).
    #[inline]
    pub const fn divisor(self) -> u16 {
        match self {
            StepMode::Eighth => 8,
            StepMode::Sixteenth => 16,
            StepMode::ThirtySecond => 32,
            StepMode::SixtyFourth => 64,
        }
    }

    /// Look up a resolution by microstep divisor.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidStepMode` if the driver has no encoding
    /// for the divisor.
    pub fn from_divisor(divisor: u16) -> Result<Self, ConfigError> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.divisor() == divisor)
            .ok_or(ConfigError::InvalidStepMode(divisor))
    }

    /// Clamp a requested speed to this resolution's cap.
    #[inline]
    pub fn clamp_speed(self, steps_per_sec: u32) -> u32 {
        steps_per_sec.min(self.max_speed())
    }
}

impl TryFrom<u16> for StepMode {
    type Error = ConfigError;

    fn try_from(divisor: u16) -> Result<Self, Self::Error> {
        Self::from_divisor(divisor)
    }
}

impl<'de> Deserialize<'de> for StepMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use core::fmt::Write;
        let divisor = u16::deserialize(deserializer)?;
        StepMode::from_divisor(divisor).map_err(|e| {
            let mut buf = heapless::String::<128>::new();
            let _ = write!(buf, "{}", e);
            serde::de::Error::custom(buf.as_str())
        })
    }
}

/// How speed evolves during a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MoveMode {
    /// Start directly at the target speed.
    #[default]
    PerStep,
    /// Trapezoidal ramp up and down.
    Smooth,
}
