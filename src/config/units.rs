//! Unit types for physical quantities.

use core::ops::Sub;

use serde::Deserialize;

/// Temperature in degrees Celsius.
///
/// Used for the optical assembly temperature fed to compensation.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Celsius(pub f32);

impl Celsius {
    /// Create a new Celsius value.
    #[inline]
    pub const fn new(value: f32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }

    /// Value in half-degree units, truncated toward zero.
    ///
    /// This is how focuser host protocols usually report temperature.
    #[inline]
    pub fn half_degrees(self) -> i64 {
        (self.0 * 2.0) as i64
    }
}

impl Sub for Celsius {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

/// Extension trait for creating unit types from primitives.
pub trait UnitExt {
    /// Convert to Celsius.
    fn celsius(self) -> Celsius;
}

impl UnitExt for f32 {
    #[inline]
    fn celsius(self) -> Celsius {
        Celsius(self)
    }
}
