//! Temperature compensation for focus drift.
//!
//! As the optical tube cools the focal point moves. Compensation turns the
//! temperature change since the last correction into a step offset and hands
//! it to the motion engine as an ordinary move.

use embedded_hal::delay::DelayNs;

use crate::config::units::Celsius;
use crate::error::Result;
use crate::motor::{Clock, MotionEngine, PulseOutput};

/// Default time between scheduled compensation passes.
pub const DEFAULT_COMPENSATION_INTERVAL_MS: u32 = 30_000;

/// Step correction for a temperature change.
///
/// `(last - current) * coefficient`, truncated toward zero. A falling
/// temperature with a positive coefficient yields a positive correction.
pub fn correction(last: Celsius, current: Celsius, coefficient: i32) -> i64 {
    (f64::from((last - current).value()) * f64::from(coefficient)) as i64
}

/// Compensation state carried by the motion engine.
#[derive(Debug, Clone, Default)]
pub struct TemperatureCompensation {
    enabled: bool,
    coefficient: i32,
    last_compensated: Celsius,
    current: Celsius,
    initialized: bool,
}

impl TemperatureCompensation {
    /// Disabled, uninitialized, zero coefficient.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether compensation is switched on.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether a baseline temperature has been latched.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Steps per degree of temperature change.
    #[inline]
    pub fn coefficient(&self) -> i32 {
        self.coefficient
    }

    /// Set steps per degree of temperature change.
    #[inline]
    pub fn set_coefficient(&mut self, coefficient: i32) {
        self.coefficient = coefficient;
    }

    /// Most recent reading.
    #[inline]
    pub fn current_temperature(&self) -> Celsius {
        self.current
    }

    /// Reading at the last applied correction (or the baseline).
    #[inline]
    pub fn last_compensated_temperature(&self) -> Celsius {
        self.last_compensated
    }

    /// Switch on and require a fresh baseline reading.
    pub fn enable(&mut self) {
        self.initialized = false;
        self.enabled = true;
    }

    /// Switch off. The baseline is kept but `enable` discards it.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Store a reading. The first reading after `enable` becomes the baseline.
    pub fn set_current_temperature(&mut self, temperature: Celsius) {
        self.current = temperature;
        if !self.initialized {
            self.last_compensated = temperature;
            self.initialized = true;
        }
    }

    /// Correction owed for the drift since the last one, if non-zero.
    pub fn pending_correction(&self) -> Option<i64> {
        if !self.initialized {
            return None;
        }
        let steps = correction(self.last_compensated, self.current, self.coefficient);
        (steps != 0).then_some(steps)
    }

    /// Mark the current reading as compensated.
    pub fn commit(&mut self) {
        self.last_compensated = self.current;
    }
}

/// Periodic compensation while the focuser is idle.
#[derive(Debug, Clone)]
pub struct CompensationSchedule {
    interval_ms: u32,
    last_run_ms: u64,
}

impl Default for CompensationSchedule {
    fn default() -> Self {
        Self::new(DEFAULT_COMPENSATION_INTERVAL_MS)
    }
}

impl CompensationSchedule {
    /// Run at most once per `interval_ms`.
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            last_run_ms: 0,
        }
    }

    /// Period between passes.
    #[inline]
    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Run a compensation pass if one is due.
    ///
    /// `temperature` (if any) is always stored, so the engine reports the
    /// latest reading. No pass runs while the engine is moving or
    /// compensation is disabled. Returns the correction that started a move.
    pub fn poll<OUT, CLK, DELAY>(
        &mut self,
        engine: &mut MotionEngine<OUT, CLK, DELAY>,
        temperature: Option<Celsius>,
    ) -> Result<Option<i64>>
    where
        OUT: PulseOutput,
        CLK: Clock,
        DELAY: DelayNs,
    {
        if let Some(reading) = temperature {
            engine.set_current_temperature(reading);
        }
        if engine.is_moving() || !engine.is_temperature_compensation_enabled() {
            return Ok(None);
        }

        let now = engine.clock().now_millis();
        if now.wrapping_sub(self.last_run_ms) <= u64::from(self.interval_ms) {
            return Ok(None);
        }
        self.last_run_ms = now;
        engine.compensate_temperature()
    }
}
