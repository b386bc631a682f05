//! Manual jog from a hand controller's rotary encoder.
//!
//! The encoder is read as an absolute count. Each update turns the count
//! change into a step change with a logarithmic boost, so a slow turn moves
//! a step per detent while a fast spin covers distance quickly.

use embedded_hal::delay::DelayNs;

use crate::config::JogConfig;
use crate::error::Result;
use crate::motor::{Clock, MotionEngine, PulseOutput};

/// Turns encoder counts into engine retargets.
#[derive(Debug, Clone)]
pub struct JogAdapter {
    steps_per_count: u32,
    boost_divisor: u32,
    last_count: i32,
}

impl Default for JogAdapter {
    fn default() -> Self {
        Self::from_config(&JogConfig::default())
    }
}

impl JogAdapter {
    /// Create an adapter with its count baseline at zero.
    pub fn new(steps_per_count: u32, boost_divisor: u32) -> Self {
        Self {
            steps_per_count,
            boost_divisor: boost_divisor.max(1),
            last_count: 0,
        }
    }

    /// Create an adapter from the `[jog]` table.
    pub fn from_config(config: &JogConfig) -> Self {
        Self::new(config.steps_per_count, config.boost_divisor)
    }

    /// Encoder count seen by the last update.
    #[inline]
    pub fn last_count(&self) -> i32 {
        self.last_count
    }

    /// Re-baseline after the encoder was reset or rewritten.
    pub fn sync(&mut self, count: i32) {
        self.last_count = count;
    }

    /// Step change for a count change.
    ///
    /// `d * steps_per_count + trunc(d * ln(|d| + 1) / boost_divisor)`.
    pub fn steps_for(&self, counts: i32) -> i64 {
        let d = counts as f32;
        let boost = d * libm::logf(libm::fabsf(d) + 1.0) / self.boost_divisor as f32;
        i64::from(counts) * i64::from(self.steps_per_count) + boost as i64
    }

    /// Apply the encoder reading to the engine.
    ///
    /// Shifts the target by the boosted step change. A move is started only
    /// when the engine is idle; a running move simply picks up the new target.
    /// Returns the step change applied.
    pub fn update<OUT, CLK, DELAY>(
        &mut self,
        engine: &mut MotionEngine<OUT, CLK, DELAY>,
        count: i32,
    ) -> Result<i64>
    where
        OUT: PulseOutput,
        CLK: Clock,
        DELAY: DelayNs,
    {
        let counts = count.wrapping_sub(self.last_count);
        self.last_count = count;
        if counts == 0 {
            return Ok(0);
        }

        let steps = self.steps_for(counts);
        engine.set_target_position(engine.target_position() + steps);
        trace!("jog {} counts -> {} steps", counts, steps);

        if !engine.is_moving() {
            engine.go_to_target_position()?;
        }
        Ok(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motor::{ManualClock, MotionEngineBuilder, RecordingOutput};
    use embedded_hal_mock::eh1::delay::NoopDelay;

    #[test]
    fn test_boost_curve() {
        let jog = JogAdapter::default();
        assert_eq!(jog.steps_for(0), 0);
        assert_eq!(jog.steps_for(1), 1);
        assert_eq!(jog.steps_for(-1), -1);
        // 10 * ln(11) / 20 = 1.19
        assert_eq!(jog.steps_for(10), 11);
        assert_eq!(jog.steps_for(-10), -11);
        // 100 * ln(101) / 20 = 23.07
        assert_eq!(jog.steps_for(100), 123);
    }

    #[test]
    fn test_steps_per_count_scales_linear_part() {
        let jog = JogAdapter::new(4, 20);
        assert_eq!(jog.steps_for(10), 41);
    }

    #[test]
    fn test_update_retargets_and_starts() {
        let clock = ManualClock::new();
        let mut engine = MotionEngineBuilder::new()
            .output(RecordingOutput::default())
            .clock(&clock)
            .delay(NoopDelay::new())
            .build()
            .unwrap();
        let mut jog = JogAdapter::default();

        assert_eq!(jog.update(&mut engine, 0).unwrap(), 0);
        assert!(!engine.is_moving());

        assert_eq!(jog.update(&mut engine, 10).unwrap(), 11);
        assert!(engine.is_moving());
        assert_eq!(engine.target_position(), 11);

        // Still moving: target accumulates
        assert_eq!(jog.update(&mut engine, 9).unwrap(), -1);
        assert_eq!(engine.target_position(), 10);
        assert_eq!(jog.last_count(), 9);
    }
}
