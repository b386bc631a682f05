//! Trapezoidal speed ramp.
//!
//! The ramp never knows the total duration of a move. It accelerates until
//! either the cruise speed is reached or the midpoint is crossed, then
//! mirrors the distance it spent accelerating: deceleration starts once the
//! remaining distance equals the distance consumed reaching cruise speed.

/// Default speed increment per ramp update, in steps/s.
pub const DEFAULT_ACCELERATION: u32 = 100;

/// Default ramp update period in milliseconds.
pub const DEFAULT_RAMP_INTERVAL_MS: u32 = 50;

/// Current phase of motion execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionPhase {
    /// Accelerating from rest toward cruise velocity.
    Accelerating,
    /// Holding speed.
    Cruising,
    /// Decelerating toward the target.
    Decelerating,
    /// No move in progress.
    Complete,
}

/// Ramp bookkeeping for one axis.
#[derive(Debug, Clone)]
pub struct SpeedRamp {
    /// Speed added or removed per update, steps/s.
    acceleration: u32,

    /// Minimum time between updates.
    interval_ms: u32,

    /// Time of the last applied update.
    last_update_ms: u64,

    /// Position snapshotted when the move started.
    start_position: i64,

    /// Cruise speed was reached during this move.
    cruise_reached: bool,

    /// Distance from the start at which cruise speed was reached.
    cruise_distance: i64,
}

impl Default for SpeedRamp {
    fn default() -> Self {
        Self::new(DEFAULT_ACCELERATION, DEFAULT_RAMP_INTERVAL_MS)
    }
}

impl SpeedRamp {
    /// Create a ramp with the given increment and update period.
    ///
    /// The increment is floored at 1 step/s so a smooth move always advances.
    pub fn new(acceleration: u32, interval_ms: u32) -> Self {
        Self {
            acceleration: acceleration.max(1),
            interval_ms,
            last_update_ms: 0,
            start_position: 0,
            cruise_reached: false,
            cruise_distance: 0,
        }
    }

    /// Speed increment per update, steps/s.
    #[inline]
    pub fn acceleration(&self) -> u32 {
        self.acceleration
    }

    /// Set the speed increment per update, floored at 1 step/s.
    #[inline]
    pub fn set_acceleration(&mut self, acceleration: u32) {
        self.acceleration = acceleration.max(1);
    }

    /// Update period in milliseconds.
    #[inline]
    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Position at which the current move started.
    #[inline]
    pub fn start_position(&self) -> i64 {
        self.start_position
    }

    /// Whether cruise speed has been reached during the current move.
    #[inline]
    pub fn cruise_reached(&self) -> bool {
        self.cruise_reached
    }

    /// Distance consumed reaching cruise speed (0 until latched).
    #[inline]
    pub fn cruise_distance(&self) -> i64 {
        self.cruise_distance
    }

    /// Start bookkeeping for a move beginning at `start`.
    pub fn begin(&mut self, start: i64) {
        self.start_position = start;
        self.reset();
    }

    /// Clear the cruise latch.
    pub fn reset(&mut self) {
        self.cruise_reached = false;
        self.cruise_distance = 0;
    }

    /// Position halfway between the start and `target`.
    ///
    /// A single-step move is widened to two before halving so the midpoint
    /// never collapses onto the start.
    pub fn midway(&self, target: i64) -> i64 {
        let mut half = target - self.start_position;
        if half.abs() == 1 {
            half *= 2;
        }
        self.start_position + half / 2
    }

    /// Classify `current` within a move toward `target`.
    pub fn phase_at(&self, current: i64, target: i64) -> MotionPhase {
        let midway = self.midway(target);
        let reached = self.cruise_reached;

        let (before_midway, past_midway, in_mirror_zone) = if midway > self.start_position {
            (
                current < midway,
                current > midway,
                current >= target - self.cruise_distance,
            )
        } else {
            (
                current > midway,
                current < midway,
                current <= target + self.cruise_distance,
            )
        };

        if !reached && before_midway {
            MotionPhase::Accelerating
        } else if (!reached && past_midway) || in_mirror_zone {
            MotionPhase::Decelerating
        } else {
            MotionPhase::Cruising
        }
    }

    /// Apply one ramp update if the update period has elapsed.
    ///
    /// Returns the new speed, or `None` when no update is due. The result
    /// never exceeds `target_speed`. While decelerating the speed is floored
    /// at one increment so the move can always finish.
    pub fn update(
        &mut self,
        now_ms: u64,
        current: i64,
        target: i64,
        speed: u32,
        target_speed: u32,
    ) -> Option<u32> {
        if now_ms.wrapping_sub(self.last_update_ms) < u64::from(self.interval_ms) {
            return None;
        }
        self.last_update_ms = now_ms;

        let next = match self.phase_at(current, target) {
            MotionPhase::Accelerating => speed.saturating_add(self.acceleration),
            MotionPhase::Decelerating if current != target => {
                speed.saturating_sub(self.acceleration).max(self.acceleration)
            }
            MotionPhase::Decelerating => self.acceleration,
            MotionPhase::Cruising | MotionPhase::Complete => speed,
        };

        Some(next.min(target_speed))
    }

    /// Record a step taken at `speed`, landing on `current`.
    ///
    /// Returns `true` when this step latched cruise speed.
    pub fn record_step(&mut self, current: i64, speed: u32, target_speed: u32) -> bool {
        if speed < target_speed || self.cruise_reached {
            return false;
        }
        self.cruise_reached = true;
        self.cruise_distance = (self.start_position - current).abs();
        true
    }
}
