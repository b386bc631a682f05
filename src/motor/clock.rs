//! Monotonic time source for step pacing.

use core::cell::Cell;

/// Something which records the elapsed time since a fixed reference point
/// (usually device startup).
///
/// Readings must never go backwards. The engine only ever compares two
/// readings by subtraction, so a counter that wraps is tolerated.
pub trait Clock {
    /// Microseconds since the reference point.
    fn now_micros(&self) -> u64;

    /// Milliseconds since the reference point.
    fn now_millis(&self) -> u64 {
        self.now_micros() / 1_000
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_micros(&self) -> u64 {
        (**self).now_micros()
    }

    fn now_millis(&self) -> u64 {
        (**self).now_millis()
    }
}

/// A clock that only moves when told to.
///
/// Lets host-side simulations and tests drive the engine deterministically.
/// Share it with the engine by reference: `MotionEngine` accepts `&ManualClock`.
#[derive(Debug, Default)]
pub struct ManualClock {
    micros: Cell<u64>,
}

impl ManualClock {
    /// Create a clock reading zero.
    pub const fn new() -> Self {
        Self { micros: Cell::new(0) }
    }

    /// Create a clock at a specific reading.
    pub const fn at_micros(micros: u64) -> Self {
        Self { micros: Cell::new(micros) }
    }

    /// Move time forward.
    pub fn advance_micros(&self, micros: u64) {
        self.micros.set(self.micros.get() + micros);
    }

    /// Move time forward.
    pub fn advance_millis(&self, millis: u64) {
        self.advance_micros(millis * 1_000);
    }

    /// Jump to an absolute reading.
    pub fn set_micros(&self, micros: u64) {
        self.micros.set(micros);
    }
}

impl Clock for ManualClock {
    fn now_micros(&self) -> u64 {
        self.micros.get()
    }
}

/// A monotonically non-decreasing clock backed by the operating system.
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct StdClock {
    created_at: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    /// Start a clock at zero.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self {
            created_at: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Clock for StdClock {
    fn now_micros(&self) -> u64 {
        self.created_at.elapsed().as_micros() as u64
    }
}
