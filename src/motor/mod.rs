//! Motor module for stepper-focuser.
//!
//! Provides the tick-driven motion engine and its injected collaborators.

mod builder;
mod clock;
mod driver;
mod pins;
mod state;

pub use builder::MotionEngineBuilder;
#[cfg(feature = "std")]
pub use clock::StdClock;
pub use clock::{Clock, ManualClock};
pub use driver::{
    step_interval_us, MotionEngine, DEFAULT_IDLE_TIMEOUT_US, DEFAULT_PULSE_WIDTH_US,
    DEFAULT_SPEED,
};
pub use pins::{DriverPins, PulseOutput, Signal};
#[cfg(test)]
pub(crate) use pins::RecordingOutput;
pub use state::MotionState;
