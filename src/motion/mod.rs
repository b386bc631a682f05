//! Motion module for stepper-focuser.
//!
//! Provides the motion value types and the trapezoidal speed ramp.

mod mode;
mod ramp;

pub use mode::{Direction, MoveMode, StepMode};
pub use ramp::{MotionPhase, SpeedRamp, DEFAULT_ACCELERATION, DEFAULT_RAMP_INTERVAL_MS};
