//! # stepper-focuser
//!
//! Non-blocking stepper motion engine for telescope focusers, with
//! embedded-hal 1.0 support.
//!
//! ## Features
//!
//! - **Tick-driven**: `manage()` emits at most one step per call and never blocks
//!   beyond the few microseconds of a step pulse
//! - **Trapezoidal ramps**: symmetric accelerate/cruise/decelerate profiles
//!   driven by distance, not time
//! - **Microstep caps**: each step mode bounds the commanded speed
//! - **Temperature compensation**: drift corrections issued as ordinary moves
//! - **Configuration-driven**: focuser settings from TOML files
//! - **no_std compatible**: core library works without standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stepper_focuser::{DriverPins, MotionEngineBuilder, MoveMode, StepMode};
//!
//! let pins = DriverPins::new(step, dir, ms1, ms2, ms3, enable, sleep, reset);
//! let mut engine = MotionEngineBuilder::new()
//!     .output(pins)
//!     .clock(clock)
//!     .delay(delay)
//!     .step_mode(StepMode::ThirtySecond)
//!     .move_mode(MoveMode::Smooth)
//!     .speed(7000)
//!     .build()?;
//!
//! engine.set_target_position(12_000);
//! engine.go_to_target_position()?;
//! loop {
//!     engine.manage()?;
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O, TOML parsing and `StdClock`
//! - `alloc`: Enables heap allocation for no_std with allocator
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Must come first so the logging macros are visible to every module
#[macro_use]
mod fmt;

// Core modules
pub mod compensation;
pub mod config;
pub mod error;
pub mod focuser;
pub mod motion;
pub mod motor;

// Re-exports for ergonomic API
pub use compensation::{CompensationSchedule, TemperatureCompensation};
pub use config::{validate_config, FocuserConfig, JogConfig, MotorConfig, TemperatureConfig};
pub use error::{ConfigError, Error, MotorError, Result};
pub use focuser::{Command, Focuser, JogAdapter, Response};
pub use motion::{Direction, MotionPhase, MoveMode, SpeedRamp, StepMode};
pub use motor::{
    Clock, DriverPins, ManualClock, MotionEngine, MotionEngineBuilder, MotionState, PulseOutput,
    Signal,
};

#[cfg(feature = "std")]
pub use motor::StdClock;

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{Celsius, UnitExt};
