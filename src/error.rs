//! Error types for stepper-focuser.
//!
//! Motion requests themselves never fail: speeds are clamped and moves to the
//! current position are silent no-ops. Errors only surface from the hardware
//! boundary (a pin write failing) and from configuration.

use core::fmt;

use crate::motor::Signal;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all stepper-focuser operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Motor driver output error
    Motor(MotorError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Microstep divisor without a driver encoding (valid: 8, 16, 32, 64)
    InvalidStepMode(u16),
    /// Acceleration increment must be > 0
    InvalidAcceleration(u32),
    /// Ramp update period must be > 0 ms
    InvalidRampInterval(u32),
    /// Step pulse width must be within 1..=1000 µs
    InvalidPulseWidth(u32),
    /// Idle power-down timeout must be > 0 µs
    InvalidIdleTimeout(u64),
    /// Jog adapter parameter out of range
    InvalidJog(&'static str),
    /// Temperature compensation period must be > 0 ms
    InvalidCompensationInterval(u32),
    /// A required builder field was not provided
    MissingField(&'static str),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Motor driver output errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorError {
    /// Writing a driver line failed
    PinError {
        /// The logical line that could not be driven
        signal: Signal,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Motor(e) => write!(f, "Motor error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidStepMode(v) => {
                write!(f, "Invalid step mode: 1/{}. Valid divisors: 8, 16, 32, 64", v)
            }
            ConfigError::InvalidAcceleration(v) => {
                write!(f, "Invalid acceleration: {}. Must be > 0", v)
            }
            ConfigError::InvalidRampInterval(v) => {
                write!(f, "Invalid ramp interval: {} ms. Must be > 0", v)
            }
            ConfigError::InvalidPulseWidth(v) => {
                write!(f, "Invalid pulse width: {} us. Must be 1-1000", v)
            }
            ConfigError::InvalidIdleTimeout(v) => {
                write!(f, "Invalid idle timeout: {} us. Must be > 0", v)
            }
            ConfigError::InvalidJog(field) => write!(f, "Invalid jog setting: {} must be non-zero", field),
            ConfigError::InvalidCompensationInterval(v) => {
                write!(f, "Invalid compensation interval: {} ms. Must be > 0", v)
            }
            ConfigError::MissingField(field) => write!(f, "{} is required", field),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::PinError { signal } => {
                write!(f, "GPIO write to {} line failed", signal.name())
            }
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Error::Motor(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for MotorError {}
