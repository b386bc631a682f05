//! Configuration module for stepper-focuser.
//!
//! Provides types for loading and validating focuser configuration from
//! TOML files (with `std` feature) or pre-parsed data.

mod jog;
mod motor;
mod system;
mod temperature;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use jog::JogConfig;
pub use motor::MotorConfig;
pub use system::FocuserConfig;
pub use temperature::TemperatureConfig;
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

pub use units::{Celsius, UnitExt};
