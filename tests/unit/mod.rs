//! Unit test harness for stepper-focuser configuration.

mod config_parsing;
mod config_validation;
