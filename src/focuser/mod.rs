//! Focuser adapters around the motion engine.
//!
//! Host commands, hand controller jog, and the facade tying them together.

pub mod command;
mod jog;
mod system;

pub use command::{dispatch, Command, Response};
pub use jog::JogAdapter;
pub use system::Focuser;
