//! Moonlite-style focuser commands.
//!
//! Commands arrive already decoded; framing and hex encoding belong to the
//! transport. [`dispatch`] applies one command to the engine and returns the
//! value to report, if the command has one.

use embedded_hal::delay::DelayNs;

use crate::error::Result;
use crate::motion::StepMode;
use crate::motor::{Clock, MotionEngine, PulseOutput};

/// Firmware version reported to the host.
pub const FIRMWARE_VERSION: i64 = 0x01;

/// Speed code reported when the speed has no code of its own.
pub const DEFAULT_SPEED_CODE: u8 = 0x20;

/// Host speed codes and the step rates they select, fastest first.
pub const SPEED_CODES: [(u8, u32); 5] = [
    (0x02, 7_000),
    (0x04, 5_000),
    (0x08, 3_000),
    (0x10, 1_000),
    (0x20, 500),
];

/// Step rate selected by a host speed code.
pub fn speed_for_code(code: u8) -> Option<u32> {
    SPEED_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, speed)| *speed)
}

/// Host speed code for a step rate.
pub fn code_for_speed(speed: u32) -> u8 {
    SPEED_CODES
        .iter()
        .find(|(_, s)| *s == speed)
        .map_or(DEFAULT_SPEED_CODE, |(code, _)| *code)
}

/// A decoded host command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// `C`: start a temperature conversion. Readings are pushed, so this is a no-op.
    StartTemperatureConversion,
    /// `FG`: go to the target position.
    GoToTarget,
    /// `FQ`: stop.
    Stop,
    /// `GB`: backlight value.
    GetBacklight,
    /// `GC`: temperature coefficient.
    GetCoefficient,
    /// `GD`: speed code.
    GetSpeed,
    /// `GH`: half step flag.
    GetHalfStep,
    /// `GI`: moving flag.
    IsMoving,
    /// `GN`: target position.
    GetTarget,
    /// `GP`: current position.
    GetPosition,
    /// `GT`: temperature in half degrees.
    GetTemperature,
    /// `GV`: firmware version.
    GetVersion,
    /// `SC`: set the temperature coefficient.
    SetCoefficient(i32),
    /// `SD`: set the speed by code.
    SetSpeed(u8),
    /// `SF`: full step (1/16 on this driver).
    SetFullStep,
    /// `SH`: half step (1/32 on this driver).
    SetHalfStep,
    /// `SN`: set the target position.
    SetTarget(i64),
    /// `SP`: redefine the current position.
    SetPosition(i64),
    /// `+`: enable temperature compensation.
    EnableCompensation,
    /// `-`: disable temperature compensation.
    DisableCompensation,
}

/// Value reported back to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Response {
    /// Hex digits the transport should emit (2 or 4).
    pub width: u8,
    /// Value to report.
    pub value: i64,
}

impl Response {
    /// Two-digit response.
    pub const fn short(value: i64) -> Self {
        Self { width: 2, value }
    }

    /// Four-digit response.
    pub const fn long(value: i64) -> Self {
        Self { width: 4, value }
    }
}

/// Apply one command to the engine.
///
/// # Errors
///
/// Only pin failures surface; out-of-range values are clamped or ignored.
pub fn dispatch<OUT, CLK, DELAY>(
    engine: &mut MotionEngine<OUT, CLK, DELAY>,
    command: Command,
) -> Result<Option<Response>>
where
    OUT: PulseOutput,
    CLK: Clock,
    DELAY: DelayNs,
{
    trace!("command {}", command);

    let response = match command {
        Command::StartTemperatureConversion => None,
        Command::GoToTarget => {
            engine.go_to_target_position()?;
            None
        }
        Command::Stop => {
            engine.stop_movement();
            None
        }
        Command::GetBacklight => Some(Response::short(0x00)),
        Command::GetCoefficient => Some(Response::short(i64::from(
            engine.temperature_compensation_coefficient(),
        ))),
        Command::GetSpeed => Some(Response::short(i64::from(code_for_speed(
            engine.target_speed(),
        )))),
        Command::GetHalfStep => {
            let half = engine.step_mode() == StepMode::ThirtySecond;
            Some(Response::short(if half { 0xFF } else { 0x00 }))
        }
        Command::IsMoving => Some(Response::short(i64::from(engine.is_moving()))),
        Command::GetTarget => Some(Response::long(engine.target_position())),
        Command::GetPosition => Some(Response::long(engine.current_position())),
        Command::GetTemperature => Some(Response::long(
            engine.current_temperature().half_degrees(),
        )),
        Command::GetVersion => Some(Response::short(FIRMWARE_VERSION)),
        Command::SetCoefficient(coefficient) => {
            engine.set_temperature_compensation_coefficient(coefficient);
            None
        }
        Command::SetSpeed(code) => {
            match speed_for_code(code) {
                Some(speed) => engine.set_speed(speed),
                None => warn!("unknown speed code {}", code),
            }
            None
        }
        Command::SetFullStep => {
            change_step_mode(engine, StepMode::Sixteenth)?;
            None
        }
        Command::SetHalfStep => {
            change_step_mode(engine, StepMode::ThirtySecond)?;
            None
        }
        Command::SetTarget(position) => {
            engine.set_target_position(position);
            None
        }
        Command::SetPosition(position) => {
            engine.set_current_position(position);
            None
        }
        Command::EnableCompensation => {
            engine.enable_temperature_compensation();
            None
        }
        Command::DisableCompensation => {
            engine.disable_temperature_compensation();
            None
        }
    };

    Ok(response)
}

/// Switch resolution and bring the cruise speed under the new cap.
fn change_step_mode<OUT, CLK, DELAY>(
    engine: &mut MotionEngine<OUT, CLK, DELAY>,
    mode: StepMode,
) -> Result<()>
where
    OUT: PulseOutput,
    CLK: Clock,
    DELAY: DelayNs,
{
    engine.set_step_mode(mode)?;
    engine.set_speed(engine.target_speed());
    Ok(())
}
