//! Driver output port.
//!
//! The engine never touches GPIO directly. It asserts and deasserts logical
//! lines through [`PulseOutput`], which [`DriverPins`] implements over
//! embedded-hal 1.0 `OutputPin`s.

use embedded_hal::digital::{OutputPin, PinState};

use crate::error::{MotorError, Result};

/// Logical lines of a step/direction driver (A4988/TMC2209 style).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Signal {
    /// Rising edge moves one (micro)step.
    Step,
    /// Rotation sense of the next step.
    Direction,
    /// Mode select, bit 2 of the step mode encoding.
    ModeSelect1,
    /// Mode select, bit 1 of the step mode encoding.
    ModeSelect2,
    /// Mode select, bit 0 of the step mode encoding.
    ModeSelect3,
    /// Active low: LOW powers the coils.
    Enable,
    /// Active low sleep.
    Sleep,
    /// Active low reset.
    Reset,
}

impl Signal {
    /// Every line, in wiring order.
    pub const ALL: [Signal; 8] = [
        Signal::Step,
        Signal::Direction,
        Signal::ModeSelect1,
        Signal::ModeSelect2,
        Signal::ModeSelect3,
        Signal::Enable,
        Signal::Sleep,
        Signal::Reset,
    ];

    /// Line name for display/debugging.
    pub fn name(self) -> &'static str {
        match self {
            Signal::Step => "step",
            Signal::Direction => "direction",
            Signal::ModeSelect1 => "mode select 1",
            Signal::ModeSelect2 => "mode select 2",
            Signal::ModeSelect3 => "mode select 3",
            Signal::Enable => "enable",
            Signal::Sleep => "sleep",
            Signal::Reset => "reset",
        }
    }
}

/// Narrow output port the engine drives.
pub trait PulseOutput {
    /// Drive one logical line to `state`.
    ///
    /// # Errors
    ///
    /// Returns `MotorError::PinError` if the line could not be written.
    fn set_signal(&mut self, signal: Signal, state: PinState) -> Result<()>;
}

/// The eight GPIO lines of a step/direction driver.
///
/// Generic over one `OutputPin` type per line so each can come from a
/// different HAL port.
pub struct DriverPins<STEP, DIR, MS1, MS2, MS3, EN, SLP, RST> {
    step: STEP,
    dir: DIR,
    ms1: MS1,
    ms2: MS2,
    ms3: MS3,
    enable: EN,
    sleep: SLP,
    reset: RST,
}

impl<STEP, DIR, MS1, MS2, MS3, EN, SLP, RST> DriverPins<STEP, DIR, MS1, MS2, MS3, EN, SLP, RST>
where
    STEP: OutputPin,
    DIR: OutputPin,
    MS1: OutputPin,
    MS2: OutputPin,
    MS3: OutputPin,
    EN: OutputPin,
    SLP: OutputPin,
    RST: OutputPin,
{
    /// Bundle the driver lines.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        step: STEP,
        dir: DIR,
        ms1: MS1,
        ms2: MS2,
        ms3: MS3,
        enable: EN,
        sleep: SLP,
        reset: RST,
    ) -> Self {
        Self {
            step,
            dir,
            ms1,
            ms2,
            ms3,
            enable,
            sleep,
            reset,
        }
    }

    /// Give the pins back.
    #[allow(clippy::type_complexity)]
    pub fn release(self) -> (STEP, DIR, MS1, MS2, MS3, EN, SLP, RST) {
        (
            self.step,
            self.dir,
            self.ms1,
            self.ms2,
            self.ms3,
            self.enable,
            self.sleep,
            self.reset,
        )
    }
}

fn drive<P: OutputPin>(pin: &mut P, signal: Signal, state: PinState) -> Result<()> {
    pin.set_state(state)
        .map_err(|_| MotorError::PinError { signal }.into())
}

impl<STEP, DIR, MS1, MS2, MS3, EN, SLP, RST> PulseOutput
    for DriverPins<STEP, DIR, MS1, MS2, MS3, EN, SLP, RST>
where
    STEP: OutputPin,
    DIR: OutputPin,
    MS1: OutputPin,
    MS2: OutputPin,
    MS3: OutputPin,
    EN: OutputPin,
    SLP: OutputPin,
    RST: OutputPin,
{
    fn set_signal(&mut self, signal: Signal, state: PinState) -> Result<()> {
        match signal {
            Signal::Step => drive(&mut self.step, signal, state),
            Signal::Direction => drive(&mut self.dir, signal, state),
            Signal::ModeSelect1 => drive(&mut self.ms1, signal, state),
            Signal::ModeSelect2 => drive(&mut self.ms2, signal, state),
            Signal::ModeSelect3 => drive(&mut self.ms3, signal, state),
            Signal::Enable => drive(&mut self.enable, signal, state),
            Signal::Sleep => drive(&mut self.sleep, signal, state),
            Signal::Reset => drive(&mut self.reset, signal, state),
        }
    }
}

/// In-memory output used by the crate's unit tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingOutput {
    pub levels: [Option<PinState>; 8],
    pub step_pulses: u32,
}

#[cfg(test)]
impl RecordingOutput {
    pub fn level(&self, signal: Signal) -> Option<PinState> {
        self.levels[signal as usize]
    }
}

#[cfg(test)]
impl PulseOutput for RecordingOutput {
    fn set_signal(&mut self, signal: Signal, state: PinState) -> Result<()> {
        if signal == Signal::Step
            && state == PinState::High
            && self.level(Signal::Step) != Some(PinState::High)
        {
            self.step_pulses += 1;
        }
        self.levels[signal as usize] = Some(state);
        Ok(())
    }
}
