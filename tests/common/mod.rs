//! Shared helpers for the integration test binaries.

#![allow(dead_code)]

use embedded_hal::digital::PinState;
use embedded_hal_mock::eh1::delay::NoopDelay;
use stepper_focuser::{
    ManualClock, MotionEngine, MotionEngineBuilder, MotionPhase, PulseOutput, Result, Signal,
};

/// Output port that remembers the last level of every line.
#[derive(Debug, Default)]
pub struct RecordingOutput {
    pub levels: [Option<PinState>; 8],
    pub step_pulses: u32,
    pub writes: Vec<(Signal, PinState)>,
}

impl RecordingOutput {
    pub fn level(&self, signal: Signal) -> Option<PinState> {
        self.levels[signal as usize]
    }
}

impl PulseOutput for RecordingOutput {
    fn set_signal(&mut self, signal: Signal, state: PinState) -> Result<()> {
        if signal == Signal::Step
            && state == PinState::High
            && self.level(Signal::Step) != Some(PinState::High)
        {
            self.step_pulses += 1;
        }
        self.levels[signal as usize] = Some(state);
        self.writes.push((signal, state));
        Ok(())
    }
}

pub type TestEngine<'a> = MotionEngine<RecordingOutput, &'a ManualClock, NoopDelay>;

pub fn engine(clock: &ManualClock) -> TestEngine<'_> {
    MotionEngineBuilder::new()
        .output(RecordingOutput::default())
        .clock(clock)
        .delay(NoopDelay::new())
        .build()
        .unwrap()
}

/// One emitted step.
#[derive(Debug, Clone, Copy)]
pub struct StepRecord {
    /// Position after the step.
    pub position: i64,
    /// Speed the step was paced at.
    pub speed: u32,
    /// Phase at the position the step left from.
    pub phase: MotionPhase,
}

/// Tick the engine every `tick_us` until the move ends.
pub fn run_move(engine: &mut TestEngine<'_>, clock: &ManualClock, tick_us: u64) -> Vec<StepRecord> {
    let mut steps = Vec::new();
    let mut ticks = 0u64;
    while engine.is_moving() {
        let phase = engine.phase();
        clock.advance_micros(tick_us);
        if engine.manage().unwrap() {
            steps.push(StepRecord {
                position: engine.current_position(),
                speed: engine.speed(),
                phase,
            });
        }
        ticks += 1;
        assert!(ticks < 50_000_000, "move did not finish");
    }
    steps
}

pub fn count_phase(steps: &[StepRecord], phase: MotionPhase) -> usize {
    steps.iter().filter(|s| s.phase == phase).count()
}

/// Speeds rise to a single peak, then fall.
pub fn is_unimodal(speeds: &[u32]) -> bool {
    let Some(peak) = speeds.iter().enumerate().max_by_key(|(_, s)| **s).map(|(i, _)| i) else {
        return true;
    };
    speeds[..=peak].windows(2).all(|w| w[0] <= w[1])
        && speeds[peak..].windows(2).all(|w| w[0] >= w[1])
}
