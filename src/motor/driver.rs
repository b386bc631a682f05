//! Non-blocking stepper motion engine.
//!
//! Generic over the driver output port, a monotonic clock and an
//! embedded-hal 1.0 delay used only for the step pulse width.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::PinState;

use crate::compensation::TemperatureCompensation;
use crate::config::units::Celsius;
use crate::error::Result;
use crate::motion::{Direction, MotionPhase, MoveMode, SpeedRamp, StepMode};

use super::clock::Clock;
use super::pins::{PulseOutput, Signal};
use super::state::MotionState;

/// Cruise speed used until `set_speed` is called, steps/s.
pub const DEFAULT_SPEED: u32 = 1_000;

/// Time without a step after which an idle driver is disabled.
pub const DEFAULT_IDLE_TIMEOUT_US: u64 = 1_000_000;

/// Settle time before, and high time of, each step pulse.
pub const DEFAULT_PULSE_WIDTH_US: u32 = 5;

/// Minimum time between two steps at `speed` steps/s.
///
/// The `+ 1` keeps a zero speed from dividing by zero; a zero speed never
/// steps anyway.
#[inline]
pub const fn step_interval_us(speed: u32) -> u64 {
    1_000_000 / (speed as u64 + 1)
}

/// Tick-driven stepper motion engine.
///
/// Setters only record intent. [`manage`](Self::manage) is the only place
/// that changes the realized position and speed, and it emits at most one
/// step per call. Call it far more often than the step rate; surplus calls
/// do nothing.
///
/// Generic over:
/// - `OUT`: driver output port (see [`DriverPins`](super::DriverPins))
/// - `CLK`: monotonic time source
/// - `DELAY`: delay provider for the step pulse width
pub struct MotionEngine<OUT, CLK, DELAY>
where
    OUT: PulseOutput,
    CLK: Clock,
    DELAY: DelayNs,
{
    /// Driver lines.
    output: OUT,

    /// Pacing time source.
    clock: CLK,

    /// Pulse width timing.
    delay: DELAY,

    /// Idle or moving.
    state: MotionState,

    /// Position of record, in steps.
    current_position: i64,

    /// Requested absolute position, in steps.
    target_position: i64,

    /// Logical rotation sense.
    direction: Direction,

    /// Microstep resolution currently on the mode-select lines.
    step_mode: StepMode,

    /// Ramp or jump to speed, for the next move.
    move_mode: MoveMode,

    /// Mode the running move was started with.
    active_mode: MoveMode,

    /// Realized speed, steps/s.
    speed: u32,

    /// Commanded cruise speed after clamping, steps/s.
    target_speed: u32,

    /// Trapezoid bookkeeping.
    ramp: SpeedRamp,

    /// Thermal drift correction state.
    compensation: TemperatureCompensation,

    /// Clock reading after the last emitted step.
    last_step_us: u64,

    /// Idle power-down delay; `None` keeps the coils powered.
    idle_timeout_us: Option<u64>,

    /// Step pulse width.
    pulse_width_us: u32,

    /// Enable line currently asserted (LOW).
    driver_enabled: bool,
}

impl<OUT, CLK, DELAY> MotionEngine<OUT, CLK, DELAY>
where
    OUT: PulseOutput,
    CLK: Clock,
    DELAY: DelayNs,
{
    /// Create an engine. Outputs are not touched until [`power_on`](Self::power_on).
    pub(crate) fn new(
        output: OUT,
        clock: CLK,
        delay: DELAY,
        ramp: SpeedRamp,
        idle_timeout_us: Option<u64>,
        pulse_width_us: u32,
    ) -> Self {
        Self {
            output,
            clock,
            delay,
            state: MotionState::Idle,
            current_position: 0,
            target_position: 0,
            direction: Direction::default(),
            step_mode: StepMode::default(),
            move_mode: MoveMode::default(),
            active_mode: MoveMode::default(),
            speed: 0,
            target_speed: DEFAULT_SPEED,
            ramp,
            compensation: TemperatureCompensation::new(),
            last_step_us: 0,
            idle_timeout_us,
            pulse_width_us,
            driver_enabled: false,
        }
    }

    /// Drive every line to its startup level and apply `step_mode`.
    ///
    /// The driver is left disabled until the first move.
    pub(crate) fn power_on(&mut self, step_mode: StepMode) -> Result<()> {
        self.output.set_signal(Signal::Direction, PinState::Low)?;
        self.output.set_signal(Signal::Step, PinState::Low)?;
        self.output.set_signal(Signal::Sleep, PinState::High)?;
        self.output.set_signal(Signal::Reset, PinState::High)?;
        self.set_driver_enabled(false)?;
        self.set_step_mode(step_mode)
    }

    // ---------------------------------------------------------------------
    // Setters
    // ---------------------------------------------------------------------

    /// Set the absolute position to move to on the next `go_to_target_position`.
    ///
    /// Changing it during a move retargets the running move.
    #[inline]
    pub fn set_target_position(&mut self, position: i64) {
        self.target_position = position;
    }

    /// Redefine the position of record without moving.
    #[inline]
    pub fn set_current_position(&mut self, position: i64) {
        self.current_position = position;
    }

    /// Set the logical direction. Applies from the next step.
    #[inline]
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Set the microstep resolution and drive the mode-select lines.
    ///
    /// The cruise speed is not re-clamped; call [`set_speed`](Self::set_speed)
    /// again after lowering the resolution.
    pub fn set_step_mode(&mut self, mode: StepMode) -> Result<()> {
        let bits = mode.bits();
        self.output
            .set_signal(Signal::ModeSelect1, PinState::from(bits & 0b100 != 0))?;
        self.output
            .set_signal(Signal::ModeSelect2, PinState::from(bits & 0b010 != 0))?;
        self.output
            .set_signal(Signal::ModeSelect3, PinState::from(bits & 0b001 != 0))?;
        self.step_mode = mode;
        debug!("step mode 1/{}", mode.divisor());
        Ok(())
    }

    /// Choose per-step or smooth moves. Applies from the next move.
    #[inline]
    pub fn set_move_mode(&mut self, mode: MoveMode) {
        self.move_mode = mode;
    }

    /// Set the cruise speed in steps/s, clamped to the step mode's cap.
    pub fn set_speed(&mut self, steps_per_sec: u32) {
        self.target_speed = self.step_mode.clamp_speed(steps_per_sec);
        if self.target_speed != steps_per_sec {
            debug!("speed {} clamped to {}", steps_per_sec, self.target_speed);
        }
    }

    /// Set the speed increment applied per ramp update, floored at 1 step/s.
    #[inline]
    pub fn set_acceleration(&mut self, acceleration: u32) {
        self.ramp.set_acceleration(acceleration);
    }

    /// Set the idle power-down delay. `None` keeps the coils powered.
    #[inline]
    pub fn set_idle_timeout_us(&mut self, timeout: Option<u64>) {
        self.idle_timeout_us = timeout;
    }

    /// Set the compensation coefficient in steps per degree.
    #[inline]
    pub fn set_temperature_compensation_coefficient(&mut self, coefficient: i32) {
        self.compensation.set_coefficient(coefficient);
    }

    /// Feed a temperature reading.
    ///
    /// The first reading after enabling compensation becomes the baseline.
    #[inline]
    pub fn set_current_temperature(&mut self, temperature: Celsius) {
        self.compensation.set_current_temperature(temperature);
    }

    // ---------------------------------------------------------------------
    // Getters
    // ---------------------------------------------------------------------

    /// Position of record, in steps.
    #[inline]
    pub fn current_position(&self) -> i64 {
        self.current_position
    }

    /// Requested absolute position, in steps.
    #[inline]
    pub fn target_position(&self) -> i64 {
        self.target_position
    }

    /// Logical direction.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Microstep resolution.
    #[inline]
    pub fn step_mode(&self) -> StepMode {
        self.step_mode
    }

    /// Per-step or smooth.
    #[inline]
    pub fn move_mode(&self) -> MoveMode {
        self.move_mode
    }

    /// Realized speed, steps/s.
    #[inline]
    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// Commanded cruise speed after clamping, steps/s.
    #[inline]
    pub fn target_speed(&self) -> u32 {
        self.target_speed
    }

    /// Speed increment per ramp update.
    #[inline]
    pub fn acceleration(&self) -> u32 {
        self.ramp.acceleration()
    }

    /// Idle power-down delay.
    #[inline]
    pub fn idle_timeout_us(&self) -> Option<u64> {
        self.idle_timeout_us
    }

    /// Step pulse width.
    #[inline]
    pub fn pulse_width_us(&self) -> u32 {
        self.pulse_width_us
    }

    /// Compensation coefficient in steps per degree.
    #[inline]
    pub fn temperature_compensation_coefficient(&self) -> i32 {
        self.compensation.coefficient()
    }

    /// Most recent temperature reading.
    #[inline]
    pub fn current_temperature(&self) -> Celsius {
        self.compensation.current_temperature()
    }

    /// Whether compensation is switched on.
    #[inline]
    pub fn is_temperature_compensation_enabled(&self) -> bool {
        self.compensation.is_enabled()
    }

    /// Compensation state.
    #[inline]
    pub fn compensation(&self) -> &TemperatureCompensation {
        &self.compensation
    }

    /// Trapezoid bookkeeping of the current (or last) move.
    #[inline]
    pub fn ramp(&self) -> &SpeedRamp {
        &self.ramp
    }

    /// Whether a move is in progress.
    #[inline]
    pub fn is_moving(&self) -> bool {
        self.state.is_moving()
    }

    /// Idle or moving.
    #[inline]
    pub fn state(&self) -> MotionState {
        self.state
    }

    /// Where the current move is on its profile.
    pub fn phase(&self) -> MotionPhase {
        match (self.state, self.active_mode) {
            (MotionState::Idle, _) => MotionPhase::Complete,
            (MotionState::Moving, MoveMode::PerStep) => MotionPhase::Cruising,
            (MotionState::Moving, MoveMode::Smooth) => {
                self.ramp.phase_at(self.current_position, self.target_position)
            }
        }
    }

    /// Whether the enable line is asserted.
    #[inline]
    pub fn is_driver_enabled(&self) -> bool {
        self.driver_enabled
    }

    /// Clock reading after the last emitted step.
    #[inline]
    pub fn last_step_micros(&self) -> u64 {
        self.last_step_us
    }

    /// The pacing clock.
    #[inline]
    pub fn clock(&self) -> &CLK {
        &self.clock
    }

    /// The driver output port.
    #[inline]
    pub fn output(&self) -> &OUT {
        &self.output
    }

    /// Take the engine apart.
    pub fn release(self) -> (OUT, CLK, DELAY) {
        (self.output, self.clock, self.delay)
    }

    // ---------------------------------------------------------------------
    // Actions
    // ---------------------------------------------------------------------

    /// Start moving toward the target position.
    ///
    /// Returns `false` (and does nothing) when already at the target.
    pub fn go_to_target_position(&mut self) -> Result<bool> {
        if self.current_position == self.target_position {
            trace!("already at {}", self.current_position);
            return Ok(false);
        }

        self.active_mode = self.move_mode;
        self.speed = match self.active_mode {
            MoveMode::Smooth => 0,
            MoveMode::PerStep => self.target_speed,
        };
        self.ramp.begin(self.current_position);
        self.set_driver_enabled(true)?;
        self.state = MotionState::Moving;

        debug!(
            "move {} -> {} at {} steps/s",
            self.current_position,
            self.target_position,
            self.target_speed
        );
        Ok(true)
    }

    /// Abandon the current move where it stands.
    pub fn stop_movement(&mut self) {
        if self.state.is_moving() {
            debug!("stopped at {}", self.current_position);
        }
        self.state = MotionState::Idle;
        self.speed = 0;
        self.ramp.reset();
    }

    /// Advance the engine by one tick.
    ///
    /// While moving: update the ramp (smooth mode, once per ramp period),
    /// stop on arrival, or emit one step if the pacing interval has elapsed.
    /// While idle: power the driver down once the idle timeout has passed.
    ///
    /// Returns `true` when a step was emitted.
    pub fn manage(&mut self) -> Result<bool> {
        if self.state.is_moving() {
            self.advance()
        } else {
            self.power_down_when_idle()?;
            Ok(false)
        }
    }

    /// Apply any temperature drift correction as a move.
    ///
    /// Does nothing while moving, before a baseline reading exists, or when
    /// the drift rounds to zero steps. Returns the correction applied.
    pub fn compensate_temperature(&mut self) -> Result<Option<i64>> {
        if self.state.is_moving() {
            return Ok(None);
        }
        let Some(steps) = self.compensation.pending_correction() else {
            return Ok(None);
        };

        self.compensation.commit();
        self.target_position = self.current_position + steps;
        info!("temperature correction of {} steps", steps);
        self.go_to_target_position()?;
        Ok(Some(steps))
    }

    /// Switch compensation on; the next reading becomes the baseline.
    #[inline]
    pub fn enable_temperature_compensation(&mut self) {
        self.compensation.enable();
    }

    /// Switch compensation off.
    #[inline]
    pub fn disable_temperature_compensation(&mut self) {
        self.compensation.disable();
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn advance(&mut self) -> Result<bool> {
        if self.active_mode == MoveMode::Smooth {
            let now_ms = self.clock.now_millis();
            if let Some(speed) = self.ramp.update(
                now_ms,
                self.current_position,
                self.target_position,
                self.speed,
                self.target_speed,
            ) {
                trace!("ramp {} -> {} steps/s", self.speed, speed);
                self.speed = speed;
            }
        }

        if self.current_position == self.target_position {
            debug!("arrived at {}", self.current_position);
            self.stop_movement();
            return Ok(false);
        }

        if self.speed == 0 {
            return Ok(false);
        }

        let elapsed = self.clock.now_micros().wrapping_sub(self.last_step_us);
        if elapsed < step_interval_us(self.speed) {
            return Ok(false);
        }

        self.pulse()?;

        if self
            .ramp
            .record_step(self.current_position, self.speed, self.target_speed)
        {
            debug!(
                "cruise {} steps/s reached after {} steps",
                self.target_speed,
                self.ramp.cruise_distance()
            );
        }
        self.speed = self.speed.min(self.target_speed);
        Ok(true)
    }

    /// One step toward the target.
    fn pulse(&mut self) -> Result<()> {
        let forward = self.target_position > self.current_position;
        self.output
            .set_signal(Signal::Direction, self.direction.level(forward))?;
        self.set_driver_enabled(true)?;

        self.delay.delay_us(self.pulse_width_us);
        self.output.set_signal(Signal::Step, PinState::High)?;
        self.delay.delay_us(self.pulse_width_us);
        self.output.set_signal(Signal::Step, PinState::Low)?;

        self.current_position += if forward { 1 } else { -1 };
        self.last_step_us = self.clock.now_micros();
        Ok(())
    }

    fn power_down_when_idle(&mut self) -> Result<()> {
        let Some(timeout) = self.idle_timeout_us else {
            return Ok(());
        };
        if !self.driver_enabled {
            return Ok(());
        }
        if self.clock.now_micros().wrapping_sub(self.last_step_us) >= timeout {
            self.set_driver_enabled(false)?;
            info!("idle for {} us, driver disabled", timeout);
        }
        Ok(())
    }

    /// Enable is active low.
    fn set_driver_enabled(&mut self, enabled: bool) -> Result<()> {
        let level = if enabled { PinState::Low } else { PinState::High };
        self.output.set_signal(Signal::Enable, level)?;
        self.driver_enabled = enabled;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motor::{ManualClock, MotionEngineBuilder, RecordingOutput};
    use embedded_hal_mock::eh1::delay::NoopDelay;

    type TestEngine<'a> = MotionEngine<RecordingOutput, &'a ManualClock, NoopDelay>;

    fn engine(clock: &ManualClock) -> TestEngine<'_> {
        MotionEngineBuilder::new()
            .output(RecordingOutput::default())
            .clock(clock)
            .delay(NoopDelay::new())
            .build()
            .unwrap()
    }

    /// Tick every 100 µs until the move ends. Returns the steps emitted.
    fn run(engine: &mut TestEngine<'_>, clock: &ManualClock) -> u32 {
        let mut steps = 0;
        for _ in 0..1_000_000 {
            if !engine.is_moving() {
                break;
            }
            clock.advance_micros(100);
            if engine.manage().unwrap() {
                steps += 1;
            }
        }
        steps
    }

    #[test]
    fn test_power_on_levels() {
        let clock = ManualClock::new();
        let engine = engine(&clock);
        let out = engine.output();

        assert_eq!(out.level(Signal::Direction), Some(PinState::Low));
        assert_eq!(out.level(Signal::Step), Some(PinState::Low));
        assert_eq!(out.level(Signal::Sleep), Some(PinState::High));
        assert_eq!(out.level(Signal::Reset), Some(PinState::High));
        assert_eq!(out.level(Signal::Enable), Some(PinState::High));
        assert!(!engine.is_driver_enabled());
        assert_eq!(engine.step_mode(), StepMode::Eighth);
        assert_eq!(engine.target_speed(), DEFAULT_SPEED);
    }

    #[test]
    fn test_step_mode_lines() {
        let clock = ManualClock::new();
        let mut engine = engine(&clock);

        engine.set_step_mode(StepMode::SixtyFourth).unwrap();
        let out = engine.output();
        assert_eq!(out.level(Signal::ModeSelect1), Some(PinState::Low));
        assert_eq!(out.level(Signal::ModeSelect2), Some(PinState::High));
        assert_eq!(out.level(Signal::ModeSelect3), Some(PinState::High));

        engine.set_step_mode(StepMode::Sixteenth).unwrap();
        let out = engine.output();
        assert_eq!(out.level(Signal::ModeSelect2), Some(PinState::High));
        assert_eq!(out.level(Signal::ModeSelect3), Some(PinState::Low));
    }

    #[test]
    fn test_speed_clamped_per_mode() {
        let clock = ManualClock::new();
        let mut engine = engine(&clock);

        for mode in StepMode::ALL {
            engine.set_step_mode(mode).unwrap();
            engine.set_speed(mode.max_speed() + 1);
            assert_eq!(engine.target_speed(), mode.max_speed());
            engine.set_speed(mode.max_speed());
            assert_eq!(engine.target_speed(), mode.max_speed());
            engine.set_speed(10);
            assert_eq!(engine.target_speed(), 10);
        }
    }

    #[test]
    fn test_step_mode_change_does_not_reclamp() {
        let clock = ManualClock::new();
        let mut engine = engine(&clock);
        engine.set_step_mode(StepMode::SixtyFourth).unwrap();
        engine.set_speed(15_000);

        engine.set_step_mode(StepMode::Eighth).unwrap();
        assert_eq!(engine.target_speed(), 15_000);
        engine.set_speed(engine.target_speed());
        assert_eq!(engine.target_speed(), 3_000);
    }

    #[test]
    fn test_go_to_current_position_is_noop() {
        let clock = ManualClock::new();
        let mut engine = engine(&clock);
        engine.set_current_position(100);
        engine.set_target_position(100);

        assert!(!engine.go_to_target_position().unwrap());
        assert!(!engine.is_moving());
        clock.advance_millis(100);
        assert!(!engine.manage().unwrap());
        assert_eq!(engine.output().step_pulses, 0);
    }

    #[test]
    fn test_per_step_move_starts_at_cruise() {
        let clock = ManualClock::new();
        let mut engine = engine(&clock);
        engine.set_target_position(25);
        engine.go_to_target_position().unwrap();

        assert_eq!(engine.speed(), DEFAULT_SPEED);
        assert_eq!(engine.phase(), MotionPhase::Cruising);
        assert!(engine.is_driver_enabled());

        let steps = run(&mut engine, &clock);
        assert_eq!(steps, 25);
        assert_eq!(engine.current_position(), 25);
        assert_eq!(engine.output().step_pulses, 25);
        assert_eq!(engine.state(), MotionState::Idle);
        assert_eq!(engine.speed(), 0);
    }

    #[test]
    fn test_pacing_is_one_step_per_interval() {
        let clock = ManualClock::at_micros(10_000_000);
        let mut engine = engine(&clock);
        engine.set_speed(100);
        engine.set_target_position(5);
        engine.go_to_target_position().unwrap();

        // First step is due immediately: the last step was long ago
        assert!(engine.manage().unwrap());
        assert!(!engine.manage().unwrap());

        clock.advance_micros(step_interval_us(100) - 1);
        assert!(!engine.manage().unwrap());
        clock.advance_micros(1);
        assert!(engine.manage().unwrap());
        assert_eq!(engine.current_position(), 2);
    }

    #[test]
    fn test_direction_levels_follow_logical_direction() {
        let clock = ManualClock::new();
        let mut engine = engine(&clock);

        engine.set_target_position(-3);
        engine.go_to_target_position().unwrap();
        run(&mut engine, &clock);
        assert_eq!(engine.current_position(), -3);
        assert_eq!(engine.output().level(Signal::Direction), Some(PinState::High));

        engine.set_direction(Direction::CounterClockwise);
        engine.set_target_position(0);
        engine.go_to_target_position().unwrap();
        run(&mut engine, &clock);
        assert_eq!(engine.current_position(), 0);
        assert_eq!(engine.output().level(Signal::Direction), Some(PinState::High));

        engine.set_target_position(-1);
        engine.go_to_target_position().unwrap();
        run(&mut engine, &clock);
        assert_eq!(engine.output().level(Signal::Direction), Some(PinState::Low));
    }

    #[test]
    fn test_smooth_move_ramps_and_arrives() {
        let clock = ManualClock::new();
        let mut engine = engine(&clock);
        engine.set_move_mode(MoveMode::Smooth);
        engine.set_speed(300);
        engine.set_target_position(100);
        engine.go_to_target_position().unwrap();

        assert_eq!(engine.speed(), 0);
        assert_eq!(engine.phase(), MotionPhase::Accelerating);

        let steps = run(&mut engine, &clock);
        assert_eq!(steps, 100);
        assert_eq!(engine.current_position(), 100);
        assert!(!engine.is_moving());
    }

    #[test]
    fn test_move_mode_change_waits_for_next_move() {
        let clock = ManualClock::new();
        let mut engine = engine(&clock);
        engine.set_move_mode(MoveMode::Smooth);
        engine.set_speed(300);
        engine.set_target_position(200);
        engine.go_to_target_position().unwrap();

        while engine.current_position() < 5 {
            clock.advance_micros(100);
            engine.manage().unwrap();
        }
        engine.set_move_mode(MoveMode::PerStep);
        assert_eq!(engine.move_mode(), MoveMode::PerStep);
        assert_ne!(engine.phase(), MotionPhase::Cruising);

        let mut peak = 0;
        let mut last = 0;
        while engine.is_moving() {
            clock.advance_micros(100);
            if engine.manage().unwrap() {
                peak = peak.max(engine.speed());
                last = engine.speed();
            }
        }

        // The running move keeps its ramp: cruise, then decelerate
        assert_eq!(engine.current_position(), 200);
        assert_eq!(peak, 300);
        assert!(last < 300);

        // The next move uses the new mode
        engine.set_target_position(210);
        engine.go_to_target_position().unwrap();
        assert_eq!(engine.speed(), 300);
        assert_eq!(engine.phase(), MotionPhase::Cruising);
    }

    #[test]
    fn test_zero_acceleration_still_arrives() {
        let clock = ManualClock::new();
        let mut engine = engine(&clock);
        engine.set_move_mode(MoveMode::Smooth);
        engine.set_acceleration(0);
        assert_eq!(engine.acceleration(), 1);
        engine.set_target_position(3);
        engine.go_to_target_position().unwrap();

        run(&mut engine, &clock);
        assert_eq!(engine.current_position(), 3);
        assert!(!engine.is_moving());
    }

    #[test]
    fn test_stop_halts_immediately() {
        let clock = ManualClock::new();
        let mut engine = engine(&clock);
        engine.set_target_position(1_000);
        engine.go_to_target_position().unwrap();

        for _ in 0..50 {
            clock.advance_micros(100);
            engine.manage().unwrap();
        }
        let stopped_at = engine.current_position();
        assert!(stopped_at > 0);

        engine.stop_movement();
        assert!(!engine.is_moving());
        assert_eq!(engine.speed(), 0);

        clock.advance_millis(10);
        assert!(!engine.manage().unwrap());
        assert_eq!(engine.current_position(), stopped_at);
    }

    #[test]
    fn test_idle_power_down() {
        let clock = ManualClock::at_micros(10_000_000);
        let mut engine = engine(&clock);
        engine.set_target_position(1);
        engine.go_to_target_position().unwrap();
        assert!(engine.manage().unwrap());
        assert_eq!(engine.last_step_micros(), 10_000_000);
        assert!(!engine.manage().unwrap());
        assert!(!engine.is_moving());

        clock.set_micros(10_999_999);
        engine.manage().unwrap();
        assert!(engine.is_driver_enabled());

        clock.set_micros(11_000_000);
        engine.manage().unwrap();
        assert!(!engine.is_driver_enabled());
        assert_eq!(engine.output().level(Signal::Enable), Some(PinState::High));
    }

    #[test]
    fn test_hold_torque_keeps_driver_enabled() {
        let clock = ManualClock::at_micros(10_000_000);
        let mut engine = engine(&clock);
        engine.set_idle_timeout_us(None);
        engine.set_target_position(1);
        engine.go_to_target_position().unwrap();
        engine.manage().unwrap();
        engine.manage().unwrap();

        clock.advance_millis(5_000);
        engine.manage().unwrap();
        assert!(engine.is_driver_enabled());
    }

    #[test]
    fn test_compensation_routes_through_move() {
        let clock = ManualClock::new();
        let mut engine = engine(&clock);
        engine.set_current_position(500);
        engine.set_temperature_compensation_coefficient(10);
        engine.enable_temperature_compensation();

        // No baseline yet
        assert_eq!(engine.compensate_temperature().unwrap(), None);

        engine.set_current_temperature(Celsius(20.0));
        assert_eq!(engine.compensate_temperature().unwrap(), None);

        engine.set_current_temperature(Celsius(18.5));
        assert_eq!(engine.compensate_temperature().unwrap(), Some(15));
        assert!(engine.is_moving());
        assert_eq!(engine.target_position(), 515);

        // Moving: ignored even with fresh drift
        engine.set_current_temperature(Celsius(17.0));
        assert_eq!(engine.compensate_temperature().unwrap(), None);

        run(&mut engine, &clock);
        assert_eq!(engine.current_position(), 515);

        assert_eq!(engine.compensate_temperature().unwrap(), Some(15));
        run(&mut engine, &clock);
        assert_eq!(engine.compensate_temperature().unwrap(), None);
        assert_eq!(engine.current_position(), 530);
    }
}
