//! Builder pattern for MotionEngine.

use embedded_hal::delay::DelayNs;

use crate::config::MotorConfig;
use crate::error::{ConfigError, Error, Result};
use crate::motion::{
    Direction, MoveMode, SpeedRamp, StepMode, DEFAULT_ACCELERATION, DEFAULT_RAMP_INTERVAL_MS,
};

use super::clock::Clock;
use super::driver::{
    MotionEngine, DEFAULT_IDLE_TIMEOUT_US, DEFAULT_PULSE_WIDTH_US, DEFAULT_SPEED,
};
use super::pins::PulseOutput;

/// Builder for creating MotionEngine instances.
pub struct MotionEngineBuilder<OUT, CLK, DELAY>
where
    OUT: PulseOutput,
    CLK: Clock,
    DELAY: DelayNs,
{
    output: Option<OUT>,
    clock: Option<CLK>,
    delay: Option<DELAY>,
    step_mode: StepMode,
    move_mode: MoveMode,
    speed: u32,
    acceleration: u32,
    ramp_interval_ms: u32,
    direction: Direction,
    idle_timeout_us: Option<u64>,
    pulse_width_us: u32,
}

impl<OUT, CLK, DELAY> Default for MotionEngineBuilder<OUT, CLK, DELAY>
where
    OUT: PulseOutput,
    CLK: Clock,
    DELAY: DelayNs,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<OUT, CLK, DELAY> MotionEngineBuilder<OUT, CLK, DELAY>
where
    OUT: PulseOutput,
    CLK: Clock,
    DELAY: DelayNs,
{
    /// Create a new builder with power-on defaults.
    pub fn new() -> Self {
        Self {
            output: None,
            clock: None,
            delay: None,
            step_mode: StepMode::default(),
            move_mode: MoveMode::default(),
            speed: DEFAULT_SPEED,
            acceleration: DEFAULT_ACCELERATION,
            ramp_interval_ms: DEFAULT_RAMP_INTERVAL_MS,
            direction: Direction::default(),
            idle_timeout_us: Some(DEFAULT_IDLE_TIMEOUT_US),
            pulse_width_us: DEFAULT_PULSE_WIDTH_US,
        }
    }

    /// Set the driver output port.
    pub fn output(mut self, output: OUT) -> Self {
        self.output = Some(output);
        self
    }

    /// Set the time source.
    pub fn clock(mut self, clock: CLK) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set the delay provider.
    pub fn delay(mut self, delay: DELAY) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Set the initial microstep resolution.
    pub fn step_mode(mut self, mode: StepMode) -> Self {
        self.step_mode = mode;
        self
    }

    /// Set the move mode.
    pub fn move_mode(mut self, mode: MoveMode) -> Self {
        self.move_mode = mode;
        self
    }

    /// Set the cruise speed in steps/s. Clamped at build time.
    pub fn speed(mut self, steps_per_sec: u32) -> Self {
        self.speed = steps_per_sec;
        self
    }

    /// Set the speed increment per ramp update.
    pub fn acceleration(mut self, acceleration: u32) -> Self {
        self.acceleration = acceleration;
        self
    }

    /// Set the ramp update period.
    pub fn ramp_interval_ms(mut self, interval_ms: u32) -> Self {
        self.ramp_interval_ms = interval_ms;
        self
    }

    /// Set the logical direction.
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set the idle power-down delay. `None` keeps the coils powered.
    pub fn idle_timeout_us(mut self, timeout: Option<u64>) -> Self {
        self.idle_timeout_us = timeout;
        self
    }

    /// Set the step pulse width.
    pub fn pulse_width_us(mut self, width: u32) -> Self {
        self.pulse_width_us = width;
        self
    }

    /// Configure from a MotorConfig.
    pub fn from_motor_config(mut self, config: &MotorConfig) -> Self {
        self.step_mode = config.step_mode;
        self.move_mode = config.move_mode;
        self.speed = config.speed;
        self.acceleration = config.acceleration;
        self.ramp_interval_ms = config.ramp_interval_ms;
        self.direction = config.direction;
        self.idle_timeout_us = config.idle_timeout();
        self.pulse_width_us = config.pulse_width_us;
        self
    }

    /// Build the MotionEngine and drive the outputs to their startup levels.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` if the output, clock or delay was
    /// not provided, or a pin error from the startup writes.
    pub fn build(self) -> Result<MotionEngine<OUT, CLK, DELAY>> {
        let output = self
            .output
            .ok_or(Error::Config(ConfigError::MissingField("output")))?;
        let clock = self
            .clock
            .ok_or(Error::Config(ConfigError::MissingField("clock")))?;
        let delay = self
            .delay
            .ok_or(Error::Config(ConfigError::MissingField("delay")))?;

        let ramp = SpeedRamp::new(self.acceleration, self.ramp_interval_ms);
        let mut engine = MotionEngine::new(
            output,
            clock,
            delay,
            ramp,
            self.idle_timeout_us,
            self.pulse_width_us,
        );

        engine.power_on(self.step_mode)?;
        engine.set_move_mode(self.move_mode);
        engine.set_direction(self.direction);
        engine.set_speed(self.speed);

        debug!(
            "engine ready: 1/{} step, {} steps/s",
            self.step_mode.divisor(),
            engine.target_speed()
        );
        Ok(engine)
    }
}
