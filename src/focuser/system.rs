//! Focuser facade.
//!
//! Owns the motion engine together with the jog adapter and the compensation
//! schedule, and runs them in the order a cooperative main loop should.

use embedded_hal::delay::DelayNs;
use heapless::String;

use crate::compensation::CompensationSchedule;
use crate::config::units::Celsius;
use crate::config::FocuserConfig;
use crate::error::Result;
use crate::motor::{Clock, MotionEngine, MotionEngineBuilder, PulseOutput};

use super::command::{self, Command, Response};
use super::jog::JogAdapter;

/// A configured focuser.
///
/// # Example
///
/// ```rust,ignore
/// use stepper_focuser::{Focuser, load_config};
///
/// let config = load_config("focuser.toml")?;
/// let mut focuser = Focuser::from_config(&config, pins, clock, delay)?;
///
/// loop {
///     focuser.poll(sensor.read())?;
///     if let Some(cmd) = serial.next_command() {
///         if let Some(reply) = focuser.handle(cmd)? {
///             serial.reply(reply);
///         }
///     }
/// }
/// ```
pub struct Focuser<OUT, CLK, DELAY>
where
    OUT: PulseOutput,
    CLK: Clock,
    DELAY: DelayNs,
{
    name: String<32>,
    engine: MotionEngine<OUT, CLK, DELAY>,
    jog: JogAdapter,
    schedule: CompensationSchedule,
}

impl<OUT, CLK, DELAY> Focuser<OUT, CLK, DELAY>
where
    OUT: PulseOutput,
    CLK: Clock,
    DELAY: DelayNs,
{
    /// Assemble a focuser from parts. Names over 32 bytes are truncated.
    pub fn new(
        name: &str,
        engine: MotionEngine<OUT, CLK, DELAY>,
        jog: JogAdapter,
        schedule: CompensationSchedule,
    ) -> Self {
        Self {
            name: truncated_name(name),
            engine,
            jog,
            schedule,
        }
    }

    /// Build a focuser from configuration and hardware.
    ///
    /// # Errors
    ///
    /// Returns an error if driving the outputs to their startup levels fails.
    pub fn from_config(
        config: &FocuserConfig,
        output: OUT,
        clock: CLK,
        delay: DELAY,
    ) -> Result<Self> {
        let mut engine = MotionEngineBuilder::new()
            .from_motor_config(&config.motor)
            .output(output)
            .clock(clock)
            .delay(delay)
            .build()?;

        engine.set_temperature_compensation_coefficient(config.temperature.coefficient);
        if config.temperature.enabled {
            engine.enable_temperature_compensation();
        }

        info!("focuser '{}' configured", config.name());

        Ok(Self::new(
            config.name(),
            engine,
            JogAdapter::from_config(&config.jog),
            CompensationSchedule::new(config.temperature.interval_ms),
        ))
    }

    /// Focuser name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// One main loop iteration.
    ///
    /// Stores `temperature` when a fresh reading is available, runs a
    /// compensation pass when due, then ticks the engine. Returns `true` when
    /// a step was emitted.
    pub fn poll(&mut self, temperature: Option<Celsius>) -> Result<bool> {
        self.schedule.poll(&mut self.engine, temperature)?;
        self.engine.manage()
    }

    /// Apply a host command.
    pub fn handle(&mut self, command: Command) -> Result<Option<Response>> {
        command::dispatch(&mut self.engine, command)
    }

    /// Apply a hand controller encoder reading.
    pub fn jog(&mut self, count: i32) -> Result<i64> {
        self.jog.update(&mut self.engine, count)
    }

    /// The motion engine.
    pub fn engine(&self) -> &MotionEngine<OUT, CLK, DELAY> {
        &self.engine
    }

    /// The motion engine, mutably.
    pub fn engine_mut(&mut self) -> &mut MotionEngine<OUT, CLK, DELAY> {
        &mut self.engine
    }

    /// The jog adapter.
    pub fn jog_adapter_mut(&mut self) -> &mut JogAdapter {
        &mut self.jog
    }

    /// The compensation schedule.
    pub fn schedule(&self) -> &CompensationSchedule {
        &self.schedule
    }

    /// Take the focuser apart.
    pub fn release(self) -> (OUT, CLK, DELAY) {
        self.engine.release()
    }
}

fn truncated_name(name: &str) -> String<32> {
    let mut out = String::new();
    for c in name.chars() {
        if out.push(c).is_err() {
            warn!("focuser name truncated to '{}'", out.as_str());
            break;
        }
    }
    out
}
