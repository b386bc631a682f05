//! Host-side focuser simulation.
//!
//! Runs a smooth move, a temperature drift correction and a jog against a
//! simulated clock and prints the speed profile.
//!
//! ```sh
//! cargo run --example simulated_focuser
//! ```

use embedded_hal::digital::PinState;
use embedded_hal_mock::eh1::delay::NoopDelay;
use stepper_focuser::{
    parse_config, Celsius, Clock, Command, Focuser, ManualClock, MotionPhase, PulseOutput, Result,
    Signal,
};

const CONFIG: &str = r#"
name = "simulated"

[motor]
step_mode = 32
move_mode = "smooth"
speed = 2000
acceleration = 200

[temperature]
enabled = true
coefficient = 25
interval_ms = 30000
"#;

/// Counts step pulses instead of toggling GPIO.
#[derive(Default)]
struct StepCounter {
    pulses: u32,
    enabled: bool,
}

impl PulseOutput for StepCounter {
    fn set_signal(&mut self, signal: Signal, state: PinState) -> Result<()> {
        match (signal, state) {
            (Signal::Step, PinState::High) => self.pulses += 1,
            (Signal::Enable, level) => self.enabled = level == PinState::Low,
            _ => {}
        }
        Ok(())
    }
}

fn run_until_idle(
    focuser: &mut Focuser<StepCounter, &ManualClock, NoopDelay>,
    clock: &ManualClock,
) -> Result<()> {
    let mut last_phase = MotionPhase::Complete;
    let mut steps = 0u32;
    while focuser.engine().is_moving() {
        clock.advance_micros(20);
        if focuser.poll(None)? {
            steps += 1;
        }
        let phase = focuser.engine().phase();
        if phase != last_phase {
            println!(
                "  t={:>6} ms  pos={:>6}  speed={:>5}  {:?}",
                clock.now_millis(),
                focuser.engine().current_position(),
                focuser.engine().speed(),
                phase
            );
            last_phase = phase;
        }
    }
    println!("  arrived at {} after {} steps", focuser.engine().current_position(), steps);
    Ok(())
}

fn main() -> Result<()> {
    let config = parse_config(CONFIG)?;
    let clock = ManualClock::new();
    let mut focuser =
        Focuser::from_config(&config, StepCounter::default(), &clock, NoopDelay::new())?;

    println!("{}: smooth move to 3000", focuser.name());
    focuser.handle(Command::SetTarget(3_000))?;
    focuser.handle(Command::GoToTarget)?;
    run_until_idle(&mut focuser, &clock)?;

    println!("temperature drift 18.0 -> 17.2 C");
    // First scheduled pass latches the baseline, the next one corrects
    clock.advance_millis(30_001);
    focuser.poll(Some(Celsius(18.0)))?;
    clock.advance_millis(30_001);
    focuser.poll(Some(Celsius(17.2)))?;
    run_until_idle(&mut focuser, &clock)?;

    println!("jog: encoder +40 counts");
    let steps = focuser.jog(40)?;
    println!("  jog adds {} steps", steps);
    run_until_idle(&mut focuser, &clock)?;

    clock.advance_millis(1_500);
    focuser.poll(None)?;
    let (output, _, _) = focuser.release();
    println!(
        "total pulses: {}, driver enabled after idle: {}",
        output.pulses, output.enabled
    );
    Ok(())
}
