//! Motion engine run state.

/// Whether the engine is executing a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionState {
    /// No move in progress. The driver powers down after the idle timeout.
    #[default]
    Idle,
    /// Stepping toward the target position.
    Moving,
}

impl MotionState {
    /// State name for display/debugging.
    pub fn name(self) -> &'static str {
        match self {
            MotionState::Idle => "Idle",
            MotionState::Moving => "Moving",
        }
    }

    /// Whether a move is in progress.
    #[inline]
    pub fn is_moving(self) -> bool {
        self == MotionState::Moving
    }
}
