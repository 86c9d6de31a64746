use crate::difficulty::Difficulty;
use crate::signal::Signal;

/// Coarse phase for the presenter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PhaseKind {
    Idle,
    /// Playback of the sequence (including its lead-in).
    Demo,
    AwaitingInput,
    /// Round complete, waiting for the next playback.
    Intermission,
    Paused,
    GameOver,
}

/// Everything the presenter needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Snapshot {
    pub phase: PhaseKind,
    pub level: u32,
    pub score: u32,
    pub high_score: u32,
    pub streak: u32,
    pub message: String,
    pub flashing_signal: Option<Signal>,
    pub difficulty: Difficulty,
    pub input_len: usize,
    pub sequence_len: usize,
    /// Fraction of the current sequence already reproduced, 0.0..=1.0.
    pub progress: f64,
    pub celebrating: bool,
    pub new_record: bool,
}

pub(crate) fn progress(input_len: usize, sequence_len: usize) -> f64 {
    if sequence_len == 0 {
        0.0
    } else {
        input_len as f64 / sequence_len as f64
    }
}

impl Snapshot {
    /// A game is in progress (difficulty selection and Start are hidden).
    pub fn game_active(&self) -> bool {
        !matches!(self.phase, PhaseKind::Idle | PhaseKind::GameOver)
    }

    pub fn accepts_input(&self) -> bool {
        self.phase == PhaseKind::AwaitingInput
    }

    pub fn can_toggle_pause(&self) -> bool {
        matches!(
            self.phase,
            PhaseKind::AwaitingInput | PhaseKind::Intermission | PhaseKind::Paused
        )
    }
}
