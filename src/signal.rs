//! Signal alphabet and the sources that draw new signals for a sequence.

use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::error::Error;

/// One of the four colored signals the player has to repeat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Signal {
    Red,
    Blue,
    Green,
    Yellow,
}

impl Signal {
    /// Board order (also the order of the `1`-`4` keyboard shortcuts).
    pub const ALL: [Signal; 4] = [Signal::Red, Signal::Blue, Signal::Green, Signal::Yellow];

    /// Tone played while the signal is highlighted or pressed.
    pub fn frequency_hz(self) -> f64 {
        match self {
            Signal::Red => 261.63,    // C4
            Signal::Blue => 329.63,   // E4
            Signal::Green => 392.00,  // G4
            Signal::Yellow => 523.25, // C5
        }
    }

    /// CSS color of the button face.
    pub fn color(self) -> &'static str {
        match self {
            Signal::Red => "#e53935",
            Signal::Blue => "#1e88e5",
            Signal::Green => "#43a047",
            Signal::Yellow => "#fdd835",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Signal::Red => "red",
            Signal::Blue => "blue",
            Signal::Green => "green",
            Signal::Yellow => "yellow",
        }
    }

    /// Position on the board, 0-based.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Signal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Signal::ALL
            .into_iter()
            .find(|sig| sig.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownSignal(s.to_string()))
    }
}

/// Supplies the signal appended at the start of every round.
pub trait SignalSource {
    fn next_signal(&mut self) -> Signal;
}

/// Uniform, independent draws from any `rand` generator. No repetition avoidance.
#[derive(Debug, Clone)]
pub struct RngSignals<R> {
    rng: R,
}

impl<R: Rng> RngSignals<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> SignalSource for RngSignals<R> {
    fn next_signal(&mut self) -> Signal {
        Signal::ALL[self.rng.gen_range(0..Signal::ALL.len())]
    }
}

/// Replays a fixed list of signals, wrapping around when exhausted.
/// An empty script always yields `Signal::Red`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSignals {
    script: Vec<Signal>,
    cursor: usize,
}

impl ScriptedSignals {
    pub fn new(script: impl Into<Vec<Signal>>) -> Self {
        Self {
            script: script.into(),
            cursor: 0,
        }
    }
}

impl SignalSource for ScriptedSignals {
    fn next_signal(&mut self) -> Signal {
        if self.script.is_empty() {
            return Signal::Red;
        }
        let sig = self.script[self.cursor % self.script.len()];
        self.cursor += 1;
        sig
    }
}
