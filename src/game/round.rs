use crate::signal::Signal;

/// Outcome of one accepted player input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputOutcome {
    Mismatch,
    Pending,
    Complete,
}

/// Target sequence and the player's partial reproduction for one level.
/// Invariant: `sequence.len() == level`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Round {
    level: u32,
    sequence: Vec<Signal>,
    input: Vec<Signal>,
}

impl Round {
    pub fn first(signal: Signal) -> Self {
        Self {
            level: 1,
            sequence: vec![signal],
            input: Vec::new(),
        }
    }

    /// Next level: the previous sequence plus one appended signal, fresh input.
    pub fn extend(mut sequence: Vec<Signal>, signal: Signal) -> Self {
        sequence.push(signal);
        Self {
            level: sequence.len() as u32,
            sequence,
            input: Vec::new(),
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn sequence(&self) -> &[Signal] {
        &self.sequence
    }

    pub fn input(&self) -> &[Signal] {
        &self.input
    }

    pub fn into_sequence(self) -> Vec<Signal> {
        self.sequence
    }

    /// Append `signal` and check it against the target at the same index.
    /// Earlier inputs were already validated, so the first divergence fails.
    pub fn record(&mut self, signal: Signal) -> InputOutcome {
        self.input.push(signal);
        let idx = self.input.len() - 1;
        if self.sequence.get(idx) != Some(&signal) {
            InputOutcome::Mismatch
        } else if self.input.len() < self.sequence.len() {
            InputOutcome::Pending
        } else {
            InputOutcome::Complete
        }
    }
}
