//! Sequence playback as a chain of timed cues.
//!
//! Each signal is shown for `speed / 2`, hidden, followed by a settle gap of
//! `speed / 4` and, unless it is the last one, a further `speed / 4` gap.
//! A highlight is anchored to the tick that actually shows it, and a single
//! tick shows at most one signal, so a stalled frame delays the rest of the
//! sequence instead of flashing it all at once.

use crate::signal::Signal;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Cue {
    LeadIn,
    Highlight,
    Settle,
    Gap,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackEvent {
    Show(Signal),
    Hide,
    Finished,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Playback {
    index: usize,
    cue: Cue,
    due_at: f64,
    finished: bool,
}

impl Playback {
    pub fn begin(at: f64, lead_in_ms: u32) -> Self {
        Self {
            index: 0,
            cue: Cue::LeadIn,
            due_at: at + lead_in_ms as f64,
            finished: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Fire the cues due by `now`, stopping after the first `Show`.
    pub fn advance(&mut self, sequence: &[Signal], speed_ms: u32, now: f64) -> Vec<PlaybackEvent> {
        let half = speed_ms as f64 / 2.0;
        let quarter = speed_ms as f64 / 4.0;
        let mut events = Vec::new();
        while !self.finished && now >= self.due_at {
            match self.cue {
                Cue::LeadIn | Cue::Gap => {
                    if self.cue == Cue::Gap {
                        self.index += 1;
                    }
                    match sequence.get(self.index) {
                        Some(&sig) => {
                            events.push(PlaybackEvent::Show(sig));
                            self.cue = Cue::Highlight;
                            self.due_at = self.due_at.max(now) + half;
                            break;
                        }
                        None => {
                            self.finished = true;
                            events.push(PlaybackEvent::Finished);
                        }
                    }
                }
                Cue::Highlight => {
                    events.push(PlaybackEvent::Hide);
                    self.cue = Cue::Settle;
                    self.due_at += quarter;
                }
                Cue::Settle => {
                    if self.index + 1 < sequence.len() {
                        self.cue = Cue::Gap;
                        self.due_at += quarter;
                    } else {
                        self.finished = true;
                        events.push(PlaybackEvent::Finished);
                    }
                }
            }
        }
        events
    }
}
