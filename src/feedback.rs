//! Outbound feedback: tones, vibration and high-score storage.
//!
//! Every method is best-effort. Implementations swallow backend failures so
//! game logic never depends on them.

/// A single sine tone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tone {
    pub frequency_hz: f64,
    pub duration_ms: u32,
}

/// Duration of the tone played while a signal is shown during playback.
pub const SEQUENCE_TONE_MS: u32 = 300;
/// Duration of the tone played when the player presses a signal.
pub const CLICK_TONE_MS: u32 = 200;

pub const FAILURE_TONE: Tone = Tone {
    frequency_hz: 150.0,
    duration_ms: 500,
};
/// Two-tone success chime (C5 then E5), the second one delayed by the chime gap.
pub const SUCCESS_CHIME: [Tone; 2] = [
    Tone {
        frequency_hz: 523.25,
        duration_ms: 200,
    },
    Tone {
        frequency_hz: 659.25,
        duration_ms: 200,
    },
];

pub const SEQUENCE_HAPTIC: &[u32] = &[50];
pub const CLICK_HAPTIC: &[u32] = &[30];
pub const FAILURE_HAPTIC: &[u32] = &[200, 100, 200];
pub const SUCCESS_HAPTIC: &[u32] = &[50, 50, 50];

pub trait FeedbackSink {
    fn emit_tone(&mut self, frequency_hz: f64, duration_ms: u32);
    /// Alternating vibrate / pause durations in ms.
    fn emit_haptic(&mut self, pattern_ms: &[u32]);
    /// Missing or unreadable values read as 0.
    fn read_high_score(&mut self) -> u32;
    fn write_high_score(&mut self, score: u32);

    fn play(&mut self, tone: Tone) {
        self.emit_tone(tone.frequency_hz, tone.duration_ms);
    }
}

impl<F: FeedbackSink + ?Sized> FeedbackSink for &mut F {
    fn emit_tone(&mut self, frequency_hz: f64, duration_ms: u32) {
        (**self).emit_tone(frequency_hz, duration_ms);
    }
    fn emit_haptic(&mut self, pattern_ms: &[u32]) {
        (**self).emit_haptic(pattern_ms);
    }
    fn read_high_score(&mut self) -> u32 {
        (**self).read_high_score()
    }
    fn write_high_score(&mut self, score: u32) {
        (**self).write_high_score(score);
    }
}

/// Sink for environments without audio, vibration or storage.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl FeedbackSink for Silent {
    fn emit_tone(&mut self, _frequency_hz: f64, _duration_ms: u32) {}
    fn emit_haptic(&mut self, _pattern_ms: &[u32]) {}
    fn read_high_score(&mut self) -> u32 {
        0
    }
    fn write_high_score(&mut self, _score: u32) {}
}

#[derive(Clone, Debug, PartialEq)]
pub enum FeedbackEvent {
    Tone(Tone),
    Haptic(Vec<u32>),
    HighScoreWritten(u32),
}

/// In-memory sink that records every call. Used for headless runs and tests.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    pub events: Vec<FeedbackEvent>,
    pub stored_high_score: u32,
    pub high_score_reads: usize,
}

impl Recorder {
    pub fn with_high_score(score: u32) -> Self {
        Self {
            stored_high_score: score,
            ..Self::default()
        }
    }

    pub fn tones(&self) -> Vec<Tone> {
        self.events
            .iter()
            .filter_map(|e| match e {
                FeedbackEvent::Tone(t) => Some(*t),
                _ => None,
            })
            .collect()
    }

    pub fn haptics(&self) -> Vec<&[u32]> {
        self.events
            .iter()
            .filter_map(|e| match e {
                FeedbackEvent::Haptic(p) => Some(p.as_slice()),
                _ => None,
            })
            .collect()
    }

    pub fn high_score_writes(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                FeedbackEvent::HighScoreWritten(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl FeedbackSink for Recorder {
    fn emit_tone(&mut self, frequency_hz: f64, duration_ms: u32) {
        self.events.push(FeedbackEvent::Tone(Tone {
            frequency_hz,
            duration_ms,
        }));
    }

    fn emit_haptic(&mut self, pattern_ms: &[u32]) {
        self.events.push(FeedbackEvent::Haptic(pattern_ms.to_vec()));
    }

    fn read_high_score(&mut self) -> u32 {
        self.high_score_reads += 1;
        self.stored_high_score
    }

    fn write_high_score(&mut self, score: u32) {
        self.stored_high_score = score;
        self.events.push(FeedbackEvent::HighScoreWritten(score));
    }
}
