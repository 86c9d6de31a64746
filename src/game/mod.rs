//! The game state machine: sequence generation, playback, input validation
//! and scoring.
//!
//! The machine never reads a clock. Every operation takes the caller's
//! timestamp (`performance.now()` in the browser) and pending continuations
//! are stored as deadlines inside the active phase, fired by [`Game::tick`].
//! Dropping the phase (reset / restart) therefore abandons them.

mod playback;
mod round;
mod snapshot;

pub use playback::{Playback, PlaybackEvent};
pub use round::{InputOutcome, Round};
pub use snapshot::{PhaseKind, Snapshot};

use crate::config::GameConfig;
use crate::difficulty::Difficulty;
use crate::feedback::{
    CLICK_HAPTIC, CLICK_TONE_MS, FAILURE_HAPTIC, FAILURE_TONE, FeedbackSink, SEQUENCE_HAPTIC,
    SEQUENCE_TONE_MS, SUCCESS_CHIME, SUCCESS_HAPTIC,
};
use crate::score::ScoreState;
use crate::signal::{Signal, SignalSource};

pub const WELCOME_MESSAGE: &str = "Welcome to Alien Signal Decoder! Choose a difficulty to begin.";
pub const YOUR_TURN_MESSAGE: &str = "Your turn! Repeat the sequence.";
pub const PAUSED_MESSAGE: &str = "Game paused. Press resume to continue.";

/// User intents emitted by the presenter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    SelectDifficulty(Difficulty),
    Start,
    ClickSignal(Signal),
    TogglePause,
    Reset,
}

/// What a paused game returns to.
#[derive(Debug)]
enum Suspended {
    AwaitingInput(Round),
    Intermission {
        sequence: Vec<Signal>,
        next_level: u32,
        remaining_ms: f64,
    },
}

#[derive(Debug)]
enum Phase {
    Idle,
    Demo {
        round: Round,
        playback: Playback,
    },
    AwaitingInput {
        round: Round,
    },
    /// Completed round; the next one starts at `resume_at`.
    Intermission {
        sequence: Vec<Signal>,
        next_level: u32,
        resume_at: f64,
    },
    Paused {
        suspended: Suspended,
        /// Status message to restore on resume.
        message: String,
    },
    GameOver {
        level: u32,
        final_score: u32,
        new_record: bool,
    },
}

/// Short-lived presentational state.
#[derive(Debug, Default)]
struct Effects {
    /// Signal lit by playback.
    highlight: Option<Signal>,
    /// Signal lit by a player press, until the given time.
    flash: Option<(Signal, f64)>,
    /// Second tone of the success chime.
    chime_at: Option<f64>,
    celebrate_until: Option<f64>,
}

pub struct Game<F, S> {
    config: GameConfig,
    feedback: F,
    signals: S,
    difficulty: Difficulty,
    score: ScoreState,
    phase: Phase,
    message: String,
    effects: Effects,
}

impl<F: FeedbackSink, S: SignalSource> Game<F, S> {
    pub fn new(feedback: F, signals: S) -> Self {
        Self::with_config(GameConfig::default(), feedback, signals)
    }

    /// Reads the stored high score once.
    pub fn with_config(config: GameConfig, mut feedback: F, signals: S) -> Self {
        let high_score = feedback.read_high_score();
        Self {
            config,
            feedback,
            signals,
            difficulty: Difficulty::default(),
            score: ScoreState::with_high_score(high_score),
            phase: Phase::Idle,
            message: WELCOME_MESSAGE.to_string(),
            effects: Effects::default(),
        }
    }

    pub fn dispatch(&mut self, intent: Intent, now: f64) {
        match intent {
            Intent::SelectDifficulty(difficulty) => self.select_difficulty(difficulty),
            Intent::Start => self.start(self.difficulty, now),
            Intent::ClickSignal(signal) => self.submit_input(signal, now),
            Intent::TogglePause => self.toggle_pause(now),
            Intent::Reset => self.reset(),
        }
    }

    /// Only honoured between games.
    pub fn select_difficulty(&mut self, difficulty: Difficulty) {
        if self.is_active() {
            log::trace!("difficulty change to {} ignored mid-game", difficulty.name());
            return;
        }
        self.difficulty = difficulty;
    }

    /// Start a new game from any phase, abandoning whatever was in flight.
    pub fn start(&mut self, difficulty: Difficulty, now: f64) {
        self.difficulty = difficulty;
        self.score.reset();
        self.effects = Effects::default();
        let round = Round::first(self.signals.next_signal());
        log::info!("game started on {} difficulty", difficulty.name());
        self.begin_playback(round, now);
        self.tick(now);
    }

    pub fn submit_input(&mut self, signal: Signal, now: f64) {
        let outcome = match &mut self.phase {
            Phase::AwaitingInput { round } => round.record(signal),
            _ => {
                log::trace!("input {signal} ignored outside of the input phase");
                return;
            }
        };

        self.feedback.emit_tone(signal.frequency_hz(), CLICK_TONE_MS);
        self.feedback.emit_haptic(CLICK_HAPTIC);
        self.effects.flash = Some((signal, now + self.config.timing.click_flash_ms as f64));

        match outcome {
            InputOutcome::Mismatch => self.fail(),
            InputOutcome::Pending => {}
            InputOutcome::Complete => self.complete_round(now),
        }
    }

    /// Pause while waiting for input or between rounds; resume from pause.
    /// Refused during playback and outside a game.
    pub fn toggle_pause(&mut self, now: f64) {
        match self.take_phase() {
            Phase::AwaitingInput { round } => self.suspend(Suspended::AwaitingInput(round)),
            Phase::Intermission {
                sequence,
                next_level,
                resume_at,
            } => self.suspend(Suspended::Intermission {
                sequence,
                next_level,
                remaining_ms: (resume_at - now).max(0.0),
            }),
            Phase::Paused { suspended, message } => {
                self.message = message;
                self.phase = match suspended {
                    Suspended::AwaitingInput(round) => Phase::AwaitingInput { round },
                    Suspended::Intermission {
                        sequence,
                        next_level,
                        remaining_ms,
                    } => Phase::Intermission {
                        sequence,
                        next_level,
                        resume_at: now + remaining_ms,
                    },
                };
                log::debug!("game resumed");
            }
            other => {
                log::trace!("pause ignored");
                self.phase = other;
            }
        }
    }

    /// Back to the welcome screen. Keeps the high score and difficulty.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.score.reset();
        self.effects = Effects::default();
        self.message = WELCOME_MESSAGE.to_string();
        log::info!("game reset");
    }

    /// Fire every deadline that has elapsed by `now`.
    pub fn tick(&mut self, now: f64) {
        self.fire_effects(now);
        if let Phase::Intermission { resume_at, .. } = self.phase {
            if now >= resume_at {
                self.advance_round(resume_at);
            }
        }
        self.pump_playback(now);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase_kind(),
            level: self.level(),
            score: self.score.score,
            high_score: self.score.high_score,
            streak: self.score.streak,
            message: self.message.clone(),
            flashing_signal: self
                .effects
                .highlight
                .or(self.effects.flash.map(|(signal, _)| signal)),
            difficulty: self.difficulty,
            input_len: self.player_input().len(),
            sequence_len: self.sequence().len(),
            progress: snapshot::progress(self.player_input().len(), self.sequence().len()),
            celebrating: self.effects.celebrate_until.is_some(),
            new_record: matches!(self.phase, Phase::GameOver { new_record: true, .. }),
        }
    }

    pub fn phase_kind(&self) -> PhaseKind {
        match self.phase {
            Phase::Idle => PhaseKind::Idle,
            Phase::Demo { .. } => PhaseKind::Demo,
            Phase::AwaitingInput { .. } => PhaseKind::AwaitingInput,
            Phase::Intermission { .. } => PhaseKind::Intermission,
            Phase::Paused { .. } => PhaseKind::Paused,
            Phase::GameOver { .. } => PhaseKind::GameOver,
        }
    }

    /// 0 before the first game; during the inter-round delay this is already
    /// the upcoming level.
    pub fn level(&self) -> u32 {
        match &self.phase {
            Phase::Idle => 0,
            Phase::Demo { round, .. } | Phase::AwaitingInput { round } => round.level(),
            Phase::Intermission { next_level, .. } => *next_level,
            Phase::Paused { suspended, .. } => match suspended {
                Suspended::AwaitingInput(round) => round.level(),
                Suspended::Intermission { next_level, .. } => *next_level,
            },
            Phase::GameOver { level, .. } => *level,
        }
    }

    pub fn sequence(&self) -> &[Signal] {
        match &self.phase {
            Phase::Demo { round, .. } | Phase::AwaitingInput { round } => round.sequence(),
            Phase::Intermission { sequence, .. } => sequence,
            Phase::Paused { suspended, .. } => match suspended {
                Suspended::AwaitingInput(round) => round.sequence(),
                Suspended::Intermission { sequence, .. } => sequence,
            },
            Phase::Idle | Phase::GameOver { .. } => &[],
        }
    }

    pub fn player_input(&self) -> &[Signal] {
        match &self.phase {
            Phase::Demo { round, .. } | Phase::AwaitingInput { round } => round.input(),
            Phase::Paused {
                suspended: Suspended::AwaitingInput(round),
                ..
            } => round.input(),
            _ => &[],
        }
    }

    pub fn final_score(&self) -> Option<u32> {
        match self.phase {
            Phase::GameOver { final_score, .. } => Some(final_score),
            _ => None,
        }
    }

    pub fn score(&self) -> ScoreState {
        self.score
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn feedback_mut(&mut self) -> &mut F {
        &mut self.feedback
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.phase, Phase::Idle | Phase::GameOver { .. })
    }

    pub fn is_showing_sequence(&self) -> bool {
        matches!(self.phase, Phase::Demo { .. })
    }

    fn take_phase(&mut self) -> Phase {
        std::mem::replace(&mut self.phase, Phase::Idle)
    }

    fn suspend(&mut self, suspended: Suspended) {
        let message = std::mem::replace(&mut self.message, PAUSED_MESSAGE.to_string());
        self.phase = Phase::Paused { suspended, message };
        log::debug!("game paused");
    }

    fn begin_playback(&mut self, round: Round, at: f64) {
        self.message = format!("Level {} - watch the signal sequence...", round.level());
        self.effects.highlight = None;
        self.phase = Phase::Demo {
            round,
            playback: Playback::begin(at, self.config.timing.lead_in_ms),
        };
    }

    /// Append one fresh signal to the finished sequence and replay it.
    fn advance_round(&mut self, at: f64) {
        match self.take_phase() {
            Phase::Intermission {
                sequence,
                next_level,
                ..
            } => {
                let round = Round::extend(sequence, self.signals.next_signal());
                debug_assert_eq!(round.level(), next_level);
                self.begin_playback(round, at);
            }
            other => self.phase = other,
        }
    }

    fn pump_playback(&mut self, now: f64) {
        let speed_ms = self.difficulty.profile().playback_speed_ms;
        let events = match &mut self.phase {
            Phase::Demo { round, playback } => playback.advance(round.sequence(), speed_ms, now),
            _ => return,
        };
        for event in events {
            match event {
                PlaybackEvent::Show(signal) => {
                    self.effects.highlight = Some(signal);
                    self.feedback.emit_tone(signal.frequency_hz(), SEQUENCE_TONE_MS);
                    self.feedback.emit_haptic(SEQUENCE_HAPTIC);
                }
                PlaybackEvent::Hide => self.effects.highlight = None,
                PlaybackEvent::Finished => self.finish_playback(),
            }
        }
    }

    fn finish_playback(&mut self) {
        match self.take_phase() {
            Phase::Demo { round, .. } => {
                self.effects.highlight = None;
                self.message = YOUR_TURN_MESSAGE.to_string();
                self.phase = Phase::AwaitingInput { round };
            }
            other => self.phase = other,
        }
    }

    fn complete_round(&mut self, now: f64) {
        let round = match self.take_phase() {
            Phase::AwaitingInput { round } => round,
            other => {
                self.phase = other;
                return;
            }
        };
        let level = round.level();
        let timing = self.config.timing;
        let award = self.score.complete_round(
            level,
            self.difficulty.profile().score_multiplier,
            &self.config.scoring,
        );

        self.feedback.play(SUCCESS_CHIME[0]);
        self.effects.chime_at = Some(now + timing.chime_gap_ms as f64);
        self.feedback.emit_haptic(SUCCESS_HAPTIC);

        if self.config.scoring.is_milestone(level) {
            self.effects.celebrate_until = Some(now + timing.celebration_ms as f64);
            log::debug!("milestone reached at level {level}");
        }
        log::debug!(
            "level {level} complete: +{} (streak {}, score {})",
            award.total(),
            self.score.streak,
            self.score.score
        );

        self.message = format!("Great! Level {level} complete!");
        self.phase = Phase::Intermission {
            sequence: round.into_sequence(),
            next_level: level + 1,
            resume_at: now + timing.round_delay_ms as f64,
        };
    }

    /// Wrong signal: the game ends and the pre-game controls come back.
    fn fail(&mut self) {
        let level = self.level();
        self.feedback.play(FAILURE_TONE);
        self.feedback.emit_haptic(FAILURE_HAPTIC);
        self.score.break_streak();
        self.effects.chime_at = None;

        let final_score = self.score.score;
        let new_record = self.score.record_final();
        if new_record {
            self.feedback.write_high_score(final_score);
            self.message = format!("New record! Final score: {final_score}");
            log::info!("game over at level {level}, new record {final_score}");
        } else {
            self.message = format!("Game over! Final score: {final_score}");
            log::info!("game over at level {level}, score {final_score}");
        }
        self.phase = Phase::GameOver {
            level,
            final_score,
            new_record,
        };
    }

    fn fire_effects(&mut self, now: f64) {
        if matches!(self.effects.flash, Some((_, until)) if now >= until) {
            self.effects.flash = None;
        }
        if matches!(self.effects.chime_at, Some(at) if now >= at) {
            self.effects.chime_at = None;
            self.feedback.play(SUCCESS_CHIME[1]);
        }
        if matches!(self.effects.celebrate_until, Some(until) if now >= until) {
            self.effects.celebrate_until = None;
        }
    }
}
