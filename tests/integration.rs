// Integration tests (native) for the `signal-decoder` crate.
// These drive the public state machine with a recording feedback sink and a
// scripted signal source, stepping the clock by hand.

use signal_decoder::feedback::{
    CLICK_TONE_MS, FAILURE_HAPTIC, FAILURE_TONE, FeedbackEvent, SEQUENCE_HAPTIC, SEQUENCE_TONE_MS,
    SUCCESS_CHIME, SUCCESS_HAPTIC, Tone,
};
use signal_decoder::game::{PAUSED_MESSAGE, WELCOME_MESSAGE, YOUR_TURN_MESSAGE};
use signal_decoder::{
    Difficulty, FeedbackSink, Game, GameConfig, Intent, PhaseKind, Recorder, ScriptedSignals,
    Signal, SignalSource,
};

fn game(high_score: u32, script: &[Signal]) -> Game<Recorder, ScriptedSignals> {
    Game::new(
        Recorder::with_high_score(high_score),
        ScriptedSignals::new(script.to_vec()),
    )
}

/// Step the clock in 5ms ticks until the game waits for input.
fn await_input<F: FeedbackSink, S: SignalSource>(g: &mut Game<F, S>, mut now: f64) -> f64 {
    for _ in 0..100_000 {
        if g.phase_kind() == PhaseKind::AwaitingInput {
            return now;
        }
        now += 5.0;
        g.tick(now);
    }
    panic!("game never reached the input phase (stuck in {:?})", g.phase_kind());
}

fn repeat_sequence<F: FeedbackSink, S: SignalSource>(g: &mut Game<F, S>, now: f64) {
    for signal in g.sequence().to_vec() {
        g.submit_input(signal, now);
    }
}

fn wrong_for(signal: Signal) -> Signal {
    if signal == Signal::Red {
        Signal::Blue
    } else {
        Signal::Red
    }
}

#[test]
fn first_round_on_normal_scores_twenty() {
    let mut g = game(0, &[Signal::Red, Signal::Green]);
    g.start(Difficulty::Normal, 0.0);
    assert_eq!(g.phase_kind(), PhaseKind::Demo);
    assert_eq!(g.sequence(), &[Signal::Red]);
    assert_eq!(g.level(), 1);

    let now = await_input(&mut g, 0.0);
    assert_eq!(g.message(), YOUR_TURN_MESSAGE);
    g.submit_input(Signal::Red, now);

    let snap = g.snapshot();
    assert_eq!(snap.score, 20);
    assert_eq!(snap.streak, 1);
    assert_eq!(snap.level, 2);
    assert_eq!(snap.phase, PhaseKind::Intermission);
    assert_eq!(snap.input_len, 0);
    assert_eq!(snap.message, "Great! Level 1 complete!");

    // Still the old sequence until the 1500ms delay runs out.
    g.tick(now + 1_499.0);
    assert_eq!(g.sequence(), &[Signal::Red]);
    g.tick(now + 1_500.0);
    assert_eq!(g.phase_kind(), PhaseKind::Demo);
    assert_eq!(g.sequence(), &[Signal::Red, Signal::Green]);
}

#[test]
fn wrong_signal_beats_high_score() {
    // Expert: level 1 -> 50, level 2 -> 100, total 150.
    let mut g = game(100, &[Signal::Red]);
    g.start(Difficulty::Expert, 0.0);
    let mut now = await_input(&mut g, 0.0);
    repeat_sequence(&mut g, now);
    now = await_input(&mut g, now);
    repeat_sequence(&mut g, now);
    assert_eq!(g.score().score, 150);

    now = await_input(&mut g, now);
    g.submit_input(Signal::Blue, now);

    let snap = g.snapshot();
    assert_eq!(snap.phase, PhaseKind::GameOver);
    assert!(!snap.game_active());
    assert!(snap.new_record);
    assert_eq!(snap.high_score, 150);
    assert_eq!(snap.streak, 0);
    assert_eq!(snap.message, "New record! Final score: 150");
    assert_eq!(g.final_score(), Some(150));

    let rec = g.feedback();
    assert_eq!(rec.stored_high_score, 150);
    assert_eq!(rec.high_score_writes(), vec![150]);
    assert_eq!(rec.tones().last(), Some(&FAILURE_TONE));
    assert_eq!(rec.haptics().last().copied(), Some(FAILURE_HAPTIC));
}

#[test]
fn ordinary_game_over_keeps_stored_record() {
    let mut g = game(1_000, &[Signal::Yellow]);
    g.start(Difficulty::Normal, 0.0);
    let now = await_input(&mut g, 0.0);
    repeat_sequence(&mut g, now);
    let now = await_input(&mut g, now);
    g.submit_input(Signal::Red, now);

    assert_eq!(g.phase_kind(), PhaseKind::GameOver);
    assert_eq!(g.message(), "Game over! Final score: 20");
    assert_eq!(g.score().high_score, 1_000);
    assert!(g.feedback().high_score_writes().is_empty());
    assert!(!g.snapshot().new_record);
}

#[test]
fn equal_score_is_not_a_record() {
    let mut g = game(20, &[Signal::Blue]);
    g.start(Difficulty::Normal, 0.0);
    let now = await_input(&mut g, 0.0);
    repeat_sequence(&mut g, now);
    let now = await_input(&mut g, now);
    g.submit_input(Signal::Green, now);
    assert_eq!(g.score().high_score, 20);
    assert!(g.feedback().high_score_writes().is_empty());
}

#[test]
fn score_progression_with_streak_bonus() {
    let mut g = game(0, &[Signal::Green, Signal::Blue, Signal::Yellow]);
    g.start(Difficulty::Normal, 0.0);
    let mut now = 0.0;
    let mut scores = Vec::new();
    for _ in 0..3 {
        now = await_input(&mut g, now);
        repeat_sequence(&mut g, now);
        scores.push(g.score().score);
    }
    // 20, +40, +60 +15 (third perfect round earns the streak bonus)
    assert_eq!(scores, vec![20, 60, 135]);
    assert_eq!(g.score().streak, 3);
}

#[test]
fn fails_at_first_divergent_input() {
    let mut g = game(0, &[Signal::Red, Signal::Green, Signal::Blue]);
    g.start(Difficulty::Hard, 0.0);
    let mut now = 0.0;
    for _ in 0..2 {
        now = await_input(&mut g, now);
        repeat_sequence(&mut g, now);
    }
    now = await_input(&mut g, now);
    assert_eq!(g.sequence(), &[Signal::Red, Signal::Green, Signal::Blue]);

    g.submit_input(Signal::Red, now);
    assert_eq!(g.phase_kind(), PhaseKind::AwaitingInput);
    assert_eq!(g.player_input(), &[Signal::Red]);
    assert_eq!(g.snapshot().progress, 1.0 / 3.0);

    g.submit_input(Signal::Yellow, now);
    assert_eq!(g.phase_kind(), PhaseKind::GameOver);
}

#[test]
fn pause_and_resume_leave_round_untouched() {
    let mut g = game(0, &[Signal::Yellow, Signal::Red]);
    g.start(Difficulty::Normal, 0.0);
    let mut now = await_input(&mut g, 0.0);
    repeat_sequence(&mut g, now);
    now = await_input(&mut g, now);
    g.submit_input(Signal::Yellow, now);

    let before = (g.sequence().to_vec(), g.player_input().to_vec(), g.level(), g.score());
    g.dispatch(Intent::TogglePause, now + 10.0);
    assert_eq!(g.phase_kind(), PhaseKind::Paused);
    assert_eq!(g.message(), PAUSED_MESSAGE);

    // Input is refused while paused.
    g.submit_input(Signal::Red, now + 20.0);
    g.tick(now + 60_000.0);

    g.dispatch(Intent::TogglePause, now + 60_000.0);
    assert_eq!(g.phase_kind(), PhaseKind::AwaitingInput);
    assert_eq!(g.message(), YOUR_TURN_MESSAGE);
    let after = (g.sequence().to_vec(), g.player_input().to_vec(), g.level(), g.score());
    assert_eq!(before, after);

    g.submit_input(Signal::Red, now + 60_010.0);
    assert_eq!(g.phase_kind(), PhaseKind::Intermission);
}

#[test]
fn playback_emits_tone_and_vibration_per_signal() {
    let mut g = game(0, &[Signal::Blue, Signal::Yellow]);
    g.start(Difficulty::Insane, 0.0);
    let now = await_input(&mut g, 0.0);
    repeat_sequence(&mut g, now);
    // Let the second chime fire before recording the next playback.
    g.tick(now + 100.0);
    g.feedback_mut().clear();

    let _ = await_input(&mut g, now + 100.0);
    let rec = g.feedback();
    let freqs: Vec<f64> = rec.tones().iter().map(|t| t.frequency_hz).collect();
    assert_eq!(
        freqs,
        vec![Signal::Blue.frequency_hz(), Signal::Yellow.frequency_hz()]
    );
    assert!(rec.tones().iter().all(|t| t.duration_ms == SEQUENCE_TONE_MS));
    assert_eq!(rec.haptics(), vec![SEQUENCE_HAPTIC, SEQUENCE_HAPTIC]);
}

#[test]
fn stalled_frame_shows_one_signal_at_a_time() {
    let mut g = game(0, &[Signal::Red, Signal::Green, Signal::Blue]);
    g.start(Difficulty::Normal, 0.0);
    let mut now = 0.0;
    for _ in 0..2 {
        now = await_input(&mut g, now);
        repeat_sequence(&mut g, now);
    }
    g.tick(now + 1_500.0);
    assert_eq!(g.phase_kind(), PhaseKind::Demo);
    assert_eq!(g.sequence().len(), 3);
    g.feedback_mut().clear();

    // One frame arrives long after the whole playback should have ended.
    let stalled = now + 6_500.0;
    g.tick(stalled);
    assert_eq!(g.feedback().tones().len(), 1);
    assert_eq!(g.phase_kind(), PhaseKind::Demo);
    assert_eq!(g.snapshot().flashing_signal, Some(Signal::Red));
    g.tick(stalled + 249.0);
    assert_eq!(g.snapshot().flashing_signal, Some(Signal::Red));
    g.tick(stalled + 250.0);
    assert_eq!(g.snapshot().flashing_signal, None);

    let _ = await_input(&mut g, stalled + 250.0);
    assert_eq!(g.feedback().tones().len(), 3);
}

#[test]
fn round_completion_feedback_order() {
    let mut g = game(0, &[Signal::Green]);
    g.start(Difficulty::Normal, 0.0);
    let now = await_input(&mut g, 0.0);
    g.feedback_mut().clear();
    g.submit_input(Signal::Green, now);
    g.tick(now + 100.0);

    let events = &g.feedback().events;
    let click = Tone {
        frequency_hz: Signal::Green.frequency_hz(),
        duration_ms: CLICK_TONE_MS,
    };
    assert_eq!(events[0], FeedbackEvent::Tone(click));
    assert_eq!(events[2], FeedbackEvent::Tone(SUCCESS_CHIME[0]));
    assert_eq!(events[3], FeedbackEvent::Haptic(SUCCESS_HAPTIC.to_vec()));
    assert_eq!(events[4], FeedbackEvent::Tone(SUCCESS_CHIME[1]));
}

#[test]
fn milestone_celebration_on_fifth_level() {
    let mut g = game(0, &[Signal::Red]);
    g.start(Difficulty::Insane, 0.0);
    let mut now = 0.0;
    for level in 1..=5 {
        now = await_input(&mut g, now);
        assert_eq!(g.level(), level);
        repeat_sequence(&mut g, now);
        assert_eq!(g.snapshot().celebrating, level == 5, "level {level}");
    }
    g.tick(now + 1_999.0);
    assert!(g.snapshot().celebrating);
    g.tick(now + 2_000.0);
    assert!(!g.snapshot().celebrating);
}

#[test]
fn start_after_game_over_begins_fresh() {
    let mut g = game(0, &[Signal::Red, Signal::Blue, Signal::Green]);
    g.start(Difficulty::Normal, 0.0);
    let now = await_input(&mut g, 0.0);
    repeat_sequence(&mut g, now);
    let now = await_input(&mut g, now);
    let wrong = wrong_for(g.sequence()[0]);
    g.submit_input(wrong, now);
    assert_eq!(g.phase_kind(), PhaseKind::GameOver);
    assert_eq!(g.score().high_score, 20);

    g.dispatch(Intent::Start, now + 10.0);
    let snap = g.snapshot();
    assert_eq!(snap.phase, PhaseKind::Demo);
    assert_eq!(snap.level, 1);
    assert_eq!(snap.score, 0);
    assert_eq!(snap.streak, 0);
    assert_eq!(snap.high_score, 20);
    assert_eq!(g.sequence().len(), 1);
}

#[test]
fn reset_during_intermission_cancels_next_round() {
    let mut g = game(0, &[Signal::Red]);
    g.start(Difficulty::Normal, 0.0);
    let now = await_input(&mut g, 0.0);
    repeat_sequence(&mut g, now);
    assert_eq!(g.phase_kind(), PhaseKind::Intermission);

    g.dispatch(Intent::Reset, now + 10.0);
    g.tick(now + 10_000.0);
    let snap = g.snapshot();
    assert_eq!(snap.phase, PhaseKind::Idle);
    assert_eq!(snap.level, 0);
    assert_eq!(snap.score, 0);
    assert_eq!(snap.high_score, 0);
    assert_eq!(snap.message, WELCOME_MESSAGE);
    assert!(g.sequence().is_empty());
}

#[test]
fn invalid_calls_are_no_ops() {
    let mut g = game(5, &[Signal::Red]);
    g.submit_input(Signal::Red, 0.0);
    g.toggle_pause(0.0);
    g.tick(10_000.0);
    assert_eq!(g.phase_kind(), PhaseKind::Idle);
    assert!(g.feedback().events.is_empty());

    g.start(Difficulty::Normal, 0.0);
    let now = await_input(&mut g, 0.0);
    g.submit_input(Signal::Blue, now);
    assert_eq!(g.phase_kind(), PhaseKind::GameOver);
    g.toggle_pause(now + 1.0);
    g.submit_input(Signal::Red, now + 2.0);
    assert_eq!(g.phase_kind(), PhaseKind::GameOver);
}

#[test]
fn zero_lead_in_shows_first_signal_immediately() {
    let mut config = GameConfig::default();
    config.timing.lead_in_ms = 0;
    let mut g = Game::with_config(
        config,
        Recorder::default(),
        ScriptedSignals::new(vec![Signal::Green]),
    );
    g.start(Difficulty::Normal, 0.0);
    assert_eq!(g.snapshot().flashing_signal, Some(Signal::Green));
    g.tick(250.0);
    assert_eq!(g.snapshot().flashing_signal, None);
    g.tick(375.0);
    assert_eq!(g.phase_kind(), PhaseKind::AwaitingInput);
}
