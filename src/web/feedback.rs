//! Browser feedback sink: Web Audio tones, `navigator.vibrate`, localStorage.
//!
//! Each backend is optional. A missing backend turns the matching call into a
//! no-op and failures are only logged.

use wasm_bindgen::JsValue;
use web_sys::{AudioContext, AudioContextState, Navigator, OscillatorType, Storage};

use crate::feedback::FeedbackSink;

const TONE_GAIN: f32 = 0.1;
const TONE_FLOOR_GAIN: f32 = 0.01;

pub struct WebFeedback {
    audio: Option<AudioContext>,
    navigator: Option<Navigator>,
    storage: Option<Storage>,
    storage_key: String,
}

impl WebFeedback {
    pub fn new(storage_key: impl Into<String>) -> Self {
        let window = web_sys::window();
        let audio = match AudioContext::new() {
            Ok(ctx) => Some(ctx),
            Err(err) => {
                log::warn!("audio unavailable: {err:?}");
                None
            }
        };
        let navigator = window.as_ref().map(|w| w.navigator());
        let storage = window
            .as_ref()
            .and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            log::warn!("localStorage unavailable; high score will not persist");
        }
        Self {
            audio,
            navigator,
            storage,
            storage_key: storage_key.into(),
        }
    }

    fn play_tone(
        &self,
        ctx: &AudioContext,
        frequency_hz: f64,
        duration_ms: u32,
    ) -> Result<(), JsValue> {
        let oscillator = ctx.create_oscillator()?;
        let gain = ctx.create_gain()?;
        oscillator.connect_with_audio_node(&gain)?;
        gain.connect_with_audio_node(&ctx.destination())?;

        let start = ctx.current_time();
        let end = start + duration_ms as f64 / 1000.0;
        oscillator.frequency().set_value_at_time(frequency_hz as f32, start)?;
        oscillator.set_type(OscillatorType::Sine);
        gain.gain().set_value_at_time(TONE_GAIN, start)?;
        gain.gain().exponential_ramp_to_value_at_time(TONE_FLOOR_GAIN, end)?;

        oscillator.start_with_when(start)?;
        oscillator.stop_with_when(end)?;
        Ok(())
    }
}

fn needs_resume(state: AudioContextState) -> bool {
    state == AudioContextState::Suspended
}

impl FeedbackSink for WebFeedback {
    fn emit_tone(&mut self, frequency_hz: f64, duration_ms: u32) {
        if let Some(ctx) = &self.audio {
            // Created before any user gesture, so autoplay rules may hold it
            // suspended until the first press.
            if needs_resume(ctx.state()) {
                if let Err(err) = ctx.resume() {
                    log::debug!("audio resume refused: {err:?}");
                }
            }
            if let Err(err) = self.play_tone(ctx, frequency_hz, duration_ms) {
                log::debug!("tone playback failed: {err:?}");
            }
        }
    }

    fn emit_haptic(&mut self, pattern_ms: &[u32]) {
        let Some(navigator) = &self.navigator else {
            return;
        };
        // Calling navigator.vibrate where it does not exist would throw.
        if !js_sys::Reflect::has(navigator, &JsValue::from_str("vibrate")).unwrap_or(false) {
            return;
        }
        let pattern: js_sys::Array = pattern_ms.iter().map(|&ms| JsValue::from(ms)).collect();
        navigator.vibrate_with_pattern(&pattern);
    }

    fn read_high_score(&mut self) -> u32 {
        self.storage
            .as_ref()
            .and_then(|s| s.get_item(&self.storage_key).ok().flatten())
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(0)
    }

    fn write_high_score(&mut self, score: u32) {
        if let Some(storage) = &self.storage {
            if let Err(err) = storage.set_item(&self.storage_key, &score.to_string()) {
                log::warn!("could not persist high score: {err:?}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_suspended_audio_is_resumed() {
        assert!(needs_resume(AudioContextState::Suspended));
        assert!(!needs_resume(AudioContextState::Running));
        assert!(!needs_resume(AudioContextState::Closed));
    }
}
