//! Signal Decoder core crate.
//!
//! A "repeat the growing sequence" memory game. The rules live in [`game`]
//! and run natively (tests) or in the browser; [`web`] mounts the board into
//! the page and wires audio, vibration and localStorage feedback.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod difficulty;
pub mod error;
pub mod feedback;
pub mod game;
pub mod score;
pub mod signal;
pub mod web;

pub use config::{GameConfig, Timing};
pub use difficulty::{Difficulty, DifficultyProfile};
pub use error::{Error, Result};
pub use feedback::{FeedbackSink, Recorder, Silent};
pub use game::{Game, Intent, PhaseKind, Snapshot};
pub use score::{RoundScore, ScoreState, ScoringRules};
pub use signal::{RngSignals, ScriptedSignals, Signal, SignalSource};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    web::init_logging(log::LevelFilter::Info);
}

// -----------------------------------------------------------------------------
// JS entrypoints
// -----------------------------------------------------------------------------

/// Mount the board with the default rules and start the frame loop.
#[wasm_bindgen]
pub fn start_game() -> std::result::Result<(), JsValue> {
    web::mount(GameConfig::default())?;
    Ok(())
}

/// Mount the board with a JSON config (missing fields keep their defaults).
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_game_with_config(config_json: &str) -> std::result::Result<(), JsValue> {
    web::mount(GameConfig::from_json(config_json)?)?;
    Ok(())
}

#[wasm_bindgen]
pub fn select_difficulty(name: &str) -> std::result::Result<(), JsValue> {
    let difficulty: Difficulty = name.parse()?;
    web::dispatch_intent(Intent::SelectDifficulty(difficulty))?;
    Ok(())
}

#[wasm_bindgen]
pub fn start_round() -> std::result::Result<(), JsValue> {
    web::dispatch_intent(Intent::Start)?;
    Ok(())
}

#[wasm_bindgen]
pub fn click_signal(name: &str) -> std::result::Result<(), JsValue> {
    let signal: Signal = name.parse()?;
    web::dispatch_intent(Intent::ClickSignal(signal))?;
    Ok(())
}

#[wasm_bindgen]
pub fn toggle_pause() -> std::result::Result<(), JsValue> {
    web::dispatch_intent(Intent::TogglePause)?;
    Ok(())
}

#[wasm_bindgen]
pub fn reset_game() -> std::result::Result<(), JsValue> {
    web::dispatch_intent(Intent::Reset)?;
    Ok(())
}

/// Current presenter snapshot as JSON, or `None` before `start_game()`.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn snapshot_json() -> Option<String> {
    web::snapshot().and_then(|snap| serde_json::to_string(&snap).ok())
}

/// Milliseconds from `performance.now()`, 0 outside a browser.
pub(crate) fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
