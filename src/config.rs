//! Tunable timings and scoring rules. `Default` reproduces the shipped game.

use crate::score::ScoringRules;

/// Durations (ms) of the fixed, rule-defined waits.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Timing {
    /// Pause before the first highlight of every playback.
    pub lead_in_ms: u32,
    /// Delay between a completed round and the next playback.
    pub round_delay_ms: u32,
    /// How long a pressed button stays lit.
    pub click_flash_ms: u32,
    /// Milestone banner duration.
    pub celebration_ms: u32,
    /// Offset of the second success tone.
    pub chime_gap_ms: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            lead_in_ms: 1000,
            round_delay_ms: 1500,
            click_flash_ms: 200,
            celebration_ms: 2000,
            chime_gap_ms: 100,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    pub timing: Timing,
    pub scoring: ScoringRules,
    /// localStorage key holding the high score.
    pub storage_key: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            timing: Timing::default(),
            scoring: ScoringRules::default(),
            storage_key: "alienGameHighScore".to_string(),
        }
    }
}

#[cfg(feature = "serde_json")]
impl GameConfig {
    /// Parse a (possibly partial) JSON config; absent fields keep their defaults.
    pub fn from_json(text: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
