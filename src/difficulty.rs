//! Difficulty tiers and their fixed playback / scoring profile.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Difficulty {
    #[default]
    Normal,
    Hard,
    Expert,
    Insane,
}

/// Immutable per-tier configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DifficultyProfile {
    /// Full length of one signal's presentation slot during playback.
    pub playback_speed_ms: u32,
    pub score_multiplier: f64,
}

// Faster playback, bigger multiplier as the tier goes up.
const PROFILES: [DifficultyProfile; 4] = [
    DifficultyProfile {
        playback_speed_ms: 500,
        score_multiplier: 2.0,
    },
    DifficultyProfile {
        playback_speed_ms: 300,
        score_multiplier: 3.0,
    },
    DifficultyProfile {
        playback_speed_ms: 150,
        score_multiplier: 5.0,
    },
    DifficultyProfile {
        playback_speed_ms: 100,
        score_multiplier: 8.0,
    },
];

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Expert,
        Difficulty::Insane,
    ];

    pub fn profile(self) -> DifficultyProfile {
        PROFILES[self as usize]
    }

    /// Stable key used by the DOM (`data-difficulty`) and the JS API.
    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
            Difficulty::Insane => "insane",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
            Difficulty::Expert => "Expert",
            Difficulty::Insane => "Insane",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Difficulty::Normal => "#4CAF50",
            Difficulty::Hard => "#FF9800",
            Difficulty::Expert => "#F44336",
            Difficulty::Insane => "#9C27B0",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownDifficulty(s.to_string()))
    }
}
