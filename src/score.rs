//! Score, streak and high-score bookkeeping.

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScoringRules {
    pub base_per_level: u32,
    /// Streak (after increment) from which the streak bonus is paid.
    pub streak_threshold: u32,
    pub streak_bonus_ratio: f64,
    /// Every n-th completed level triggers the milestone celebration.
    pub milestone_interval: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            base_per_level: 10,
            streak_threshold: 3,
            streak_bonus_ratio: 0.5,
            milestone_interval: 5,
        }
    }
}

impl ScoringRules {
    pub fn is_milestone(&self, level: u32) -> bool {
        self.milestone_interval != 0 && level % self.milestone_interval == 0
    }
}

/// Award for one completed round. The base itself is not added to the score;
/// it only feeds the two bonuses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundScore {
    pub base: u32,
    pub difficulty_bonus: u32,
    pub streak_bonus: u32,
}

impl RoundScore {
    /// `streak` is the streak including the round being scored. Bonuses floor.
    pub fn compute(level: u32, multiplier: f64, streak: u32, rules: &ScoringRules) -> Self {
        let base = level.saturating_mul(rules.base_per_level);
        let difficulty_bonus = (base as f64 * multiplier).floor() as u32;
        let streak_bonus = if streak >= rules.streak_threshold {
            (base as f64 * rules.streak_bonus_ratio).floor() as u32
        } else {
            0
        };
        Self {
            base,
            difficulty_bonus,
            streak_bonus,
        }
    }

    pub fn total(&self) -> u32 {
        self.difficulty_bonus.saturating_add(self.streak_bonus)
    }
}

/// Session-wide accumulators. `high_score` is loaded from storage once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScoreState {
    pub score: u32,
    pub streak: u32,
    pub high_score: u32,
}

impl ScoreState {
    pub fn with_high_score(high_score: u32) -> Self {
        Self {
            high_score,
            ..Self::default()
        }
    }

    /// Clear score and streak for a new game; the high score survives.
    pub fn reset(&mut self) {
        self.score = 0;
        self.streak = 0;
    }

    pub fn complete_round(
        &mut self,
        level: u32,
        multiplier: f64,
        rules: &ScoringRules,
    ) -> RoundScore {
        self.streak = self.streak.saturating_add(1);
        let award = RoundScore::compute(level, multiplier, self.streak, rules);
        self.score = self.score.saturating_add(award.total());
        award
    }

    pub fn break_streak(&mut self) {
        self.streak = 0;
    }

    /// Fold the final score into the high score. Returns true on a new record
    /// (strictly greater than the stored high score).
    pub fn record_final(&mut self) -> bool {
        if self.score > self.high_score {
            self.high_score = self.score;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_two_normal_third_streak() {
        let award = RoundScore::compute(2, 2.0, 3, &ScoringRules::default());
        assert_eq!(
            award,
            RoundScore {
                base: 20,
                difficulty_bonus: 40,
                streak_bonus: 10
            }
        );
        assert_eq!(award.total(), 50);
    }

    #[test]
    fn streak_bonus_starts_at_threshold() {
        let rules = ScoringRules::default();
        assert_eq!(RoundScore::compute(4, 3.0, 2, &rules).streak_bonus, 0);
        assert_eq!(RoundScore::compute(4, 3.0, 3, &rules).streak_bonus, 20);
    }

    #[test]
    fn bonuses_floor_fractions() {
        let rules = ScoringRules {
            base_per_level: 3,
            streak_bonus_ratio: 0.5,
            ..ScoringRules::default()
        };
        // base 3: 3 * 1.5 = 4.5 -> 4, 3 * 0.5 = 1.5 -> 1
        let award = RoundScore::compute(1, 1.5, 5, &rules);
        assert_eq!(award.difficulty_bonus, 4);
        assert_eq!(award.streak_bonus, 1);
    }

    #[test]
    fn oversized_rules_saturate_instead_of_overflowing() {
        let rules = ScoringRules {
            base_per_level: u32::MAX,
            ..ScoringRules::default()
        };
        let award = RoundScore::compute(7, 8.0, 3, &rules);
        assert_eq!(award.base, u32::MAX);
        assert_eq!(award.total(), u32::MAX);

        let mut state = ScoreState {
            score: u32::MAX - 5,
            ..ScoreState::default()
        };
        state.complete_round(2, 2.0, &ScoringRules::default());
        assert_eq!(state.score, u32::MAX);
    }

    #[test]
    fn complete_round_increments_streak_once() {
        let mut state = ScoreState::default();
        let rules = ScoringRules::default();
        state.complete_round(1, 2.0, &rules);
        state.complete_round(2, 2.0, &rules);
        assert_eq!(state.streak, 2);
        assert_eq!(state.score, 20 + 40);
        let third = state.complete_round(3, 2.0, &rules);
        assert_eq!(third.total(), 60 + 15);
        assert_eq!(state.streak, 3);
    }

    #[test]
    fn record_requires_strictly_greater() {
        let mut state = ScoreState::with_high_score(100);
        state.score = 100;
        assert!(!state.record_final());
        assert_eq!(state.high_score, 100);
        state.score = 150;
        assert!(state.record_final());
        assert_eq!(state.high_score, 150);
        state.score = 10;
        assert!(!state.record_final());
        assert_eq!(state.high_score, 150);
    }

    #[test]
    fn milestones_every_fifth_level() {
        let rules = ScoringRules::default();
        assert!(!rules.is_milestone(4));
        assert!(rules.is_milestone(5));
        assert!(rules.is_milestone(10));
    }
}
