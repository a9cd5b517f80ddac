//! Point values and score formulas.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cards::Card;

/// Point values used by the session.
///
/// Flip costs are charged on every accepted flip regardless of outcome.
/// All other values are awards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    /// Charged for every accepted flip.
    pub flip_cost: i64,

    /// Awarded for a matching pair.
    pub match_reward: i64,

    /// Extra award for the second and later match of an unbroken streak.
    pub streak_bonus: i64,

    /// Awarded the first time a special card is activated in a game.
    pub special_first_reward: i64,

    /// Awarded for every later special card activation.
    pub special_repeat_reward: i64,

    /// Awarded when a matched pair contains a special card.
    pub special_pair_bonus: i64,

    /// Time bonus at zero elapsed seconds.
    pub time_bonus_base: f64,

    /// Time bonus lost per elapsed second.
    pub time_bonus_decay_per_second: f64,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            flip_cost: 1,
            match_reward: 10,
            streak_bonus: 2,
            special_first_reward: 15,
            special_repeat_reward: 5,
            special_pair_bonus: 20,
            time_bonus_base: 50.0,
            time_bonus_decay_per_second: 0.1,
        }
    }
}

impl ScoringRules {
    /// Award for a match, given the streak length *before* this match.
    #[must_use]
    pub fn match_award(&self, prior_streak: u32) -> i64 {
        if prior_streak > 0 {
            self.match_reward + self.streak_bonus
        } else {
            self.match_reward
        }
    }

    /// Award for a solo special card activation.
    #[must_use]
    pub fn special_award(&self, already_found: bool) -> i64 {
        if already_found {
            self.special_repeat_reward
        } else {
            self.special_first_reward
        }
    }

    /// Extra award for a matched pair involving a special card.
    ///
    /// A deck with a single special card can never produce such a pair.
    #[must_use]
    pub fn pair_bonus(&self, first: &Card, second: &Card) -> i64 {
        if first.is_special || second.is_special {
            self.special_pair_bonus
        } else {
            0
        }
    }

    /// `floor(max(0, base - decay * seconds))`.
    #[must_use]
    pub fn time_bonus(&self, elapsed: Duration) -> i64 {
        let raw = self.time_bonus_base - self.time_bonus_decay_per_second * elapsed.as_secs_f64();
        raw.max(0.0).floor() as i64
    }
}
