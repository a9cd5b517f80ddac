//! What a flip did, and how a game ended.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::cards::CardId;

/// Why a flip was refused.
///
/// Refusals are not failures: the flip is ignored and nothing changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum FlipRejection {
    #[error("game is not active")]
    GameInactive,

    #[error("a resolution is pending")]
    Locked,

    #[error("two cards are already face-up")]
    TurnFull,

    #[error("unknown card {0}")]
    UnknownCard(CardId),

    #[error("{0} is already face-up")]
    AlreadyFlipped(CardId),

    #[error("{0} is already matched")]
    AlreadyMatched(CardId),
}

/// Result of [`Session::on_card_flipped`](super::Session::on_card_flipped).
#[derive(Clone, Debug, PartialEq)]
pub enum FlipOutcome {
    /// Ignored; no state changed and nothing was charged.
    Rejected(FlipRejection),

    /// First card of the turn is face-up.
    AwaitingSecond { card: CardId },

    /// The pair matched. `award` excludes the flip cost.
    Matched {
        pair: [CardId; 2],
        award: i64,
        game_over: Option<GameOutcome>,
    },

    /// The pair did not match and will be turned back.
    Mismatched { pair: [CardId; 2] },

    /// The special card resolved and revealed these neighbours.
    SpecialActivated {
        card: CardId,
        award: i64,
        revealed: SmallVec<[CardId; 4]>,
    },
}

impl FlipOutcome {
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

/// Final report of a finished game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameOutcome {
    /// Final score including the time bonus.
    pub score: i64,

    /// Session time from deal to the last match.
    pub elapsed: Duration,

    /// Always true: the game has no loss condition.
    pub won: bool,

    /// Time bonus included in `score`.
    pub time_bonus: i64,

    pub flip_count: u32,

    /// Longest unbroken run of matches.
    pub best_streak: u32,

    pub special_card_found: bool,
}

impl GameOutcome {
    #[must_use]
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}
