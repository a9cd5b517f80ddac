//! Session lifecycle and per-turn state machines.
//!
//! ```text
//!  NotStarted ──start──▶ Active ──all pairs matched──▶ GameOver
//!                          │ ▲
//!                          ▼ │
//!   Idle ──flip──▶ AwaitingSecond ──flip, match──▶ Idle
//!    │                  │
//!    │                  └──flip, mismatch──▶ Resolving ──timer──▶ Idle
//!    │
//!    └──flip special──▶ SpecialResolving ──timer or nothing revealed──▶ Idle
//! ```
//!
//! The lock is not a separate flag: a session is locked exactly while its
//! turn phase is one of the two resolving states.

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use crate::cards::CardId;

/// Lifecycle of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameStatus {
    /// Constructed, no deck dealt yet.
    #[default]
    NotStarted,
    /// Accepting flips.
    Active,
    /// Every pair matched. Terminal until the next `start_new_game`.
    GameOver,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Active => "active",
            Self::GameOver => "game_over",
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Where the current turn stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TurnPhase {
    /// No unresolved card is face-up.
    #[default]
    Idle,
    /// One card is face-up, waiting for its partner.
    AwaitingSecond { first: CardId },
    /// A mismatched pair is waiting to be turned back.
    Resolving,
    /// The special card's neighbours are temporarily revealed.
    SpecialResolving { special: CardId },
}

impl TurnPhase {
    /// Whether new flips are blocked by a pending resolution.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Resolving | Self::SpecialResolving { .. })
    }

    /// Cards flipped this turn and not yet resolved.
    #[must_use]
    pub fn flipped_cards(&self) -> SmallVec<[CardId; 2]> {
        match *self {
            Self::AwaitingSecond { first } => smallvec![first],
            Self::SpecialResolving { special } => smallvec![special],
            Self::Idle | Self::Resolving => SmallVec::new(),
        }
    }
}
