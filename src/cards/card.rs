//! Card identity and per-card state.

use serde::{Deserialize, Serialize};

/// Pairing value carried by special cards. No pair ever uses it.
pub const SPECIAL_VALUE: i32 = -1;

/// Stable card identity, assigned at deck construction.
///
/// Identity is independent of where the card lands after shuffling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// One tile of the deck.
///
/// ## Invariants
///
/// - A card can be flipped by the player iff `!is_flipped && !is_matched`.
/// - A matched card is face-up and stays that way until the next game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,

    /// Pairing key. Two cards with equal values and different ids match.
    pub value: i32,

    pub is_special: bool,
    pub is_flipped: bool,
    pub is_matched: bool,
}

impl Card {
    /// A face-down member of pair `value`.
    #[must_use]
    pub fn pair(id: CardId, value: i32) -> Self {
        Self {
            id,
            value,
            is_special: false,
            is_flipped: false,
            is_matched: false,
        }
    }

    /// A face-down special card.
    #[must_use]
    pub fn special(id: CardId) -> Self {
        Self {
            id,
            value: SPECIAL_VALUE,
            is_special: true,
            is_flipped: false,
            is_matched: false,
        }
    }

    /// Can the player flip this card (ignoring session-wide locks)?
    #[must_use]
    pub fn is_flippable(&self) -> bool {
        !self.is_flipped && !self.is_matched
    }

    /// Do these two cards form a pair?
    #[must_use]
    pub fn matches(&self, other: &Card) -> bool {
        self.value == other.value && self.id != other.id
    }

    /// Resolve permanently. Matched cards are always face-up.
    pub fn mark_matched(&mut self) {
        self.is_flipped = true;
        self.is_matched = true;
    }
}
