//! The deck: every card of one game in board order.
//!
//! Cards live in an `im::Vector` so session snapshots share structure with
//! the live deck instead of copying it. A side index maps ids to positions;
//! it is rebuilt whenever the order changes.

use im::Vector;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use thiserror::Error;

use super::card::{Card, CardId};
use super::grid::{self, GridPosition};
use crate::core::{DeckConfig, GameRng};

/// Invalid explicit deck layout.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("deck is empty")]
    Empty,

    #[error("duplicate card id {0}")]
    DuplicateId(CardId),

    #[error("value {value} appears {count} times, expected a pair")]
    UnpairedValue { value: i32, count: usize },

    #[error("at most one special card is supported, got {0}")]
    TooManySpecials(usize),

    #[error("layout has {actual} cards, session expects {expected}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// Ordered cards of one game.
#[derive(Clone, Debug)]
pub struct Deck {
    cards: Vector<Card>,
    positions: FxHashMap<CardId, usize>,
}

impl Deck {
    /// Build the unshuffled deck described by `config`.
    ///
    /// Pair `i` gets ids `2i` and `2i + 1`; special cards follow.
    #[must_use]
    pub fn ordered(config: &DeckConfig) -> Self {
        let mut cards = Vector::new();
        for value in 0..config.pairs_count {
            let value_i32 = value as i32;
            cards.push_back(Card::pair(CardId::new((value * 2) as u32), value_i32));
            cards.push_back(Card::pair(CardId::new((value * 2 + 1) as u32), value_i32));
        }
        for k in 0..config.special_count {
            cards.push_back(Card::special(CardId::new((config.pairs_count * 2 + k) as u32)));
        }
        Self::indexed(cards)
    }

    /// Build and shuffle a fresh deck.
    #[must_use]
    pub fn shuffled(config: &DeckConfig, rng: &mut GameRng) -> Self {
        let mut deck = Self::ordered(config);
        deck.shuffle(rng);
        deck
    }

    /// Use an explicit layout (replays, fixed boards).
    ///
    /// Every non-special value must appear exactly twice and at most one
    /// card may be special, so the layout is always winnable. Flip and
    /// match flags are taken as given.
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Result<Self, DeckError> {
        let cards: Vector<Card> = cards.into_iter().collect();
        if cards.is_empty() {
            return Err(DeckError::Empty);
        }

        let mut positions = FxHashMap::default();
        let mut value_counts: FxHashMap<i32, usize> = FxHashMap::default();
        let mut specials = 0;
        for (index, card) in cards.iter().enumerate() {
            if positions.insert(card.id, index).is_some() {
                return Err(DeckError::DuplicateId(card.id));
            }
            if card.is_special {
                specials += 1;
            } else {
                *value_counts.entry(card.value).or_default() += 1;
            }
        }

        if specials > 1 {
            return Err(DeckError::TooManySpecials(specials));
        }
        let mut unpaired: Vec<(i32, usize)> = value_counts
            .into_iter()
            .filter(|&(_, count)| count != 2)
            .collect();
        unpaired.sort_unstable();
        if let Some(&(value, count)) = unpaired.first() {
            return Err(DeckError::UnpairedValue { value, count });
        }

        Ok(Self { cards, positions })
    }

    fn indexed(cards: Vector<Card>) -> Self {
        let positions = cards
            .iter()
            .enumerate()
            .map(|(index, card)| (card.id, index))
            .collect();
        Self { cards, positions }
    }

    /// Shuffle uniformly in place. Ids are unaffected.
    pub fn shuffle(&mut self, rng: &mut GameRng) {
        let mut cards: Vec<Card> = self.cards.iter().copied().collect();
        rng.shuffle(&mut cards);
        *self = Self::indexed(cards.into_iter().collect());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards in board order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Persistent handle to the cards, O(1) to clone.
    #[must_use]
    pub fn cards(&self) -> &Vector<Card> {
        &self.cards
    }

    /// Board position of a card.
    #[must_use]
    pub fn position_of(&self, id: CardId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.position_of(id).and_then(|index| self.cards.get(index))
    }

    pub fn get_mut(&mut self, id: CardId) -> Option<&mut Card> {
        let index = self.position_of(id)?;
        self.cards.get_mut(index)
    }

    #[must_use]
    pub fn at(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    /// Row and column of a card on a board `grid_size` wide.
    #[must_use]
    pub fn grid_position(&self, id: CardId, grid_size: usize) -> Option<GridPosition> {
        self.position_of(id)
            .map(|index| GridPosition::of_index(index, grid_size))
    }

    /// Ids of the cards orthogonally adjacent to `id`.
    #[must_use]
    pub fn neighbors_of(&self, id: CardId, grid_size: usize) -> SmallVec<[CardId; 4]> {
        let Some(index) = self.position_of(id) else {
            return SmallVec::new();
        };
        grid::neighbors(index, self.cards.len(), grid_size)
            .into_iter()
            .filter_map(|i| self.cards.get(i).map(|card| card.id))
            .collect()
    }

    /// True when every non-special card is matched.
    #[must_use]
    pub fn all_pairs_matched(&self) -> bool {
        self.cards
            .iter()
            .filter(|card| !card.is_special)
            .all(|card| card.is_matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(pairs_count: usize, special_count: usize) -> DeckConfig {
        DeckConfig {
            pairs_count,
            special_count,
            grid_size: 5,
        }
    }

    #[test]
    fn test_ordered_layout() {
        let deck = Deck::ordered(&config(12, 1));
        assert_eq!(deck.len(), 25);

        let first = deck.at(0).unwrap();
        let second = deck.at(1).unwrap();
        assert_eq!((first.id, first.value), (CardId::new(0), 0));
        assert_eq!((second.id, second.value), (CardId::new(1), 0));

        let special = deck.get(CardId::new(24)).unwrap();
        assert!(special.is_special);
        assert_eq!(deck.iter().filter(|c| c.is_special).count(), 1);
    }

    #[test]
    fn test_shuffle_preserves_identity() {
        let mut rng = GameRng::new(42);
        let deck = Deck::shuffled(&config(12, 1), &mut rng);
        let ordered = Deck::ordered(&config(12, 1));

        for card in ordered.iter() {
            let shuffled = deck.get(card.id).unwrap();
            assert_eq!(shuffled.value, card.value);
            assert_eq!(shuffled.is_special, card.is_special);
            assert_eq!(deck.at(deck.position_of(card.id).unwrap()), Some(shuffled));
        }
    }

    #[test]
    fn test_same_seed_same_deal() {
        let a = Deck::shuffled(&config(12, 1), &mut GameRng::new(9));
        let b = Deck::shuffled(&config(12, 1), &mut GameRng::new(9));
        let ids_a: Vec<_> = a.iter().map(|c| c.id).collect();
        let ids_b: Vec<_> = b.iter().map(|c| c.id).collect();
        assert_eq!(ids_a, ids_b);
    }

    #[test]
    fn test_from_cards_rejects_duplicates() {
        let cards = vec![Card::pair(CardId::new(0), 0), Card::pair(CardId::new(0), 0)];
        assert_eq!(
            Deck::from_cards(cards).unwrap_err(),
            DeckError::DuplicateId(CardId::new(0))
        );
        assert_eq!(Deck::from_cards(Vec::new()).unwrap_err(), DeckError::Empty);
    }

    #[test]
    fn test_from_cards_requires_exact_pairs() {
        let single = vec![
            Card::pair(CardId::new(0), 0),
            Card::pair(CardId::new(1), 1),
            Card::pair(CardId::new(2), 1),
        ];
        assert_eq!(
            Deck::from_cards(single).unwrap_err(),
            DeckError::UnpairedValue { value: 0, count: 1 }
        );

        let triple = vec![
            Card::pair(CardId::new(0), 0),
            Card::pair(CardId::new(1), 0),
            Card::pair(CardId::new(2), 1),
            Card::pair(CardId::new(3), 1),
            Card::pair(CardId::new(4), 1),
        ];
        assert_eq!(
            Deck::from_cards(triple).unwrap_err(),
            DeckError::UnpairedValue { value: 1, count: 3 }
        );
    }

    #[test]
    fn test_from_cards_allows_one_special() {
        let pair = [Card::pair(CardId::new(0), 0), Card::pair(CardId::new(1), 0)];

        let one: Vec<Card> = pair.iter().copied().chain([Card::special(CardId::new(2))]).collect();
        assert_eq!(Deck::from_cards(one).unwrap().len(), 3);

        let two: Vec<Card> = pair
            .iter()
            .copied()
            .chain([Card::special(CardId::new(2)), Card::special(CardId::new(3))])
            .collect();
        assert_eq!(
            Deck::from_cards(two).unwrap_err(),
            DeckError::TooManySpecials(2)
        );
    }

    #[test]
    fn test_neighbors_follow_current_order() {
        let deck = Deck::ordered(&config(12, 1));
        // Unshuffled, card id == position.
        let ids: Vec<u32> = deck.neighbors_of(CardId::new(12), 5).iter().map(|c| c.raw()).collect();
        assert_eq!(ids, vec![7, 17, 11, 13]);
        assert_eq!(
            deck.grid_position(CardId::new(24), 5),
            Some(GridPosition::new(4, 4))
        );
    }

    #[test]
    fn test_all_pairs_matched_ignores_special() {
        let mut deck = Deck::ordered(&config(1, 1));
        assert!(!deck.all_pairs_matched());

        deck.get_mut(CardId::new(0)).unwrap().mark_matched();
        deck.get_mut(CardId::new(1)).unwrap().mark_matched();
        assert!(deck.all_pairs_matched());
        assert!(!deck.get(CardId::new(2)).unwrap().is_matched);
    }
}
