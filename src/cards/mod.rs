//! Cards, the deck, and board geometry.
//!
//! - `card`: `CardId` and per-card flip/match state
//! - `deck`: building, shuffling, and indexing the cards of one game
//! - `grid`: row/column layout and orthogonal neighbours

pub mod card;
pub mod deck;
pub mod grid;

pub use card::{Card, CardId, SPECIAL_VALUE};
pub use deck::{Deck, DeckError};
pub use grid::GridPosition;
