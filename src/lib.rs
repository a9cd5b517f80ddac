//! # memory-match
//!
//! Rule engine for a single-player card-matching ("memory") game.
//!
//! ## Rules
//!
//! - The deck holds `pairs_count` pairs plus an optional special card,
//!   shuffled onto a grid `grid_size` cards wide.
//! - Every accepted flip costs a point. A matching pair earns 10, and 12
//!   for the second and later match of an unbroken streak.
//! - Flipping the special card as the first card of a turn resolves it on
//!   its own (+15 the first time) and briefly reveals its orthogonal
//!   neighbours.
//! - The game is won once every pair is matched, with a time bonus of
//!   `floor(max(0, 50 - 0.1 * seconds))`.
//!
//! ## Architecture
//!
//! - **Single authority**: [`Session`] owns all card state. Views ask
//!   before animating and re-read state when notified.
//! - **Virtual clock**: Mismatch flip-back and neighbour reveals are
//!   deferred events fired by [`Session::advance`], each tagged with the
//!   deal it belongs to.
//! - **Typed collaborators**: Display, audio, and result recording are
//!   traits injected through [`SessionHooks`].
//!
//! ## Modules
//!
//! - `core`: configuration and seeded randomness
//! - `cards`: cards, deck, grid geometry
//! - `rules`: scoring and the turn state machine
//! - `session`: the session, its hooks, and deferred events
//! - `view`: per-tile presentation proxies and the board
//! - `profile`: statistics and achievements across games
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use memory_match::{CardId, FlipOutcome, Session, SessionConfig, SessionHooks};
//!
//! let config = SessionConfig::default().with_seed(7).with_deck(2, 0);
//! let mut session = Session::new(config, SessionHooks::silent()).unwrap();
//! session.start_new_game();
//!
//! session.on_card_flipped(CardId::new(0));
//! let outcome = session.on_card_flipped(CardId::new(2));
//! assert!(matches!(outcome, FlipOutcome::Mismatched { .. }));
//! assert!(session.is_locked());
//!
//! session.advance(Duration::from_millis(1000));
//! assert!(!session.is_locked());
//! assert_eq!(session.score(), -2);
//! ```

pub mod cards;
pub mod core;
pub mod profile;
pub mod rules;
pub mod session;
pub mod view;

// Re-export commonly used types
pub use crate::core::{ConfigError, DeckConfig, GameRng, GameRngState, SessionConfig, TimingConfig};

pub use crate::cards::{Card, CardId, Deck, DeckError, GridPosition, SPECIAL_VALUE};

pub use crate::rules::{GameStatus, ScoringRules, TurnPhase};

pub use crate::session::{
    AudioCues, CardDisplay, ChangeLog, FlipOutcome, FlipRejection, GameOutcome, RecordError,
    ResultRecorder, Session, SessionHooks, SessionSnapshot, SoundCue,
};

pub use crate::view::{Board, CardFace, CardView, ClickOutcome, ClickRefusal};

pub use crate::profile::{AchievementKind, PlayerProfile, SharedProfile};
