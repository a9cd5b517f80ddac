//! Game rules that do not depend on session plumbing.
//!
//! - `scoring`: point values and the end-of-game time bonus
//! - `phase`: lifecycle and per-turn state machines
//!
//! The session in [`crate::session`] applies these; nothing here mutates
//! cards directly.

pub mod phase;
pub mod scoring;

pub use phase::{GameStatus, TurnPhase};
pub use scoring::ScoringRules;
