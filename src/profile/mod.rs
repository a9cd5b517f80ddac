//! Player history: statistics, experience, and achievements.
//!
//! [`SharedProfile`] plugs into a session as its result recorder so each
//! won game is folded in exactly once.

pub mod achievements;
pub mod player;

pub use achievements::{Achievement, AchievementKind};
pub use player::{GameStats, PlayerProfile, SharedProfile};
