//! Core engine types: configuration and seeded randomness.

pub mod config;
pub mod rng;

pub use config::{ConfigError, DeckConfig, SessionConfig, TimingConfig};
pub use rng::{GameRng, GameRngState};
