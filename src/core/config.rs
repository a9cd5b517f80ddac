//! Session configuration types.
//!
//! Hosts configure a session at construction by providing:
//! - `DeckConfig`: How many pairs and special cards, and the grid width
//! - `TimingConfig`: Delays for deferred resolution and audio cues
//! - `ScoringRules`: Point values (see [`crate::rules::scoring`])
//! - `SessionConfig`: Combines all configuration plus an optional seed
//!
//! Every type deserializes with defaults matching the shipped game, so a
//! partial JSON document only needs to name what it overrides.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rules::ScoringRules;

/// Invalid configuration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("deck needs at least one pair")]
    NoPairs,

    #[error("at most one special card is supported, got {0}")]
    TooManySpecials(usize),

    #[error("grid width must be at least 1")]
    ZeroGridSize,
}

/// Deck composition and board geometry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Number of matching pairs.
    pub pairs_count: usize,

    /// Number of special cards (0 or 1).
    pub special_count: usize,

    /// Cards per board row.
    pub grid_size: usize,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            pairs_count: 12,
            special_count: 1,
            grid_size: 5,
        }
    }
}

impl DeckConfig {
    /// Total number of cards in a deck built from this config.
    #[must_use]
    pub fn card_count(&self) -> usize {
        2 * self.pairs_count + self.special_count
    }

    /// Check the composition is playable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pairs_count == 0 {
            return Err(ConfigError::NoPairs);
        }
        if self.special_count > 1 {
            return Err(ConfigError::TooManySpecials(self.special_count));
        }
        if self.grid_size == 0 {
            return Err(ConfigError::ZeroGridSize);
        }
        Ok(())
    }
}

/// Delays applied by the session, in milliseconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// How long a mismatched pair stays face-up.
    pub mismatch_delay_ms: u64,

    /// How long neighbours revealed by the special card stay face-up.
    pub special_reveal_delay_ms: u64,

    /// Delay before the match cue plays.
    pub match_cue_delay_ms: u64,

    /// Delay before the victory cue plays.
    pub victory_cue_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            mismatch_delay_ms: 1000,
            special_reveal_delay_ms: 2000,
            match_cue_delay_ms: 500,
            victory_cue_delay_ms: 1500,
        }
    }
}

impl TimingConfig {
    #[must_use]
    pub fn mismatch_delay(&self) -> Duration {
        Duration::from_millis(self.mismatch_delay_ms)
    }

    #[must_use]
    pub fn special_reveal_delay(&self) -> Duration {
        Duration::from_millis(self.special_reveal_delay_ms)
    }

    #[must_use]
    pub fn match_cue_delay(&self) -> Duration {
        Duration::from_millis(self.match_cue_delay_ms)
    }

    #[must_use]
    pub fn victory_cue_delay(&self) -> Duration {
        Duration::from_millis(self.victory_cue_delay_ms)
    }
}

/// Complete session configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub deck: DeckConfig,
    pub timing: TimingConfig,
    pub scoring: ScoringRules,

    /// Shuffle seed. `None` draws one from entropy when the session is built.
    pub seed: Option<u64>,
}

impl SessionConfig {
    /// Use a fixed shuffle seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the deck composition.
    #[must_use]
    pub fn with_deck(mut self, pairs_count: usize, special_count: usize) -> Self {
        self.deck.pairs_count = pairs_count;
        self.deck.special_count = special_count;
        self
    }

    /// Set the number of cards per row.
    #[must_use]
    pub fn with_grid_size(mut self, grid_size: usize) -> Self {
        self.deck.grid_size = grid_size;
        self
    }

    /// Replace the timing configuration.
    #[must_use]
    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    /// Replace the scoring rules.
    #[must_use]
    pub fn with_scoring(mut self, scoring: ScoringRules) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.deck.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.deck.pairs_count, 12);
        assert_eq!(config.deck.special_count, 1);
        assert_eq!(config.deck.grid_size, 5);
        assert_eq!(config.deck.card_count(), 25);
        assert_eq!(config.timing.mismatch_delay(), Duration::from_secs(1));
        assert_eq!(config.timing.special_reveal_delay(), Duration::from_secs(2));
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = SessionConfig::default()
            .with_seed(123)
            .with_deck(2, 0)
            .with_grid_size(2);

        assert_eq!(config.seed, Some(123));
        assert_eq!(config.deck.card_count(), 4);
        assert_eq!(config.deck.grid_size, 2);
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            SessionConfig::default().with_deck(0, 1).validate(),
            Err(ConfigError::NoPairs)
        );
        assert_eq!(
            SessionConfig::default().with_deck(4, 2).validate(),
            Err(ConfigError::TooManySpecials(2))
        );
        assert_eq!(
            SessionConfig::default().with_grid_size(0).validate(),
            Err(ConfigError::ZeroGridSize)
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"deck": {"pairs_count": 3}, "seed": 9}"#).unwrap();

        assert_eq!(config.deck.pairs_count, 3);
        assert_eq!(config.deck.special_count, 1);
        assert_eq!(config.timing, TimingConfig::default());
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_serialization() {
        let config = SessionConfig::default().with_seed(5);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: SessionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
