//! Player profile aggregated from finished games.
//!
//! The profile is plain data; hosts decide where (and whether) to store it.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::achievements::{default_achievements, Achievement, AchievementKind};
use crate::session::{GameOutcome, RecordError, ResultRecorder};

/// Aggregate statistics.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    pub total_games: u32,
    pub total_wins: u32,
    pub total_score: i64,
    pub best_score: i64,

    /// Fastest win. `None` until the first win.
    pub best_time: Option<Duration>,

    pub average_score: f64,
}

/// A player's history across games.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub player_name: String,
    pub level: u32,

    /// Experience toward the next level.
    pub experience: u64,

    pub total_play_time: Duration,
    pub stats: GameStats,
    pub achievements: Vec<Achievement>,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self::new("Player")
    }
}

impl PlayerProfile {
    #[must_use]
    pub fn new(player_name: impl Into<String>) -> Self {
        Self {
            player_name: player_name.into(),
            level: 1,
            experience: 0,
            total_play_time: Duration::ZERO,
            stats: GameStats::default(),
            achievements: default_achievements(),
        }
    }

    /// Experience needed to leave the current level.
    #[must_use]
    pub fn experience_for_next_level(&self) -> u64 {
        u64::from(self.level) * 100
    }

    /// Fold a finished game into the profile.
    ///
    /// Returns the achievements this game unlocked.
    pub fn record(&mut self, outcome: &GameOutcome) -> Vec<AchievementKind> {
        let stats = &mut self.stats;
        stats.total_games += 1;
        stats.total_score += outcome.score;
        self.total_play_time += outcome.elapsed;

        if outcome.won {
            stats.total_wins += 1;
            stats.best_score = stats.best_score.max(outcome.score);
            stats.best_time = Some(
                stats
                    .best_time
                    .map_or(outcome.elapsed, |best| best.min(outcome.elapsed)),
            );
        }
        stats.average_score = stats.total_score as f64 / f64::from(stats.total_games);

        let game_index = stats.total_games;
        let unlocked: Vec<AchievementKind> = self
            .achievements
            .iter_mut()
            .filter_map(|achievement| {
                achievement
                    .observe(outcome, game_index)
                    .then_some(achievement.kind)
            })
            .collect();
        if !unlocked.is_empty() {
            let names: Vec<&str> = unlocked.iter().map(AchievementKind::as_str).collect();
            info!(?names, "achievements unlocked");
        }

        self.gain_experience(outcome);
        unlocked
    }

    fn gain_experience(&mut self, outcome: &GameOutcome) {
        let mut gain = u64::try_from(outcome.score.max(0) / 10).unwrap_or(0);
        if outcome.won {
            gain *= 2;
        }
        self.experience += gain;

        // A single game levels up at most once.
        let needed = self.experience_for_next_level();
        if self.experience >= needed {
            self.level += 1;
            self.experience -= needed;
            info!(level = self.level, "level up");
        }
    }

    #[must_use]
    pub fn achievement(&self, kind: AchievementKind) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.kind == kind)
    }

    /// Unlock state keyed by achievement.
    #[must_use]
    pub fn unlocked(&self) -> FxHashMap<AchievementKind, bool> {
        self.achievements
            .iter()
            .map(|a| (a.kind, a.unlocked))
            .collect()
    }
}

/// Profile handle shared between the host and a session's recorder slot.
#[derive(Clone, Debug, Default)]
pub struct SharedProfile(Rc<RefCell<PlayerProfile>>);

impl SharedProfile {
    #[must_use]
    pub fn new(profile: PlayerProfile) -> Self {
        Self(Rc::new(RefCell::new(profile)))
    }

    /// Copy of the current profile.
    #[must_use]
    pub fn get(&self) -> PlayerProfile {
        self.0.borrow().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&PlayerProfile) -> R) -> R {
        f(&self.0.borrow())
    }
}

impl ResultRecorder for SharedProfile {
    fn record_result(&mut self, outcome: &GameOutcome) -> Result<(), RecordError> {
        let mut profile = self
            .0
            .try_borrow_mut()
            .map_err(|err| RecordError::Unavailable(err.to_string()))?;
        profile.record(outcome);
        Ok(())
    }
}
