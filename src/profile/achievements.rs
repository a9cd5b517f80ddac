//! Achievements unlocked by finished games.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::session::GameOutcome;

/// Known achievements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AchievementKind {
    /// Win a game.
    FirstWin,
    /// Score at least 100 in one game.
    Score100,
    /// Win within three minutes.
    SpeedDemon,
    /// Match five pairs in a row without a miss.
    PerfectMemory,
}

impl AchievementKind {
    pub const ALL: [Self; 4] = [
        Self::FirstWin,
        Self::Score100,
        Self::SpeedDemon,
        Self::PerfectMemory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstWin => "first_win",
            Self::Score100 => "score_100",
            Self::SpeedDemon => "speed_demon",
            Self::PerfectMemory => "perfect_memory",
        }
    }

    /// Target value the tracked progress is compared against.
    #[must_use]
    pub fn target(&self) -> f64 {
        match self {
            Self::FirstWin => 1.0,
            Self::Score100 => 100.0,
            Self::SpeedDemon => SPEED_DEMON_LIMIT.as_secs_f64(),
            Self::PerfectMemory => 5.0,
        }
    }
}

const SPEED_DEMON_LIMIT: Duration = Duration::from_secs(180);

/// Progress toward one achievement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub kind: AchievementKind,
    pub unlocked: bool,

    /// Game index (1-based) that unlocked it.
    pub unlocked_in_game: Option<u32>,

    /// Best value so far. For `SpeedDemon` lower is better and `None`
    /// means no win yet.
    pub progress: Option<f64>,
}

impl Achievement {
    #[must_use]
    pub fn new(kind: AchievementKind) -> Self {
        Self {
            kind,
            unlocked: false,
            unlocked_in_game: None,
            progress: None,
        }
    }

    /// Fold in a finished game. Returns true if this unlocked it.
    pub fn observe(&mut self, outcome: &GameOutcome, game_index: u32) -> bool {
        if self.unlocked {
            return false;
        }

        let reached = match self.kind {
            AchievementKind::FirstWin => outcome.won,
            AchievementKind::Score100 => {
                self.raise_progress(outcome.score as f64);
                outcome.score >= 100
            }
            AchievementKind::SpeedDemon => {
                if !outcome.won {
                    return false;
                }
                let secs = outcome.elapsed_seconds();
                self.progress = Some(self.progress.map_or(secs, |best| best.min(secs)));
                outcome.elapsed <= SPEED_DEMON_LIMIT
            }
            AchievementKind::PerfectMemory => {
                self.raise_progress(f64::from(outcome.best_streak));
                f64::from(outcome.best_streak) >= self.kind.target()
            }
        };

        if reached {
            self.unlocked = true;
            self.unlocked_in_game = Some(game_index);
        }
        reached
    }

    fn raise_progress(&mut self, value: f64) {
        self.progress = Some(self.progress.map_or(value, |best| best.max(value)));
    }
}

/// The default achievement list for a new profile.
#[must_use]
pub fn default_achievements() -> Vec<Achievement> {
    AchievementKind::ALL.into_iter().map(Achievement::new).collect()
}
