//! Collaborators the session reports to.
//!
//! The session never knows about scene nodes, audio sources, or storage.
//! Hosts implement these traits and hand them over at construction via
//! [`SessionHooks`]. All calls are fire-and-forget; only the result
//! recorder may fail, and its failures are logged and absorbed.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::outcome::GameOutcome;
use crate::cards::CardId;

/// Named audio cues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    Flip,
    Match,
    Special,
    Victory,
}

impl SoundCue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flip => "flip",
            Self::Match => "match",
            Self::Special => "special",
            Self::Victory => "victory",
        }
    }
}

/// Presentation layer refresh requests.
pub trait CardDisplay {
    /// A card's flipped/matched state may have changed. Re-read it.
    fn card_changed(&mut self, id: CardId);

    /// The score changed.
    fn score_changed(&mut self, _score: i64) {}
}

/// Audio playback. Delays are applied by the session before calling.
pub trait AudioCues {
    fn play_cue(&mut self, cue: SoundCue);
}

/// Failure reported by a [`ResultRecorder`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("result store unavailable: {0}")]
    Unavailable(String),

    #[error("result rejected: {0}")]
    Rejected(String),
}

/// Receives the final outcome of each finished game.
pub trait ResultRecorder {
    fn record_result(&mut self, outcome: &GameOutcome) -> Result<(), RecordError>;
}

/// Collaborators that ignore everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl CardDisplay for Silent {
    fn card_changed(&mut self, _id: CardId) {}
}

impl AudioCues for Silent {
    fn play_cue(&mut self, _cue: SoundCue) {}
}

impl ResultRecorder for Silent {
    fn record_result(&mut self, _outcome: &GameOutcome) -> Result<(), RecordError> {
        Ok(())
    }
}

/// The set of collaborators owned by a session.
pub struct SessionHooks {
    pub display: Box<dyn CardDisplay>,
    pub audio: Box<dyn AudioCues>,
    pub recorder: Box<dyn ResultRecorder>,
}

impl Default for SessionHooks {
    fn default() -> Self {
        Self::silent()
    }
}

impl std::fmt::Debug for SessionHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHooks").finish_non_exhaustive()
    }
}

impl SessionHooks {
    /// No-op collaborators for headless use.
    #[must_use]
    pub fn silent() -> Self {
        Self {
            display: Box::new(Silent),
            audio: Box::new(Silent),
            recorder: Box::new(Silent),
        }
    }

    #[must_use]
    pub fn with_display(mut self, display: impl CardDisplay + 'static) -> Self {
        self.display = Box::new(display);
        self
    }

    #[must_use]
    pub fn with_audio(mut self, audio: impl AudioCues + 'static) -> Self {
        self.audio = Box::new(audio);
        self
    }

    #[must_use]
    pub fn with_recorder(mut self, recorder: impl ResultRecorder + 'static) -> Self {
        self.recorder = Box::new(recorder);
        self
    }
}

/// Shared queue of changed card ids.
///
/// Give one clone to the session as its display and keep another to drain
/// from the presentation side after each session call.
#[derive(Clone, Debug, Default)]
pub struct ChangeLog {
    changed: Rc<RefCell<VecDeque<CardId>>>,
    score: Rc<RefCell<Option<i64>>>,
}

impl ChangeLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every pending card id, oldest first.
    pub fn drain(&self) -> Vec<CardId> {
        self.changed.borrow_mut().drain(..).collect()
    }

    /// Take the most recent score update, if any.
    pub fn take_score(&self) -> Option<i64> {
        self.score.borrow_mut().take()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changed.borrow().is_empty()
    }
}

impl CardDisplay for ChangeLog {
    fn card_changed(&mut self, id: CardId) {
        self.changed.borrow_mut().push_back(id);
    }

    fn score_changed(&mut self, score: i64) {
        *self.score.borrow_mut() = Some(score);
    }
}
