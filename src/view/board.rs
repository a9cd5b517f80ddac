//! The grid of card views for one session.
//!
//! The board owns the reading end of a [`ChangeLog`] whose writing end was
//! given to the session as its display. After every call into the session
//! it drains the log and refreshes only the views whose cards changed.

use std::time::Duration;

use tracing::{debug, error};

use super::card_view::{CardView, ClickOutcome};
use crate::cards::GridPosition;
use crate::session::{ChangeLog, Session};

/// Card views in board order.
#[derive(Debug)]
pub struct Board {
    views: Vec<CardView>,
    changes: ChangeLog,
    face_count: usize,
    grid_size: usize,
    generation: u64,
    score: i64,
}

impl Board {
    /// Lay out one view per card of the session's current deck.
    ///
    /// A board without face images still works; face-up cards show
    /// [`CardFace::Unavailable`](super::CardFace::Unavailable).
    pub fn new(session: &Session, changes: ChangeLog, face_count: usize) -> Self {
        if face_count == 0 {
            error!("no card face images configured; face-up cards cannot be drawn");
        }

        let mut board = Self {
            views: Vec::new(),
            changes,
            face_count,
            grid_size: session.config().deck.grid_size,
            generation: 0,
            score: session.score(),
        };
        board.rebuild(session);
        board
    }

    /// Recreate every view from the session's deck.
    pub fn rebuild(&mut self, session: &Session) {
        self.views = session
            .cards()
            .map(|card| CardView::new(*card, self.face_count))
            .collect();
        self.generation = session.generation();
        self.score = session.score();
        // Changes from before the rebuild are already reflected.
        self.changes.drain();
        self.changes.take_score();
    }

    /// Click the tile at board position `index`.
    ///
    /// Returns `None` when no tile exists there.
    pub fn click(&mut self, index: usize, session: &mut Session) -> Option<ClickOutcome> {
        let outcome = self.views.get_mut(index)?.on_clicked(session);
        self.sync(session);
        Some(outcome)
    }

    /// Advance the session clock and every animation.
    pub fn advance(&mut self, dt: Duration, session: &mut Session) {
        session.advance(dt);
        for view in &mut self.views {
            view.advance(dt);
        }
        self.sync(session);
    }

    /// Apply pending change notifications.
    pub fn sync(&mut self, session: &Session) {
        if session.generation() != self.generation {
            debug!(generation = session.generation(), "new deal, rebuilding board");
            self.rebuild(session);
            return;
        }

        for id in self.changes.drain() {
            let Some(card) = session.card(id) else {
                continue;
            };
            if let Some(view) = session
                .position_of(id)
                .and_then(|index| self.views.get_mut(index))
            {
                view.update_card_display(card);
            }
        }

        if let Some(score) = self.changes.take_score() {
            self.score = score;
        }
    }

    #[must_use]
    pub fn views(&self) -> &[CardView] {
        &self.views
    }

    #[must_use]
    pub fn view(&self, index: usize) -> Option<&CardView> {
        self.views.get(index)
    }

    /// Row and column of board position `index`.
    #[must_use]
    pub fn position(&self, index: usize) -> GridPosition {
        GridPosition::of_index(index, self.grid_size)
    }

    /// Last score reported by the session.
    #[must_use]
    pub fn score(&self) -> i64 {
        self.score
    }

    /// Whether any tile is mid-animation.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.views.iter().any(CardView::is_animating)
    }
}
