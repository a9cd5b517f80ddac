//! Per-tile presentation proxy.
//!
//! A `CardView` mirrors one card of the session and guards its own flip
//! animation. Input passes two gates before reaching the session: the local
//! one (not animating, cached card face-down) and the session's
//! [`Session::check_flip`]. The session stays authoritative; the view only
//! re-reads card state when told it changed.

use std::time::Duration;

use thiserror::Error;

use crate::cards::{Card, CardId};
use crate::session::{FlipOutcome, FlipRejection, Session};

/// Length of the flip animation. The face swaps at the half-way point.
pub const FLIP_DURATION: Duration = Duration::from_millis(300);

/// What a tile shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardFace {
    Back,
    /// Face image for a pair, indexed into the host's face set.
    Face { image: usize },
    /// Face image reserved for special cards (the last of the set).
    Special { image: usize },
    /// Face-up, but the host configured no face images.
    Unavailable,
}

impl CardFace {
    /// Face to show for `card` given `face_count` available images.
    #[must_use]
    pub fn for_card(card: &Card, face_count: usize) -> Self {
        if !card.is_flipped {
            return Self::Back;
        }
        if face_count == 0 {
            return Self::Unavailable;
        }
        let last = face_count - 1;
        if card.is_special {
            Self::Special { image: last }
        } else {
            let value = usize::try_from(card.value).unwrap_or(0);
            Self::Face {
                image: value.min(last),
            }
        }
    }

    #[must_use]
    pub fn is_face_up(&self) -> bool {
        !matches!(self, Self::Back)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FlipAnimation {
    Resting,
    Flipping { elapsed: Duration, from: CardFace },
}

/// Why a click never reached the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ClickRefusal {
    #[error("flip animation in progress")]
    Animating,

    #[error("card already face-up")]
    AlreadyFaceUp,

    #[error("session refused: {0}")]
    Blocked(FlipRejection),
}

/// Result of a click on a tile.
#[derive(Clone, Debug, PartialEq)]
pub enum ClickOutcome {
    Ignored(ClickRefusal),
    Flipped(FlipOutcome),
}

/// View state for one tile.
#[derive(Clone, Debug)]
pub struct CardView {
    card: Card,
    face_count: usize,
    face: CardFace,
    animation: FlipAnimation,
}

impl CardView {
    #[must_use]
    pub fn new(card: Card, face_count: usize) -> Self {
        Self {
            card,
            face_count,
            face: CardFace::for_card(&card, face_count),
            animation: FlipAnimation::Resting,
        }
    }

    #[must_use]
    pub fn id(&self) -> CardId {
        self.card.id
    }

    /// Last card state this view was given.
    #[must_use]
    pub fn card(&self) -> &Card {
        &self.card
    }

    #[must_use]
    pub fn face(&self) -> CardFace {
        self.face
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        matches!(self.animation, FlipAnimation::Flipping { .. })
    }

    /// Face drawn this frame: the old face until the half-way point of a
    /// flip, then the current one.
    #[must_use]
    pub fn shown_face(&self) -> CardFace {
        match self.animation {
            FlipAnimation::Flipping { elapsed, from } if elapsed < FLIP_DURATION / 2 => from,
            _ => self.face,
        }
    }

    /// Animation progress in `0.0..=1.0`, or `None` when resting.
    #[must_use]
    pub fn flip_progress(&self) -> Option<f32> {
        match self.animation {
            FlipAnimation::Resting => None,
            FlipAnimation::Flipping { elapsed, .. } => {
                Some((elapsed.as_secs_f32() / FLIP_DURATION.as_secs_f32()).min(1.0))
            }
        }
    }

    /// Handle a player click on this tile.
    pub fn on_clicked(&mut self, session: &mut Session) -> ClickOutcome {
        if self.is_animating() {
            return ClickOutcome::Ignored(ClickRefusal::Animating);
        }
        if !self.card.is_flippable() {
            return ClickOutcome::Ignored(ClickRefusal::AlreadyFaceUp);
        }
        if let Err(reason) = session.check_flip(self.card.id) {
            return ClickOutcome::Ignored(ClickRefusal::Blocked(reason));
        }

        self.animation = FlipAnimation::Flipping {
            elapsed: Duration::ZERO,
            from: self.face,
        };
        ClickOutcome::Flipped(session.on_card_flipped(self.card.id))
    }

    /// Progress the flip animation, releasing the local lock at the end.
    pub fn advance(&mut self, dt: Duration) {
        if let FlipAnimation::Flipping { elapsed, from } = self.animation {
            let elapsed = elapsed + dt;
            self.animation = if elapsed >= FLIP_DURATION {
                FlipAnimation::Resting
            } else {
                FlipAnimation::Flipping { elapsed, from }
            };
        }
    }

    /// Re-read authoritative card state.
    pub fn update_card_display(&mut self, card: &Card) {
        self.card = *card;
        self.face = CardFace::for_card(card, self.face_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_selection() {
        let mut card = Card::pair(CardId::new(0), 3);
        assert_eq!(CardFace::for_card(&card, 13), CardFace::Back);

        card.is_flipped = true;
        assert_eq!(CardFace::for_card(&card, 13), CardFace::Face { image: 3 });
        // Values past the face set reuse the last image.
        assert_eq!(CardFace::for_card(&card, 2), CardFace::Face { image: 1 });
        assert_eq!(CardFace::for_card(&card, 0), CardFace::Unavailable);

        let mut special = Card::special(CardId::new(24));
        special.mark_matched();
        assert_eq!(CardFace::for_card(&special, 13), CardFace::Special { image: 12 });
    }

    #[test]
    fn test_animation_lock_releases() {
        let mut view = CardView::new(Card::pair(CardId::new(0), 0), 4);
        view.animation = FlipAnimation::Flipping {
            elapsed: Duration::ZERO,
            from: CardFace::Back,
        };

        view.advance(Duration::from_millis(150));
        assert!(view.is_animating());
        let progress = view.flip_progress().unwrap();
        assert!((progress - 0.5).abs() < 1e-6);

        view.advance(Duration::from_millis(150));
        assert!(!view.is_animating());
        assert_eq!(view.flip_progress(), None);
    }

    #[test]
    fn test_face_swaps_half_way() {
        let mut card = Card::pair(CardId::new(1), 4);
        let mut view = CardView::new(card, 13);
        view.animation = FlipAnimation::Flipping {
            elapsed: Duration::ZERO,
            from: CardFace::Back,
        };
        card.is_flipped = true;
        view.update_card_display(&card);

        assert_eq!(view.shown_face(), CardFace::Back);
        view.advance(Duration::from_millis(149));
        assert_eq!(view.shown_face(), CardFace::Back);
        view.advance(Duration::from_millis(1));
        assert_eq!(view.shown_face(), CardFace::Face { image: 4 });
        view.advance(Duration::from_millis(150));
        assert_eq!(view.shown_face(), view.face());
    }

    #[test]
    fn test_update_display_reads_state() {
        let mut view = CardView::new(Card::pair(CardId::new(5), 2), 4);
        assert_eq!(view.face(), CardFace::Back);

        let mut card = *view.card();
        card.is_flipped = true;
        view.update_card_display(&card);
        assert_eq!(view.face(), CardFace::Face { image: 2 });
        assert!(view.face().is_face_up());
    }
}
