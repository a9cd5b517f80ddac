//! The match-game session: authoritative deck, flips, scoring, and win
//! detection.
//!
//! ## Turn flow
//!
//! 1. Presentation asks [`Session::can_flip_card`] before animating.
//! 2. [`Session::on_card_flipped`] re-validates, charges the flip, and
//!    either waits for a second card, resolves a pair, or runs the special
//!    card effect.
//! 3. Mismatches and special reveals leave the session locked until the
//!    host advances the clock past the scheduled resolution with
//!    [`Session::advance`].

use std::time::Duration;

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, info, warn};

use super::hooks::{SessionHooks, SoundCue};
use super::outcome::{FlipOutcome, FlipRejection, GameOutcome};
use super::timer::{Deferred, ScheduledEvent, TimerQueue};
use crate::cards::{Card, CardId, Deck, DeckError};
use crate::core::{ConfigError, GameRng, GameRngState, SessionConfig};
use crate::rules::{GameStatus, TurnPhase};

/// One player's game, from deal to the last match.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    hooks: SessionHooks,
    rng: GameRng,
    deck: Deck,

    status: GameStatus,
    phase: TurnPhase,

    score: i64,
    flip_count: u32,
    consecutive_matches: u32,
    best_streak: u32,
    special_card_found: bool,

    /// Virtual clock, advanced only by the host.
    now: Duration,
    started_at: Duration,

    /// Bumped on every deal; deferred events from older deals are dropped.
    generation: u64,
    timers: TimerQueue,
    outcome: Option<GameOutcome>,
}

impl Session {
    /// Create a session. No cards are dealt until [`Session::start_new_game`].
    pub fn new(config: SessionConfig, hooks: SessionHooks) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = config.seed.map_or_else(GameRng::from_entropy, GameRng::new);
        let deck = Deck::ordered(&config.deck);

        Ok(Self {
            config,
            hooks,
            rng,
            deck,
            status: GameStatus::NotStarted,
            phase: TurnPhase::Idle,
            score: 0,
            flip_count: 0,
            consecutive_matches: 0,
            best_streak: 0,
            special_card_found: false,
            now: Duration::ZERO,
            started_at: Duration::ZERO,
            generation: 0,
            timers: TimerQueue::new(),
            outcome: None,
        })
    }

    /// Deal a freshly shuffled deck and reset everything.
    ///
    /// Pending resolutions from the previous game are cancelled.
    pub fn start_new_game(&mut self) {
        let deck = Deck::shuffled(&self.config.deck, &mut self.rng);
        self.reset(deck);
    }

    /// Reset everything and play on an explicit layout.
    ///
    /// The layout must hold exactly as many cards as the configured deck,
    /// since neighbour lookups use the configured grid width. A refused
    /// layout leaves the current game untouched.
    pub fn start_with_deck(&mut self, deck: Deck) -> Result<(), DeckError> {
        let expected = self.config.deck.card_count();
        if deck.len() != expected {
            return Err(DeckError::SizeMismatch {
                expected,
                actual: deck.len(),
            });
        }
        self.reset(deck);
        Ok(())
    }

    fn reset(&mut self, deck: Deck) {
        self.generation += 1;
        self.timers.clear();

        self.deck = deck;
        self.status = GameStatus::Active;
        self.phase = TurnPhase::Idle;
        self.score = 0;
        self.flip_count = 0;
        self.consecutive_matches = 0;
        self.best_streak = 0;
        self.special_card_found = false;
        self.started_at = self.now;
        self.outcome = None;

        info!(
            generation = self.generation,
            cards = self.deck.len(),
            seed = self.rng.seed(),
            "new game dealt"
        );
        self.hooks.display.score_changed(self.score);
    }

    // === Flipping ===

    /// Would a flip of `id` be accepted right now? No side effects.
    #[must_use]
    pub fn can_flip_card(&self, id: CardId) -> bool {
        self.check_flip(id).is_ok()
    }

    /// The flip gate, naming the reason for a refusal.
    pub fn check_flip(&self, id: CardId) -> Result<Card, FlipRejection> {
        if !self.status.is_active() {
            return Err(FlipRejection::GameInactive);
        }
        if self.phase.is_locked() {
            return Err(FlipRejection::Locked);
        }
        if self.phase.flipped_cards().len() >= 2 {
            return Err(FlipRejection::TurnFull);
        }

        let card = self.deck.get(id).ok_or(FlipRejection::UnknownCard(id))?;
        if card.is_matched {
            return Err(FlipRejection::AlreadyMatched(id));
        }
        if card.is_flipped {
            return Err(FlipRejection::AlreadyFlipped(id));
        }
        Ok(*card)
    }

    /// Flip `id` face-up and resolve the turn if it is complete.
    ///
    /// Refused flips change nothing and cost nothing.
    pub fn on_card_flipped(&mut self, id: CardId) -> FlipOutcome {
        let card = match self.check_flip(id) {
            Ok(card) => card,
            Err(reason) => {
                debug!(card = %id, %reason, "flip rejected");
                return FlipOutcome::Rejected(reason);
            }
        };

        self.flip_count += 1;
        self.adjust_score(-self.config.scoring.flip_cost);
        self.hooks.audio.play_cue(SoundCue::Flip);

        if let Some(card) = self.deck.get_mut(id) {
            card.is_flipped = true;
        }
        self.hooks.display.card_changed(id);
        debug!(card = %id, flips = self.flip_count, score = self.score, "card flipped");

        match self.phase {
            TurnPhase::Idle if card.is_special => {
                self.phase = TurnPhase::SpecialResolving { special: id };
                self.trigger_special_card_effect(id)
            }
            TurnPhase::Idle => {
                self.phase = TurnPhase::AwaitingSecond { first: id };
                FlipOutcome::AwaitingSecond { card: id }
            }
            TurnPhase::AwaitingSecond { first } => {
                self.phase = TurnPhase::Resolving;
                self.check_match(first, id)
            }
            // check_flip refuses both while locked.
            TurnPhase::Resolving | TurnPhase::SpecialResolving { .. } => {
                FlipOutcome::Rejected(FlipRejection::Locked)
            }
        }
    }

    fn check_match(&mut self, first: CardId, second: CardId) -> FlipOutcome {
        let (Some(a), Some(b)) = (self.deck.get(first).copied(), self.deck.get(second).copied())
        else {
            warn!(%first, %second, "pair references a card missing from the deck");
            self.phase = TurnPhase::Idle;
            return FlipOutcome::Rejected(FlipRejection::UnknownCard(first));
        };

        if !a.matches(&b) {
            self.consecutive_matches = 0;
            let due = self.now.saturating_add(self.config.timing.mismatch_delay());
            self.timers.schedule(
                due,
                self.generation,
                Deferred::FlipBack {
                    cards: [first, second],
                },
            );
            debug!(%first, %second, "mismatch, flip-back scheduled");
            return FlipOutcome::Mismatched {
                pair: [first, second],
            };
        }

        for id in [first, second] {
            if let Some(card) = self.deck.get_mut(id) {
                card.mark_matched();
            }
        }

        let scoring = &self.config.scoring;
        let award = scoring.match_award(self.consecutive_matches) + scoring.pair_bonus(&a, &b);
        self.consecutive_matches += 1;
        self.best_streak = self.best_streak.max(self.consecutive_matches);
        self.adjust_score(award);

        let due = self.now.saturating_add(self.config.timing.match_cue_delay());
        self.timers
            .schedule(due, self.generation, Deferred::Cue(SoundCue::Match));

        self.hooks.display.card_changed(first);
        self.hooks.display.card_changed(second);
        debug!(%first, %second, award, streak = self.consecutive_matches, "pair matched");

        let game_over = self.check_game_end();
        self.phase = TurnPhase::Idle;

        FlipOutcome::Matched {
            pair: [first, second],
            award,
            game_over,
        }
    }

    fn trigger_special_card_effect(&mut self, id: CardId) -> FlipOutcome {
        if let Some(card) = self.deck.get_mut(id) {
            card.mark_matched();
        }

        let award = self.config.scoring.special_award(self.special_card_found);
        self.special_card_found = true;
        self.adjust_score(award);
        self.hooks.audio.play_cue(SoundCue::Special);

        let revealed: SmallVec<[CardId; 4]> = self
            .deck
            .neighbors_of(id, self.config.deck.grid_size)
            .into_iter()
            .filter(|n| self.deck.get(*n).is_some_and(Card::is_flippable))
            .collect();

        for &neighbor in &revealed {
            if let Some(card) = self.deck.get_mut(neighbor) {
                card.is_flipped = true;
            }
            self.hooks.display.card_changed(neighbor);
        }

        if revealed.is_empty() {
            self.phase = TurnPhase::Idle;
        } else {
            let due = self.now.saturating_add(self.config.timing.special_reveal_delay());
            self.timers.schedule(
                due,
                self.generation,
                Deferred::HideRevealed {
                    cards: revealed.clone(),
                },
            );
        }

        self.hooks.display.card_changed(id);
        debug!(card = %id, award, revealed = revealed.len(), "special card activated");

        FlipOutcome::SpecialActivated {
            card: id,
            award,
            revealed,
        }
    }

    fn check_game_end(&mut self) -> Option<GameOutcome> {
        if !self.deck.all_pairs_matched() {
            return None;
        }

        self.status = GameStatus::GameOver;

        let elapsed = self.now.saturating_sub(self.started_at);
        let time_bonus = self.config.scoring.time_bonus(elapsed);
        self.adjust_score(time_bonus);

        let due = self.now.saturating_add(self.config.timing.victory_cue_delay());
        self.timers
            .schedule(due, self.generation, Deferred::Cue(SoundCue::Victory));

        let outcome = GameOutcome {
            score: self.score,
            elapsed,
            won: true,
            time_bonus,
            flip_count: self.flip_count,
            best_streak: self.best_streak,
            special_card_found: self.special_card_found,
        };

        info!(
            score = outcome.score,
            elapsed_secs = outcome.elapsed_seconds(),
            time_bonus,
            flips = outcome.flip_count,
            "game won"
        );

        if let Err(err) = self.hooks.recorder.record_result(&outcome) {
            warn!(%err, "failed to record game result");
        }

        self.outcome = Some(outcome.clone());
        Some(outcome)
    }

    fn adjust_score(&mut self, delta: i64) {
        if delta != 0 {
            self.score += delta;
            self.hooks.display.score_changed(self.score);
        }
    }

    // === Clock ===

    /// Move the clock forward, firing every deferred event that falls due.
    ///
    /// Events fire in due order with the clock set to their due time. The
    /// clock saturates at `Duration::MAX`.
    ///
    /// This clock is also what the time bonus measures. A host must call
    /// `advance` with the real time that passed between frames; a session
    /// whose clock never moves always awards the full bonus.
    pub fn advance(&mut self, dt: Duration) {
        let target = self.now.saturating_add(dt);
        while let Some(scheduled) = self.timers.pop_due(target) {
            self.now = self.now.max(scheduled.due);
            self.fire(scheduled);
        }
        self.now = target;
    }

    /// Advance until nothing is pending.
    pub fn settle(&mut self) {
        while let Some(due) = self.timers.next_due() {
            self.advance(due.saturating_sub(self.now));
        }
    }

    fn fire(&mut self, scheduled: ScheduledEvent) {
        if scheduled.generation != self.generation {
            debug!(
                event_generation = scheduled.generation,
                generation = self.generation,
                "dropping event from a previous game"
            );
            return;
        }

        match scheduled.event {
            Deferred::FlipBack { cards } => {
                for id in cards {
                    self.turn_face_down(id);
                }
                if self.phase == TurnPhase::Resolving {
                    self.phase = TurnPhase::Idle;
                }
            }
            Deferred::HideRevealed { cards } => {
                for &id in &cards {
                    self.turn_face_down(id);
                }
                if matches!(self.phase, TurnPhase::SpecialResolving { .. }) {
                    self.phase = TurnPhase::Idle;
                }
            }
            Deferred::Cue(cue) => self.hooks.audio.play_cue(cue),
        }
    }

    fn turn_face_down(&mut self, id: CardId) {
        match self.deck.get_mut(id) {
            Some(card) if card.is_flipped && !card.is_matched => {
                card.is_flipped = false;
                self.hooks.display.card_changed(id);
            }
            _ => debug!(card = %id, "card no longer face-up and unresolved, leaving it"),
        }
    }

    // === Observation ===

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn score(&self) -> i64 {
        self.score
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    #[must_use]
    pub fn is_game_active(&self) -> bool {
        self.status.is_active()
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.phase.is_locked()
    }

    /// Cards face-up and unresolved this turn.
    #[must_use]
    pub fn flipped_cards(&self) -> SmallVec<[CardId; 2]> {
        self.phase.flipped_cards()
    }

    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.deck.get(id)
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Cards in board order.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.deck.iter()
    }

    #[must_use]
    pub fn position_of(&self, id: CardId) -> Option<usize> {
        self.deck.position_of(id)
    }

    #[must_use]
    pub fn flip_count(&self) -> u32 {
        self.flip_count
    }

    #[must_use]
    pub fn consecutive_matches(&self) -> u32 {
        self.consecutive_matches
    }

    #[must_use]
    pub fn special_card_found(&self) -> bool {
        self.special_card_found
    }

    /// Current reading of the virtual clock.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Play time of the current game; frozen once it is won.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        match (&self.status, &self.outcome) {
            (GameStatus::NotStarted, _) => Duration::ZERO,
            (GameStatus::GameOver, Some(outcome)) => outcome.elapsed,
            _ => self.now.saturating_sub(self.started_at),
        }
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.timers.len()
    }

    /// Outcome of the current game once it is won.
    #[must_use]
    pub fn outcome(&self) -> Option<&GameOutcome> {
        self.outcome.as_ref()
    }

    /// Cheap, serializable copy of the observable state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            generation: self.generation,
            status: self.status,
            phase: self.phase,
            cards: self.deck.cards().clone(),
            score: self.score,
            flip_count: self.flip_count,
            consecutive_matches: self.consecutive_matches,
            special_card_found: self.special_card_found,
            elapsed: self.elapsed(),
            rng: self.rng.state(),
        }
    }
}

/// Point-in-time copy of a session.
///
/// `cards` shares structure with the live deck, so taking a snapshot does
/// not copy the cards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub generation: u64,
    pub status: GameStatus,
    pub phase: TurnPhase,
    pub cards: Vector<Card>,
    pub score: i64,
    pub flip_count: u32,
    pub consecutive_matches: u32,
    pub special_card_found: bool,
    pub elapsed: Duration,
    pub rng: GameRngState,
}
