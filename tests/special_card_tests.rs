//! Special card integration tests.
//!
//! Boards here are built from explicit layouts so neighbour positions are
//! known. In `Deck::ordered` card ids equal board positions.
//!
//! A layout holds at most one special card and an activated special card
//! stays matched, so the repeat-activation award is unreachable in play.
//! `ScoringRules::special_award` covers it directly.

use std::time::Duration;

use memory_match::{
    Card, CardId, Deck, DeckConfig, DeckError, FlipOutcome, FlipRejection, GameStatus, Session,
    SessionConfig, SessionHooks, TurnPhase,
};

fn id(raw: u32) -> CardId {
    CardId::new(raw)
}

fn ids(raw: &[u32]) -> Vec<CardId> {
    raw.iter().copied().map(CardId::new).collect()
}

/// Default 25-card deck, unshuffled: special card in the bottom-right corner.
fn corner_deck() -> Deck {
    Deck::ordered(&DeckConfig::default())
}

/// Default deck with the special card swapped into the centre (position 12).
fn center_deck() -> Deck {
    let mut cards: Vec<Card> = corner_deck().iter().copied().collect();
    cards.swap(12, 24);
    Deck::from_cards(cards).unwrap()
}

fn session_with(deck: Deck, config: SessionConfig) -> Session {
    let mut session = Session::new(config.with_seed(1), SessionHooks::silent()).unwrap();
    session.start_with_deck(deck).unwrap();
    session
}

fn revealed_of(outcome: &FlipOutcome) -> Vec<CardId> {
    match outcome {
        FlipOutcome::SpecialActivated { revealed, .. } => revealed.to_vec(),
        other => panic!("expected a special activation, got {other:?}"),
    }
}

// =============================================================================
// Reveal
// =============================================================================

#[test]
fn test_center_special_reveals_four_neighbors() {
    let mut session = session_with(center_deck(), SessionConfig::default());

    let outcome = session.on_card_flipped(id(24));
    assert_eq!(revealed_of(&outcome), ids(&[7, 17, 11, 13]));
    assert_eq!(session.score(), -1 + 15);
    assert!(session.special_card_found());

    let special = session.card(id(24)).unwrap();
    assert!(special.is_matched && special.is_flipped);
    for neighbor in ids(&[7, 17, 11, 13]) {
        assert!(session.card(neighbor).unwrap().is_flipped);
    }

    assert!(session.is_locked());
    assert_eq!(session.phase(), TurnPhase::SpecialResolving { special: id(24) });
    assert_eq!(session.flipped_cards().as_slice(), &[id(24)]);
    assert!(!session.can_flip_card(id(0)));
}

#[test]
fn test_reveal_hides_after_two_seconds() {
    let mut session = session_with(center_deck(), SessionConfig::default());
    session.on_card_flipped(id(24));

    session.advance(Duration::from_millis(1999));
    assert!(session.is_locked());
    assert!(session.card(id(7)).unwrap().is_flipped);

    session.advance(Duration::from_millis(1));
    assert!(!session.is_locked());
    assert!(session.flipped_cards().is_empty());
    for neighbor in ids(&[7, 17, 11, 13]) {
        let card = session.card(neighbor).unwrap();
        assert!(!card.is_flipped && !card.is_matched);
    }

    // The special card stays resolved.
    let special = session.card(id(24)).unwrap();
    assert!(special.is_matched && special.is_flipped);
}

#[test]
fn test_corner_special_reveals_two_neighbors() {
    let mut session = session_with(corner_deck(), SessionConfig::default());
    let outcome = session.on_card_flipped(id(24));
    assert_eq!(revealed_of(&outcome), ids(&[19, 23]));
}

#[test]
fn test_resolved_neighbors_are_skipped() {
    let mut session = session_with(corner_deck(), SessionConfig::default());

    // Match the pair holding position 19 (ids 18 and 19, value 9).
    session.on_card_flipped(id(18));
    session.on_card_flipped(id(19));

    let outcome = session.on_card_flipped(id(24));
    assert_eq!(revealed_of(&outcome), ids(&[23]));

    session.settle();
    let matched = session.card(id(19)).unwrap();
    assert!(matched.is_matched && matched.is_flipped);
    assert!(!session.card(id(23)).unwrap().is_flipped);
}

#[test]
fn test_nothing_to_reveal_unlocks_immediately() {
    // Row: [id0, special, id1, id2, id3]
    let cards = vec![
        Card::pair(id(0), 0),
        Card::special(id(4)),
        Card::pair(id(1), 0),
        Card::pair(id(2), 1),
        Card::pair(id(3), 1),
    ];
    let mut session = session_with(
        Deck::from_cards(cards).unwrap(),
        SessionConfig::default().with_deck(2, 1),
    );

    session.on_card_flipped(id(0));
    session.on_card_flipped(id(1));

    let outcome = session.on_card_flipped(id(4));
    assert!(revealed_of(&outcome).is_empty());
    assert!(!session.is_locked());
    assert_eq!(session.phase(), TurnPhase::Idle);
    assert!(session.can_flip_card(id(2)));
    assert_eq!(session.score(), -1 - 1 + 10 - 1 + 15);
}

// =============================================================================
// Layouts
// =============================================================================

#[test]
fn test_second_special_layout_refused() {
    let cards = vec![
        Card::pair(id(0), 0),
        Card::special(id(4)),
        Card::pair(id(1), 0),
        Card::special(id(5)),
    ];
    assert_eq!(
        Deck::from_cards(cards).unwrap_err(),
        DeckError::TooManySpecials(2)
    );
}

#[test]
fn test_unwinnable_layout_refused() {
    // One card of value 0 and three of value 1 can never all be paired.
    let cards = vec![
        Card::pair(id(0), 0),
        Card::pair(id(1), 1),
        Card::pair(id(2), 1),
        Card::pair(id(3), 1),
        Card::special(id(4)),
    ];
    assert_eq!(
        Deck::from_cards(cards).unwrap_err(),
        DeckError::UnpairedValue { value: 0, count: 1 }
    );
}

#[test]
fn test_layout_must_fit_configured_deck() {
    let mut session = Session::new(SessionConfig::default().with_seed(1), SessionHooks::silent())
        .unwrap();
    let five = Deck::ordered(&DeckConfig {
        pairs_count: 2,
        special_count: 1,
        grid_size: 5,
    });
    assert_eq!(
        session.start_with_deck(five),
        Err(DeckError::SizeMismatch {
            expected: 25,
            actual: 5
        })
    );
    assert_eq!(session.status(), GameStatus::NotStarted);
}

#[test]
fn test_special_activates_once() {
    let mut session = session_with(corner_deck(), SessionConfig::default());
    session.on_card_flipped(id(24));
    session.settle();

    assert_eq!(
        session.on_card_flipped(id(24)),
        FlipOutcome::Rejected(FlipRejection::AlreadyMatched(id(24)))
    );
    assert_eq!(session.score(), -1 + 15);
}

// =============================================================================
// Scoring and win
// =============================================================================

#[test]
fn test_special_as_second_card_is_a_mismatch() {
    let mut session = session_with(corner_deck(), SessionConfig::default());

    session.on_card_flipped(id(0));
    let outcome = session.on_card_flipped(id(24));
    assert_eq!(outcome, FlipOutcome::Mismatched { pair: [id(0), id(24)] });
    assert!(!session.special_card_found());
    assert_eq!(session.score(), -2);

    session.advance(Duration::from_millis(1000));
    assert!(!session.card(id(24)).unwrap().is_flipped);

    // It can still be activated on its own later.
    let outcome = session.on_card_flipped(id(24));
    assert!(matches!(outcome, FlipOutcome::SpecialActivated { award: 15, .. }));
    assert_eq!(session.score(), -3 + 15);
}

#[test]
fn test_special_does_not_break_streak() {
    let mut session = session_with(corner_deck(), SessionConfig::default());

    session.on_card_flipped(id(0));
    session.on_card_flipped(id(1));
    session.on_card_flipped(id(24));
    session.settle();

    session.on_card_flipped(id(2));
    let outcome = session.on_card_flipped(id(3));
    assert!(matches!(outcome, FlipOutcome::Matched { award: 12, .. }));
}

#[test]
fn test_win_without_special() {
    let cards = vec![
        Card::pair(id(0), 0),
        Card::pair(id(1), 0),
        Card::special(id(4)),
        Card::pair(id(2), 1),
        Card::pair(id(3), 1),
    ];
    let mut session = session_with(
        Deck::from_cards(cards).unwrap(),
        SessionConfig::default().with_deck(2, 1),
    );

    session.on_card_flipped(id(0));
    session.on_card_flipped(id(1));
    session.on_card_flipped(id(2));
    let outcome = session.on_card_flipped(id(3));

    let FlipOutcome::Matched { game_over: Some(report), .. } = outcome.clone() else {
        panic!("expected a win, got {outcome:?}");
    };
    assert!(!report.special_card_found);
    assert_eq!(session.status(), GameStatus::GameOver);
    assert!(!session.card(id(4)).unwrap().is_matched);
}

#[test]
fn test_special_then_all_pairs() {
    let mut session = session_with(corner_deck(), SessionConfig::default());
    session.on_card_flipped(id(24));
    session.settle();

    for value in 0..12u32 {
        session.on_card_flipped(id(value * 2));
        session.on_card_flipped(id(value * 2 + 1));
    }

    let report = session.outcome().unwrap();
    assert!(report.special_card_found);
    assert_eq!(report.best_streak, 12);
    // -1 + 15, then 12 pairs at -2 each: one at +10 and eleven at +12.
    let before_bonus = 14 - 24 + 10 + 11 * 12;
    assert_eq!(report.score, before_bonus + report.time_bonus);
    // Two seconds of reveal elapsed before the pairs.
    assert_eq!(report.time_bonus, 49);
}
