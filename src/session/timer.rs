//! Deferred session events on a virtual clock.
//!
//! The session never holds live closures over cards. Each deferred event
//! carries the ids it will touch and the game generation it was scheduled
//! in, and the session validates both when the event fires.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

use smallvec::SmallVec;

use super::hooks::SoundCue;
use crate::cards::CardId;

/// Work to do when a timer fires.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Deferred {
    /// Turn a mismatched pair face-down and unlock.
    FlipBack { cards: [CardId; 2] },

    /// Hide neighbours revealed by the special card and unlock.
    HideRevealed { cards: SmallVec<[CardId; 4]> },

    /// Play a delayed audio cue.
    Cue(SoundCue),
}

/// A deferred event with its firing time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduledEvent {
    pub due: Duration,
    pub generation: u64,
    pub event: Deferred,
    seq: u64,
}

impl Ord for ScheduledEvent {
    // Reversed so the max-heap pops the earliest event; ties go to the
    // event scheduled first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Single-shot timers ordered by due time.
#[derive(Clone, Debug, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<ScheduledEvent>,
    next_seq: u64,
}

impl TimerQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Duration, generation: u64, event: Deferred) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(ScheduledEvent {
            due,
            generation,
            event,
            seq,
        });
    }

    /// Pop the earliest event due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<ScheduledEvent> {
        if self.heap.peek()?.due <= now {
            self.heap.pop()
        } else {
            None
        }
    }

    /// Due time of the earliest pending event.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.heap.peek().map(|event| event.due)
    }

    /// Drop every pending event.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
