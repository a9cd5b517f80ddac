//! The authoritative game session and its collaborators.
//!
//! - `game`: the [`Session`] state machine
//! - `hooks`: display, audio, and result-recording traits
//! - `outcome`: flip outcomes, refusals, and the end-of-game report
//! - `timer`: deferred events on the session's virtual clock

pub mod game;
pub mod hooks;
pub mod outcome;
pub mod timer;

pub use game::{Session, SessionSnapshot};
pub use hooks::{
    AudioCues, CardDisplay, ChangeLog, RecordError, ResultRecorder, SessionHooks, Silent, SoundCue,
};
pub use outcome::{FlipOutcome, FlipRejection, GameOutcome};
pub use timer::{Deferred, ScheduledEvent, TimerQueue};
