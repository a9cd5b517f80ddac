//! Presentation-side state: per-tile proxies and the board that drives them.
//!
//! Nothing here decides game rules. Views ask the session, animate, and
//! re-read authoritative card state when notified.

pub mod board;
pub mod card_view;

pub use board::Board;
pub use card_view::{CardFace, CardView, ClickOutcome, ClickRefusal, FLIP_DURATION};
