//! Swipe deck: a stack of candidate cards, each made of several pages.
//!
//! Page lists are derived from the candidate and its lazily fetched sections
//! by [`build_pages`]; the [`SwipeDeck`] owns positions and gesture state and
//! re-clamps after every change.

pub mod engine;
pub mod gesture;
pub mod pages;

pub use engine::{DeckBackend, DeckEvent, PageDirection, RemoteDeck, SwipeDeck};
pub use gesture::{Decision, DeckKey, DragOutcome, DragRelease, tilt_degrees};
pub use pages::{Page, basics_rows, build_pages, headline, height_label, work_line};
