//! Placement-and-clearing engine for a 10×10 block puzzle.
//!
//! - [`core`] holds the static data structures: the [`Board`], shape matrices and
//!   shape colors.
//! - [`engine`] builds the game on top of them: the shape catalog, the tray, scoring,
//!   the [`GameSession`] state machine and the hint advisor.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Reason a session operation was refused.
///
/// Rejections are ordinary outcomes of user input, not failures: the session is
/// left exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum Rejection {
    #[display("session is paused")]
    Paused,
    #[display("game is over")]
    GameOver,
    #[display("tray slot {index} does not exist (tray holds {len} shapes)")]
    InvalidTrayIndex { index: usize, len: usize },
    #[display("shape does not fit at ({x}, {y})")]
    InvalidTarget { x: usize, y: usize },
}
