//! Game rules on top of the core data structures.
//!
//! [`GameSession`] is the entry point: it owns the board, the tray, the statistics
//! and the shape generator, and reports everything that happens as
//! [`SessionEvent`]s. The remaining modules are the pieces it is built from and can
//! be used on their own, e.g. by automated players.

pub use self::{
    catalog::*, challenge::*, event::*, game_session::*, game_stats::*, hint::*,
    shape_generator::*, tray::*,
};

pub mod catalog;
mod challenge;
mod event;
mod game_session;
mod game_stats;
mod hint;
mod shape_generator;
mod tray;
