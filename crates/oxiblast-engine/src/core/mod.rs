pub use self::{board::*, color::*, shape::*};

pub(crate) mod board;
pub(crate) mod color;
pub(crate) mod shape;

/// Width and height of the square board.
pub const BOARD_SIZE: usize = 10;

/// Largest width or height a shape may have.
pub const MAX_SHAPE_SIZE: usize = 5;
