use crate::core::{Board, Position, ShapeMatrix};

/// Finds the first spot where `matrix` fits.
///
/// Candidate offsets are scanned in row-major order (rows top to bottom, columns left
/// to right) and the first one accepted by [`Board::can_place`] is returned. The scan
/// is deterministic; `None` means the shape fits nowhere.
#[must_use]
pub fn find_hint(board: &Board, matrix: &ShapeMatrix) -> Option<Position> {
    board.valid_positions(matrix).next()
}
