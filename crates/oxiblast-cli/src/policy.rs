use oxiblast_engine::{Board, Position, ShapeColor, ShapeMatrix, Tray, find_hint};
use serde::Serialize;

/// A chosen placement: tray slot plus top-left offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub slot: usize,
    pub position: Position,
}

/// Picks the next placement for an automated player.
pub trait PlacementPolicy {
    /// Returns `None` when no tray shape fits anywhere.
    fn choose(&self, board: &Board, tray: &Tray) -> Option<Move>;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    /// Play the hint of the first slot that fits
    FirstFit,
    /// Maximize cleared lines, then contact with blocks and walls
    #[default]
    Greedy,
}

impl PolicyKind {
    pub fn policy(self) -> Box<dyn PlacementPolicy> {
        match self {
            PolicyKind::FirstFit => Box::new(FirstFit),
            PolicyKind::Greedy => Box::new(Greedy),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FirstFit;

impl PlacementPolicy for FirstFit {
    fn choose(&self, board: &Board, tray: &Tray) -> Option<Move> {
        tray.iter().enumerate().find_map(|(slot, shape)| {
            find_hint(board, shape.matrix()).map(|position| Move { slot, position })
        })
    }
}

/// One-step lookahead over every slot and offset.
///
/// Candidates are ranked by lines cleared, then by how many edges of the shape touch
/// filled cells or the board border. Ties keep the earliest candidate in slot then
/// row-major order.
#[derive(Debug, Clone, Copy)]
pub struct Greedy;

impl PlacementPolicy for Greedy {
    fn choose(&self, board: &Board, tray: &Tray) -> Option<Move> {
        let mut best: Option<((usize, usize), Move)> = None;
        for (slot, shape) in tray.iter().enumerate() {
            for position in board.valid_positions(shape.matrix()) {
                let rank = (
                    cleared_lines(board, shape.matrix(), position),
                    contact(board, shape.matrix(), position),
                );
                if best.is_none_or(|(best_rank, _)| rank > best_rank) {
                    best = Some((rank, Move { slot, position }));
                }
            }
        }
        best.map(|(_, mv)| mv)
    }
}

fn cleared_lines(board: &Board, matrix: &ShapeMatrix, position: Position) -> usize {
    let mut board = board.clone();
    board.place(matrix, position.x, position.y, ShapeColor::default());
    board.find_full_lines().count()
}

fn contact(board: &Board, matrix: &ShapeMatrix, position: Position) -> usize {
    const NEIGHBORS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
    let mut count = 0;
    for (dx, dy) in matrix.filled_cells() {
        let (x, y) = (position.x + dx, position.y + dy);
        for (nx, ny) in NEIGHBORS {
            let (Some(nx), Some(ny)) = (x.checked_add_signed(nx), y.checked_add_signed(ny))
            else {
                count += 1;
                continue;
            };
            if nx >= Board::SIZE || ny >= Board::SIZE || board.cell(nx, ny).is_filled() {
                count += 1;
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use oxiblast_engine::Shape;

    use super::*;

    fn shape<const W: usize, const H: usize>(cells: [[u8; W]; H]) -> Shape {
        Shape::new(ShapeMatrix::from_cells(cells), ShapeColor::default())
    }

    #[test]
    fn test_first_fit_skips_slots_that_do_not_fit() {
        let board = Board::from_ascii(
            "
            #.#.#.#.#.
            .#.#.#.#.#
            #.#.#.#.#.
            .#.#.#.#.#
            #.#.#.#.#.
            .#.#.#.#.#
            #.#.#.#.#.
            .#.#.#.#.#
            #.#.#.#.#.
            .#.#.#.#.#
            ",
        );
        let tray = Tray::from_shapes([shape([[1, 1]]), shape([[1]])]);
        assert_eq!(
            FirstFit.choose(&board, &tray),
            Some(Move {
                slot: 1,
                position: Position::new(1, 0)
            })
        );

        let stuck = Tray::from_shapes([shape([[1, 1]])]);
        assert_eq!(FirstFit.choose(&board, &stuck), None);
        assert_eq!(Greedy.choose(&board, &stuck), None);
    }

    #[test]
    fn test_greedy_prefers_clearing_lines() {
        let board = Board::from_ascii(
            "
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ########..
            ",
        );
        // The bar fills one of the two gaps at most, so only the domino clears row 9.
        let tray = Tray::from_shapes([shape([[1], [1], [1]]), shape([[1, 1]])]);
        assert_eq!(
            Greedy.choose(&board, &tray),
            Some(Move {
                slot: 1,
                position: Position::new(8, 9)
            })
        );
    }

    #[test]
    fn test_greedy_hugs_corners_on_empty_board() {
        let tray = Tray::from_shapes([shape([[1, 1], [1, 1]])]);
        assert_eq!(
            Greedy.choose(&Board::EMPTY, &tray),
            Some(Move {
                slot: 0,
                position: Position::new(0, 0)
            })
        );
    }

    #[test]
    fn test_contact_counts_walls_and_blocks() {
        let board = Board::from_ascii(
            "
            .#........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ",
        );
        let mono = ShapeMatrix::from_cells([[1]]);
        // Left wall, top wall and the block to the right.
        assert_eq!(contact(&board, &mono, Position::new(0, 0)), 3);
        assert_eq!(contact(&board, &mono, Position::new(5, 5)), 0);
    }
}
