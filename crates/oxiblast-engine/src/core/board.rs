use std::fmt;

use serde::{Deserialize, Serialize};

use super::{BOARD_SIZE, color::ShapeColor, shape::ShapeMatrix};

// Bits 0..BOARD_SIZE of a row mask, one per column.
const FULL_ROW_MASK: u16 = (1 << BOARD_SIZE) - 1;

/// Top-left offset of a shape's bounding box on the board.
///
/// - `(0, 0)` is the top-left cell
/// - X increases rightward (columns)
/// - Y increases downward (rows)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A single board cell.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    #[default]
    Empty,
    /// Covered by a placed shape that has not been cleared yet.
    Filled(ShapeColor),
}

impl Cell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    #[must_use]
    pub fn is_filled(self) -> bool {
        !self.is_empty()
    }
}

/// A set of row or column indices in `0..BOARD_SIZE`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineSet {
    bits: u16,
}

impl LineSet {
    pub const EMPTY: Self = Self { bits: 0 };

    fn from_mask(bits: u16) -> Self {
        Self {
            bits: bits & FULL_ROW_MASK,
        }
    }

    /// # Panics
    ///
    /// Panics if `index >= BOARD_SIZE`.
    pub fn insert(&mut self, index: usize) {
        assert!(index < BOARD_SIZE, "line index {index} out of range");
        self.bits |= 1 << index;
    }

    #[must_use]
    pub fn contains(self, index: usize) -> bool {
        index < BOARD_SIZE && self.bits & (1 << index) != 0
    }

    #[must_use]
    pub fn len(self) -> usize {
        self.bits.count_ones() as usize
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Iterates over the indices in ascending order.
    pub fn iter(self) -> impl Iterator<Item = usize> {
        (0..BOARD_SIZE).filter(move |&i| self.contains(i))
    }
}

impl FromIterator<usize> for LineSet {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        let mut set = Self::EMPTY;
        for index in iter {
            set.insert(index);
        }
        set
    }
}

/// Rows and columns that are completely filled.
///
/// Rows and columns are tallied separately: a full row crossing a full column
/// counts as two lines even though they share a cell.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FullLines {
    pub rows: LineSet,
    pub cols: LineSet,
}

impl FullLines {
    #[must_use]
    pub fn count(&self) -> usize {
        self.rows.len() + self.cols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.cols.is_empty()
    }
}

/// One board row: an occupancy mask plus the color of each cell.
///
/// Bit `x` of `occupancy` is set exactly when `cells[x]` is [`Cell::Filled`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BoardRow {
    occupancy: u16,
    cells: [Cell; BOARD_SIZE],
}

impl BoardRow {
    const EMPTY: Self = Self {
        occupancy: 0,
        cells: [Cell::Empty; BOARD_SIZE],
    };

    #[inline]
    fn is_full(&self) -> bool {
        self.occupancy == FULL_ROW_MASK
    }

    /// Checks if any cell in the given mask (shifted by x0) is occupied.
    #[inline]
    fn is_any_cell_occupied(&self, x0: usize, mask: u16) -> bool {
        self.occupancy & (mask << x0) != 0
    }

    fn fill_cells(&mut self, x0: usize, mask: u16, color: ShapeColor) {
        self.occupancy |= mask << x0;
        for dx in (0..u16::BITS as usize).filter(|dx| mask & (1 << dx) != 0) {
            self.cells[x0 + dx] = Cell::Filled(color);
        }
    }

    fn clear_cell(&mut self, x: usize) {
        self.occupancy &= !(1 << x);
        self.cells[x] = Cell::Empty;
    }
}

/// The 10×10 playing field.
///
/// Each row keeps a `u16` occupancy mask for fast collision checks alongside the
/// cell colors a renderer needs. Dimensions never change after construction.
///
/// # Example
///
/// ```
/// use oxiblast_engine::{Board, ShapeColor, ShapeMatrix};
///
/// let mut board = Board::EMPTY;
/// let domino = ShapeMatrix::from_cells([[1, 1]]);
///
/// assert!(board.can_place(&domino, 0, 0));
/// board.place(&domino, 0, 0, ShapeColor::default());
/// assert!(!board.can_place(&domino, 0, 0));
/// assert!(!board.can_place(&domino, 9, 0)); // would overhang the right edge
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [BoardRow; BOARD_SIZE],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Board {
    pub const SIZE: usize = BOARD_SIZE;

    pub const EMPTY: Self = Self {
        rows: [BoardRow::EMPTY; BOARD_SIZE],
    };

    /// Returns the cell at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if either coordinate is outside `0..BOARD_SIZE`.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        assert!(
            x < BOARD_SIZE && y < BOARD_SIZE,
            "cell ({x}, {y}) is outside the board"
        );
        self.rows[y].cells[x]
    }

    /// Returns an iterator over the rows, top row first.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell; BOARD_SIZE]> {
        self.rows.iter().map(|row| &row.cells)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.occupancy == 0)
    }

    /// Number of filled cells on the board.
    #[must_use]
    pub fn filled_cells(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.occupancy.count_ones() as usize)
            .sum()
    }

    /// Checks whether `matrix` fits with its top-left corner at `(x, y)`.
    ///
    /// Returns `false` if the bounding box leaves the board on either axis or any
    /// filled cell of the shape lands on a filled board cell.
    #[must_use]
    pub fn can_place(&self, matrix: &ShapeMatrix, x: usize, y: usize) -> bool {
        if x > BOARD_SIZE - matrix.width() || y > BOARD_SIZE - matrix.height() {
            return false;
        }
        matrix
            .row_masks()
            .iter()
            .zip(&self.rows[y..])
            .all(|(&mask, row)| !row.is_any_cell_occupied(x, mask))
    }

    /// Copies the shape's filled cells onto the board with the given color.
    ///
    /// # Panics
    ///
    /// Panics if [`Self::can_place`] does not hold for this placement. Callers must
    /// validate first; reaching this assertion indicates an engine bug.
    pub fn place(&mut self, matrix: &ShapeMatrix, x: usize, y: usize, color: ShapeColor) {
        assert!(
            self.can_place(matrix, x, y),
            "invalid placement at ({x}, {y})"
        );
        for (&mask, row) in matrix.row_masks().iter().zip(&mut self.rows[y..]) {
            row.fill_cells(x, mask, color);
        }
    }

    /// Iterates over every legal top-left offset for `matrix`, in row-major order.
    pub fn valid_positions<'a>(
        &'a self,
        matrix: &'a ShapeMatrix,
    ) -> impl Iterator<Item = Position> + 'a {
        let max_y = BOARD_SIZE - matrix.height();
        let max_x = BOARD_SIZE - matrix.width();
        (0..=max_y)
            .flat_map(move |y| (0..=max_x).map(move |x| Position::new(x, y)))
            .filter(|pos| self.can_place(matrix, pos.x, pos.y))
    }

    /// Finds every completely filled row and column.
    #[must_use]
    pub fn find_full_lines(&self) -> FullLines {
        let rows = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.is_full())
            .map(|(y, _)| y)
            .collect();
        let cols = LineSet::from_mask(
            self.rows
                .iter()
                .fold(FULL_ROW_MASK, |acc, row| acc & row.occupancy),
        );
        FullLines { rows, cols }
    }

    /// Empties every cell of the listed rows and columns.
    ///
    /// A cell on both a listed row and a listed column is simply cleared once.
    pub fn clear(&mut self, lines: FullLines) {
        for y in lines.rows.iter() {
            self.rows[y] = BoardRow::EMPTY;
        }
        for x in lines.cols.iter() {
            for row in &mut self.rows {
                row.clear_cell(x);
            }
        }
    }

    /// Creates a `Board` from ASCII art, mainly for tests and fixtures.
    ///
    /// `#` is a filled cell, `.` an empty one; other characters are ignored.
    /// Rows are given from top to bottom and there must be exactly 10 of them.
    /// Filled cells get the default color.
    ///
    /// # Panics
    ///
    /// Panics if the art does not describe a 10×10 grid.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let mut board = Self::EMPTY;
        let lines = art
            .lines()
            .filter(|line| !line.trim().is_empty())
            .collect::<Vec<_>>();
        assert_eq!(
            lines.len(),
            BOARD_SIZE,
            "expected {BOARD_SIZE} rows, got {}",
            lines.len()
        );

        for (y, line) in lines.iter().enumerate() {
            let chars = line
                .chars()
                .filter(|c| *c == '#' || *c == '.')
                .collect::<Vec<_>>();
            assert_eq!(
                chars.len(),
                BOARD_SIZE,
                "Each row must have exactly {BOARD_SIZE} cells, got {} at row {y}",
                chars.len(),
            );
            for (x, &ch) in chars.iter().enumerate() {
                if ch == '#' {
                    board.rows[y].fill_cells(x, 0b1, ShapeColor::default());
                }
            }
        }
        board
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                f.write_str(if cell.is_filled() { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng as _, SeedableRng as _};
    use rand_pcg::Pcg32;

    use super::*;

    fn domino() -> ShapeMatrix {
        ShapeMatrix::from_cells([[1, 1]])
    }

    fn monomino() -> ShapeMatrix {
        ShapeMatrix::from_cells([[1]])
    }

    #[test]
    fn test_empty_board() {
        let board = Board::EMPTY;
        assert!(board.is_empty());
        assert_eq!(board.filled_cells(), 0);
        assert!(board.find_full_lines().is_empty());
        for row in board.rows() {
            assert!(row.iter().all(|c| c.is_empty()));
        }
    }

    #[test]
    fn test_can_place_bounds() {
        let board = Board::EMPTY;
        let bar = ShapeMatrix::from_cells([[1, 1, 1, 1]]);
        assert!(board.can_place(&bar, 6, 9));
        assert!(!board.can_place(&bar, 7, 0));
        assert!(!board.can_place(&bar, 0, 10));
        assert!(!board.can_place(&bar, usize::MAX, 0));

        let column = ShapeMatrix::from_cells([[1], [1], [1]]);
        assert!(board.can_place(&column, 9, 7));
        assert!(!board.can_place(&column, 9, 8));
    }

    #[test]
    fn test_can_place_ignores_empty_shape_cells() {
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
        let corner = ShapeMatrix::from_cells([[1, 0], [1, 1]]);
        // The corner's empty cell lies over the filled board cell.
        assert!(board.can_place(&corner, 0, 0));
        assert!(!board.can_place(&domino(), 0, 0));
    }

    #[test]
    fn test_place_fills_cells_with_color() {
        let mut board = Board::EMPTY;
        let color = ShapeColor::from_palette(3);
        let t = ShapeMatrix::from_cells([[1, 1, 1], [0, 1, 0]]);
        board.place(&t, 4, 5, color);

        assert_eq!(board.cell(4, 5), Cell::Filled(color));
        assert_eq!(board.cell(5, 5), Cell::Filled(color));
        assert_eq!(board.cell(6, 5), Cell::Filled(color));
        assert_eq!(board.cell(5, 6), Cell::Filled(color));
        assert_eq!(board.cell(4, 6), Cell::Empty);
        assert_eq!(board.filled_cells(), 4);
        assert!(!board.can_place(&t, 4, 5));
    }

    #[test]
    #[should_panic(expected = "invalid placement")]
    fn test_place_on_occupied_cell_panics() {
        let mut board = Board::EMPTY;
        board.place(&domino(), 0, 0, ShapeColor::default());
        board.place(&domino(), 1, 0, ShapeColor::default());
    }

    #[test]
    #[should_panic(expected = "outside the board")]
    fn test_cell_out_of_range_panics() {
        let _ = Board::EMPTY.cell(10, 0);
    }

    #[test]
    fn test_find_full_lines_matches_cells() {
        let board = Board::from_ascii(
            "
            ##########
            #########.
            #.........
            #.........
            #.........
            #.........
            #.........
            #.........
            #.........
            #.........
            ",
        );
        let lines = board.find_full_lines();
        assert_eq!(lines.rows.iter().collect::<Vec<_>>(), vec![0]);
        assert_eq!(lines.cols.iter().collect::<Vec<_>>(), vec![0]);
        assert_eq!(lines.count(), 2);
        assert_full_lines_match_cells(&board);
    }

    #[test]
    fn test_find_full_lines_on_random_boards() {
        let mut rng = Pcg32::seed_from_u64(0x5eed);
        let mut total_lines = 0;
        for _ in 0..500 {
            // Dense boards, so full lines actually show up.
            let density = rng.random_range(0.7..=1.0);
            let mut board = Board::EMPTY;
            for y in 0..BOARD_SIZE {
                for x in 0..BOARD_SIZE {
                    if rng.random_bool(density) {
                        board.place(&monomino(), x, y, ShapeColor::default());
                    }
                }
            }
            assert_full_lines_match_cells(&board);
            total_lines += board.find_full_lines().count();
        }
        assert!(total_lines > 0);
    }

    fn assert_full_lines_match_cells(board: &Board) {
        let lines = board.find_full_lines();
        for y in 0..BOARD_SIZE {
            let full = (0..BOARD_SIZE).all(|x| board.cell(x, y).is_filled());
            assert_eq!(lines.rows.contains(y), full, "row {y}\n{board}");
        }
        for x in 0..BOARD_SIZE {
            let full = (0..BOARD_SIZE).all(|y| board.cell(x, y).is_filled());
            assert_eq!(lines.cols.contains(x), full, "column {x}\n{board}");
        }
        assert_eq!(lines.count(), lines.rows.len() + lines.cols.len());
    }

    #[test]
    fn test_clear_crossing_lines() {
        let mut board = Board::from_ascii(
            "
            ##########
            ##........
            ##........
            ##........
            ##........
            ##........
            ##........
            ##........
            ##........
            ##.......#
            ",
        );
        let lines = board.find_full_lines();
        assert_eq!(lines.rows.len(), 1);
        assert_eq!(lines.cols.len(), 2);

        board.clear(lines);
        assert!(board.find_full_lines().is_empty());
        assert_eq!(board.filled_cells(), 1);
        assert_eq!(board.cell(9, 9), Cell::Filled(ShapeColor::default()));
    }

    #[test]
    fn test_five_dominoes_fill_and_clear_row() {
        let mut board = Board::EMPTY;
        for x in [0, 2, 4, 6, 8] {
            assert!(board.find_full_lines().is_empty());
            board.place(&domino(), x, 0, ShapeColor::default());
        }
        let lines = board.find_full_lines();
        assert_eq!(lines.rows.iter().collect::<Vec<_>>(), vec![0]);
        assert!(lines.cols.is_empty());

        board.clear(lines);
        assert!((0..BOARD_SIZE).all(|x| board.cell(x, 0).is_empty()));
        assert!(board.is_empty());
    }

    #[test]
    fn test_full_board_yields_twenty_lines() {
        let mut board = Board::EMPTY;
        for y in 0..BOARD_SIZE {
            for x in 0..BOARD_SIZE {
                board.place(&monomino(), x, y, ShapeColor::default());
            }
        }
        let lines = board.find_full_lines();
        assert_eq!(lines.rows.len(), BOARD_SIZE);
        assert_eq!(lines.cols.len(), BOARD_SIZE);
        assert_eq!(lines.count(), 20);

        board.clear(lines);
        assert!(board.is_empty());
    }

    #[test]
    fn test_valid_positions_row_major() {
        let board = Board::from_ascii(
            "
            #########.
            ##########
            ##########
            ##########
            ##########
            ##########
            ##########
            ##########
            ##########
            ########..
            ",
        );
        let positions = board.valid_positions(&monomino()).collect::<Vec<_>>();
        assert_eq!(
            positions,
            vec![Position::new(9, 0), Position::new(8, 9), Position::new(9, 9)]
        );
        assert_eq!(
            board.valid_positions(&domino()).collect::<Vec<_>>(),
            vec![Position::new(8, 9)]
        );
    }

    #[test]
    fn test_line_set() {
        let set = [7, 2, 2].into_iter().collect::<LineSet>();
        assert_eq!(set.len(), 2);
        assert!(set.contains(2));
        assert!(!set.contains(3));
        assert!(!set.contains(42));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![2, 7]);
    }

    #[test]
    fn test_display_roundtrips_ascii() {
        let art = "\
#.........
.#........
..........
..........
..........
..........
..........
..........
..........
.........#
";
        assert_eq!(Board::from_ascii(art).to_string(), art);
    }
}
