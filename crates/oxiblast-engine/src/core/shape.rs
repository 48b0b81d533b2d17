use super::{MAX_SHAPE_SIZE, board::Position, color::ShapeColor};

/// Occupancy of a polyomino within its bounding box.
///
/// Each row is stored as a bit mask where bit `x` is column `x`, so a row can be
/// shifted straight onto a board row for collision checks.
///
/// A matrix is always normalized: it has at least one filled cell and no empty
/// border row or column. Constructors assert this, and matrices built in `const`
/// items are checked at compile time.
///
/// # Example
///
/// ```
/// use oxiblast_engine::ShapeMatrix;
///
/// let corner = ShapeMatrix::from_cells([[1, 0], [1, 1]]);
/// assert_eq!(corner.width(), 2);
/// assert_eq!(corner.block_count(), 3);
/// assert!(!corner.is_filled(1, 0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeMatrix {
    width: u8,
    height: u8,
    rows: [u16; MAX_SHAPE_SIZE],
}

impl ShapeMatrix {
    /// Builds a matrix from a grid of `0`/`1` cells, top row first.
    ///
    /// # Panics
    ///
    /// Panics if the grid is empty, larger than [`MAX_SHAPE_SIZE`], holds values
    /// other than `0` and `1`, or is not normalized.
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub const fn from_cells<const W: usize, const H: usize>(cells: [[u8; W]; H]) -> Self {
        assert!(W > 0 && W <= MAX_SHAPE_SIZE, "shape width out of range");
        assert!(H > 0 && H <= MAX_SHAPE_SIZE, "shape height out of range");

        let mut rows = [0; MAX_SHAPE_SIZE];
        let mut y = 0;
        while y < H {
            let mut x = 0;
            while x < W {
                match cells[y][x] {
                    0 => {}
                    1 => rows[y] |= 1 << x,
                    _ => panic!("shape cells must be 0 or 1"),
                }
                x += 1;
            }
            y += 1;
        }

        let matrix = Self {
            width: W as u8,
            height: H as u8,
            rows,
        };
        matrix.assert_normalized();
        matrix
    }

    /// Builds a matrix from ASCII art: `#` is a filled cell, `.` an empty one.
    ///
    /// Blank lines are ignored and every remaining line must have the same width.
    ///
    /// # Panics
    ///
    /// Panics on ragged or oversized input, or when the result is not normalized.
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let lines = art
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>();
        assert!(
            !lines.is_empty() && lines.len() <= MAX_SHAPE_SIZE,
            "shape height out of range: {}",
            lines.len()
        );
        let width = lines[0].len();
        assert!(
            width > 0 && width <= MAX_SHAPE_SIZE,
            "shape width out of range: {width}"
        );

        let mut rows = [0; MAX_SHAPE_SIZE];
        for (y, line) in lines.iter().enumerate() {
            assert_eq!(line.len(), width, "ragged shape row {y}: {line:?}");
            for (x, ch) in line.chars().enumerate() {
                match ch {
                    '#' => rows[y] |= 1 << x,
                    '.' => {}
                    _ => panic!("unexpected character {ch:?} in shape row {y}"),
                }
            }
        }

        let matrix = Self {
            width: width as u8,
            height: lines.len() as u8,
            rows,
        };
        matrix.assert_normalized();
        matrix
    }

    const fn assert_normalized(&self) {
        let last_col = 1 << (self.width - 1);
        let mut any_first_col = false;
        let mut any_last_col = false;
        let mut y = 0;
        while y < self.height as usize {
            any_first_col |= self.rows[y] & 1 != 0;
            any_last_col |= self.rows[y] & last_col != 0;
            y += 1;
        }
        assert!(self.rows[0] != 0, "shape has an empty top row");
        assert!(
            self.rows[self.height as usize - 1] != 0,
            "shape has an empty bottom row"
        );
        assert!(any_first_col, "shape has an empty left column");
        assert!(any_last_col, "shape has an empty right column");
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width as usize
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height as usize
    }

    /// Returns the occupancy mask of row `y` (bit `x` set when column `x` is filled).
    #[must_use]
    pub fn row_mask(&self, y: usize) -> u16 {
        self.row_masks()[y]
    }

    /// Returns the occupancy masks of all rows, top row first.
    #[must_use]
    pub fn row_masks(&self) -> &[u16] {
        &self.rows[..self.height()]
    }

    #[must_use]
    pub fn is_filled(&self, x: usize, y: usize) -> bool {
        x < self.width() && y < self.height() && self.rows[y] & (1 << x) != 0
    }

    /// Number of filled cells.
    #[must_use]
    pub const fn block_count(&self) -> usize {
        let mut count = 0;
        let mut y = 0;
        while y < MAX_SHAPE_SIZE {
            count += self.rows[y].count_ones() as usize;
            y += 1;
        }
        count
    }

    #[must_use]
    pub const fn tier(&self) -> ComplexityTier {
        ComplexityTier::from_block_count(self.block_count())
    }

    /// Iterates over the filled cells as `(dx, dy)` offsets, in row-major order.
    pub fn filled_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.height()).flat_map(move |y| {
            (0..self.width())
                .filter(move |&x| self.is_filled(x, y))
                .map(move |x| (x, y))
        })
    }

    /// Returns the filled cell closest to the bounding-box center.
    ///
    /// The center is `(height / 2, width / 2)` rounded up for even sizes; ties go to
    /// the first cell in row-major order. Front ends use it to anchor a dragged
    /// shape under the pointer.
    #[must_use]
    pub fn pivot(&self) -> Position {
        let center_x = self.width() / 2;
        let center_y = self.height() / 2;
        let mut best = Position::new(center_x, center_y);
        let mut best_distance = usize::MAX;
        for (x, y) in self.filled_cells() {
            let distance = x.abs_diff(center_x).pow(2) + y.abs_diff(center_y).pow(2);
            if distance < best_distance {
                best_distance = distance;
                best = Position::new(x, y);
            }
        }
        best
    }
}

/// Complexity class of a shape, derived from its block count.
///
/// | blocks | tier |
/// |--------|------|
/// | 1      | 0    |
/// | 2      | 1    |
/// | 3      | 2    |
/// | 4      | 3    |
/// | 5+     | 4    |
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display,
)]
#[display("tier {_0}")]
pub struct ComplexityTier(u8);

impl ComplexityTier {
    /// Tier of the rarest, largest shapes that difficulty settings gate.
    pub const LARGEST: Self = Self(4);

    /// # Panics
    ///
    /// Panics if `blocks` is zero.
    #[must_use]
    pub const fn from_block_count(blocks: usize) -> Self {
        match blocks {
            0 => panic!("a shape needs at least one block"),
            1 => Self(0),
            2 => Self(1),
            3 => Self(2),
            4 => Self(3),
            _ => Self::LARGEST,
        }
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn is_largest(self) -> bool {
        self.0 == Self::LARGEST.0
    }
}

/// A live shape: a matrix plus the color it was stamped with.
///
/// Shapes are independent copies; changing one never affects the catalog entry it
/// was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    matrix: ShapeMatrix,
    color: ShapeColor,
}

impl Shape {
    #[must_use]
    pub const fn new(matrix: ShapeMatrix, color: ShapeColor) -> Self {
        Self { matrix, color }
    }

    #[must_use]
    pub const fn matrix(&self) -> &ShapeMatrix {
        &self.matrix
    }

    #[must_use]
    pub const fn color(&self) -> ShapeColor {
        self.color
    }

    #[must_use]
    pub const fn block_count(&self) -> usize {
        self.matrix.block_count()
    }

    #[must_use]
    pub const fn tier(&self) -> ComplexityTier {
        self.matrix.tier()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cells_masks() {
        let t = ShapeMatrix::from_cells([[1, 1, 1], [0, 1, 0]]);
        assert_eq!(t.width(), 3);
        assert_eq!(t.height(), 2);
        assert_eq!(t.row_masks(), &[0b111, 0b010]);
        assert_eq!(t.block_count(), 4);
    }

    #[test]
    fn test_from_ascii_matches_from_cells() {
        let from_ascii = ShapeMatrix::from_ascii(
            "
            #.
            ##
            #.
            ",
        );
        let from_cells = ShapeMatrix::from_cells([[1, 0], [1, 1], [1, 0]]);
        assert_eq!(from_ascii, from_cells);
    }

    #[test]
    fn test_filled_cells_row_major() {
        let s = ShapeMatrix::from_cells([[0, 1], [1, 1]]);
        let cells = s.filled_cells().collect::<Vec<_>>();
        assert_eq!(cells, vec![(1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn test_tier_from_block_count() {
        assert_eq!(ComplexityTier::from_block_count(1).value(), 0);
        assert_eq!(ComplexityTier::from_block_count(2).value(), 1);
        assert_eq!(ComplexityTier::from_block_count(3).value(), 2);
        assert_eq!(ComplexityTier::from_block_count(4).value(), 3);
        assert_eq!(ComplexityTier::from_block_count(5).value(), 4);
        assert_eq!(ComplexityTier::from_block_count(7), ComplexityTier::LARGEST);
        assert_eq!(ComplexityTier::LARGEST.to_string(), "tier 4");
    }

    #[test]
    #[should_panic(expected = "empty top row")]
    fn test_rejects_empty_border_row() {
        let _ = ShapeMatrix::from_ascii("...\n###");
    }

    #[test]
    #[should_panic(expected = "empty right column")]
    fn test_rejects_empty_border_column() {
        let _ = ShapeMatrix::from_ascii("#.\n#.");
    }

    #[test]
    #[should_panic(expected = "ragged")]
    fn test_rejects_ragged_rows() {
        let _ = ShapeMatrix::from_ascii("##\n#");
    }

    #[test]
    fn test_pivot_prefers_center_cell() {
        let plus = ShapeMatrix::from_cells([[0, 1, 0], [1, 1, 1], [0, 1, 0]]);
        assert_eq!(plus.pivot(), Position::new(1, 1));
    }

    #[test]
    fn test_pivot_rounds_center_up() {
        // Center of a 2x2 box is (1, 1).
        let corner = ShapeMatrix::from_cells([[1, 1], [1, 0]]);
        assert_eq!(corner.pivot(), Position::new(1, 0));

        let bar = ShapeMatrix::from_cells([[1, 1, 1, 1]]);
        assert_eq!(bar.pivot(), Position::new(2, 0));
    }

    #[test]
    fn test_pivot_falls_back_to_nearest_filled_cell() {
        let u = ShapeMatrix::from_cells([[1, 0, 1], [1, 1, 1]]);
        // (1, 1) is the center of the bounding box and is filled.
        assert_eq!(u.pivot(), Position::new(1, 1));

        let ring = ShapeMatrix::from_cells([[1, 1, 1], [1, 0, 1], [1, 1, 1]]);
        // Center (1, 1) is empty; (1, 0) is the first cell at distance 1.
        assert_eq!(ring.pivot(), Position::new(1, 0));
    }
}
