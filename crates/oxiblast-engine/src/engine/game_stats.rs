use serde::{Deserialize, Serialize};

/// Points per placed block, multiplied by the level.
const BLOCK_POINTS: usize = 10;
/// Points per cleared line, multiplied by the level.
const LINE_POINTS: usize = 100;
/// Cleared lines needed to advance one level.
const LINES_PER_LEVEL: usize = 10;

/// Game statistics tracking score, cleared lines and placements.
///
/// # Scoring
///
/// Each placement scores `blocks × level × 10`, plus `lines × level × 100` when it
/// clears lines. The level used is the one reached *after* the placement's lines are
/// counted, so the clear that reaches level 2 already scores at level 2. A full row
/// crossing a full column counts as two lines.
///
/// # Example
///
/// ```
/// use oxiblast_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_placement(2, 1); // a domino completing one row
///
/// assert_eq!(stats.score(), 2 * 10 + 100);
/// assert_eq!(stats.total_cleared_lines(), 1);
/// assert_eq!(stats.level(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    score: usize,
    total_cleared_lines: usize,
    placed_shapes: usize,
    placed_blocks: usize,
    bonus_points: usize,
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates a new game statistics tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            total_cleared_lines: 0,
            placed_shapes: 0,
            placed_blocks: 0,
            bonus_points: 0,
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Returns the current level: one plus a level per ten cleared lines.
    #[must_use]
    pub const fn level(&self) -> usize {
        self.total_cleared_lines / LINES_PER_LEVEL + 1
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Returns the number of shapes placed on the board.
    #[must_use]
    pub const fn placed_shapes(&self) -> usize {
        self.placed_shapes
    }

    #[must_use]
    pub const fn placed_blocks(&self) -> usize {
        self.placed_blocks
    }

    /// Returns the part of the score that came from challenge bonuses.
    #[must_use]
    pub const fn bonus_points(&self) -> usize {
        self.bonus_points
    }

    /// Updates statistics after a shape is placed and its lines are cleared.
    ///
    /// Returns the points earned by this placement.
    pub const fn complete_placement(&mut self, blocks_placed: usize, cleared_lines: usize) -> usize {
        self.placed_shapes += 1;
        self.placed_blocks += blocks_placed;
        self.total_cleared_lines += cleared_lines;

        let level = self.level();
        let points = blocks_placed * level * BLOCK_POINTS + cleared_lines * level * LINE_POINTS;
        self.score += points;
        points
    }

    pub const fn add_bonus(&mut self, points: usize) {
        self.bonus_points += points;
        self.score += points;
    }
}
