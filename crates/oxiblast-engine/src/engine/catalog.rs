//! Static shape library and difficulty-weighted selection.
//!
//! The catalog holds every polyomino the game can deal, from the single block up to
//! seven-block rings. Shapes are split by [`ComplexityTier`]: the largest tier (five
//! or more blocks) is only dealt with a probability set by the [`Difficulty`], every
//! other shape is dealt uniformly.

use std::{fmt, str::FromStr};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::{ComplexityTier, Shape, ShapeColor, ShapeMatrix};

/// A catalog entry: an immutable template that shapes are instantiated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeDef {
    matrix: ShapeMatrix,
}

impl ShapeDef {
    const fn new(matrix: ShapeMatrix) -> Self {
        Self { matrix }
    }

    #[must_use]
    pub const fn matrix(&self) -> &ShapeMatrix {
        &self.matrix
    }

    #[must_use]
    pub const fn tier(&self) -> ComplexityTier {
        self.matrix.tier()
    }

    /// Stamps `color` onto a fresh copy of this definition.
    #[must_use]
    pub const fn instantiate(&self, color: ShapeColor) -> Shape {
        Shape::new(self.matrix, color)
    }
}

/// Player-selected difficulty; only controls how often large shapes are dealt.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::IsVariant,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Normal, Self::Hard];

    /// Probability of dealing a shape from the largest tier.
    #[must_use]
    pub const fn large_shape_rate(self) -> f64 {
        match self {
            Difficulty::Easy => 0.0,
            Difficulty::Normal => 0.05,
            Difficulty::Hard => 0.1,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown difficulty {input:?} (expected easy, normal or hard)")]
pub struct ParseDifficultyError {
    input: String,
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseDifficultyError {
                input: s.to_owned(),
            })
    }
}

/// Picks a catalog entry for the given difficulty.
///
/// With probability [`Difficulty::large_shape_rate`] the entry is drawn uniformly
/// from the largest tier, otherwise uniformly from all smaller shapes.
pub fn select_definition<R>(difficulty: Difficulty, rng: &mut R) -> &'static ShapeDef
where
    R: Rng + ?Sized,
{
    let pool = if rng.random_bool(difficulty.large_shape_rate()) {
        large_definitions()
    } else {
        basic_definitions()
    };
    &pool[rng.random_range(0..pool.len())]
}

/// All catalog entries, smaller tiers first.
#[must_use]
pub fn definitions() -> &'static [ShapeDef] {
    &SHAPE_DEFINITIONS
}

/// Entries below [`ComplexityTier::LARGEST`].
#[must_use]
pub fn basic_definitions() -> &'static [ShapeDef] {
    &SHAPE_DEFINITIONS[..LARGE_SHAPES_START]
}

/// Entries of [`ComplexityTier::LARGEST`].
#[must_use]
pub fn large_definitions() -> &'static [ShapeDef] {
    &SHAPE_DEFINITIONS[LARGE_SHAPES_START..]
}

const LARGE_SHAPES_START: usize = 22;

const SHAPE_DEFINITIONS: [ShapeDef; 41] = {
    const fn d<const W: usize, const H: usize>(cells: [[u8; W]; H]) -> ShapeDef {
        ShapeDef::new(ShapeMatrix::from_cells(cells))
    }

    let defs = [
        // 1 block
        d([[1]]),
        // 2 blocks
        d([[1, 1]]),
        d([[1], [1]]),
        // 3 blocks
        d([[1, 0], [1, 1]]),
        d([[0, 1], [1, 1]]),
        d([[1, 1], [1, 0]]),
        d([[1, 1], [0, 1]]),
        d([[1, 1, 1]]),
        d([[1], [1], [1]]),
        // 4 blocks
        d([[1, 1, 1], [0, 1, 0]]),
        d([[0, 1, 0], [1, 1, 1]]),
        d([[1, 0], [1, 1], [1, 0]]),
        d([[0, 1], [1, 1], [0, 1]]),
        d([[1, 1], [1, 1]]),
        d([[1, 1, 1, 1]]),
        d([[1], [1], [1], [1]]),
        d([[1, 1, 0], [0, 1, 1]]),
        d([[0, 1, 1], [1, 1, 0]]),
        d([[1, 0, 0], [1, 1, 1]]),
        d([[0, 0, 1], [1, 1, 1]]),
        d([[1, 1, 1], [1, 0, 0]]),
        d([[1, 1, 1], [0, 0, 1]]),
        // 5+ blocks
        d([[0, 1, 0], [1, 1, 1], [0, 1, 0]]),
        d([[1, 0, 1], [1, 1, 1]]),
        d([[1, 1, 1], [1, 0, 1]]),
        d([[1, 1, 0], [0, 1, 1], [0, 1, 0]]),
        d([[0, 1, 1], [1, 1, 0], [0, 1, 0]]),
        d([[1, 1], [1, 1], [1, 0]]),
        d([[1, 1], [1, 1], [0, 1]]),
        d([[1, 0, 0], [1, 1, 0], [0, 1, 1]]),
        d([[0, 0, 1], [0, 1, 1], [1, 1, 0]]),
        d([[1, 1, 1, 1], [0, 0, 1, 0]]),
        d([[0, 0, 1, 0], [1, 1, 1, 1]]),
        d([[0, 1, 1], [1, 1, 0], [1, 0, 0]]),
        d([[1, 1, 0], [0, 1, 1], [0, 0, 1]]),
        d([[1, 1, 1], [1, 0, 0], [1, 1, 1]]),
        d([[1, 1, 1], [0, 0, 1], [1, 1, 1]]),
        d([[1, 1, 1, 1], [0, 0, 0, 1]]),
        d([[1, 1, 1, 1], [1, 0, 0, 0]]),
        d([[1, 0, 0, 0], [1, 1, 1, 1]]),
        d([[0, 0, 0, 1], [1, 1, 1, 1]]),
    ];

    // The selection pools rely on the catalog being sorted into these two groups.
    let mut i = 0;
    while i < defs.len() {
        assert!(defs[i].tier().is_largest() == (i >= LARGE_SHAPES_START));
        i += 1;
    }
    defs
};
