use std::fmt::{self, Write as _};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::Shape;

use super::catalog::{self, Difficulty};

/// Deals shapes for a session: catalog selection plus a random color.
///
/// All randomness comes from one seeded PCG stream, so two generators built from the
/// same [`ShapeSeed`] and difficulty deal the same shapes in the same colors.
///
/// # Example
///
/// ```
/// use oxiblast_engine::{Difficulty, ShapeGenerator};
///
/// let mut generator = ShapeGenerator::new(Difficulty::Hard);
/// let shape = generator.next_shape();
/// assert!(shape.block_count() >= 1);
/// ```
#[derive(Debug, Clone)]
pub struct ShapeGenerator {
    seed: ShapeSeed,
    rng: Pcg32,
    difficulty: Difficulty,
}

/// Seed for deterministic shape generation.
///
/// A 128-bit seed, serialized as a 32-character hex string. Using the same seed
/// reproduces the same deal sequence, which makes sessions replayable and tests
/// deterministic.
///
/// # Example
///
/// ```
/// use oxiblast_engine::{Difficulty, GameSession, ShapeSeed};
/// use rand::Rng as _;
///
/// let seed: ShapeSeed = rand::rng().random();
///
/// let session1 = GameSession::with_seed(Difficulty::Normal, seed);
/// let session2 = GameSession::with_seed(Difficulty::Normal, seed);
/// assert_eq!(session1.tray(), session2.tray());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeSeed([u8; 16]);

impl ShapeSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Parses a seed from up to 32 hex digits.
    #[must_use]
    pub fn from_hex(hex_str: &str) -> Option<Self> {
        // `from_str_radix` alone would also take a leading sign.
        if hex_str.is_empty()
            || hex_str.len() > 32
            || !hex_str.bytes().all(|b| b.is_ascii_hexdigit())
        {
            return None;
        }
        let num = u128::from_str_radix(hex_str, 16).ok()?;
        Some(Self(num.to_be_bytes()))
    }
}

impl fmt::Display for ShapeSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl Serialize for ShapeSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{self}").map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for ShapeSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        if hex_str.len() != 32 {
            return Err(serde::de::Error::custom(format!(
                "invalid hex: expected 32 characters, got {}",
                hex_str.len()
            )));
        }
        Self::from_hex(&hex_str)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex: {hex_str}")))
    }
}

impl Distribution<ShapeSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        ShapeSeed(seed)
    }
}

impl ShapeGenerator {
    /// Creates a generator with a random seed.
    #[must_use]
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_seed(difficulty, rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic dealing.
    #[must_use]
    pub fn with_seed(difficulty: Difficulty, seed: ShapeSeed) -> Self {
        Self {
            seed,
            rng: Pcg32::from_seed(seed.0),
            difficulty,
        }
    }

    #[must_use]
    pub fn seed(&self) -> ShapeSeed {
        self.seed
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Draws a catalog entry for the current difficulty and stamps a random color on it.
    pub fn next_shape(&mut self) -> Shape {
        let def = catalog::select_definition(self.difficulty, &mut self.rng);
        def.instantiate(self.rng.random())
    }
}
