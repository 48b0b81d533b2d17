use std::fmt;

use rand::{Rng, distr::StandardUniform, prelude::Distribution};

/// A color in hue/saturation/lightness form.
///
/// Hue is in degrees, saturation and lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hsl {
    pub hue: u16,
    pub saturation: u8,
    pub lightness: u8,
}

impl Hsl {
    #[must_use]
    pub const fn new(hue: u16, saturation: u8, lightness: u8) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    #[must_use]
    const fn darkened(self, amount: u8) -> Self {
        Self {
            lightness: self.lightness.saturating_sub(amount),
            ..self
        }
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({}, {}%, {}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

const PALETTE: [Hsl; 12] = [
    Hsl::new(210, 85, 55),
    Hsl::new(270, 80, 60),
    Hsl::new(330, 75, 65),
    Hsl::new(180, 80, 55),
    Hsl::new(25, 90, 60),
    Hsl::new(140, 75, 55),
    Hsl::new(15, 85, 65),
    Hsl::new(260, 70, 70),
    Hsl::new(195, 85, 50),
    Hsl::new(45, 90, 60),
    Hsl::new(300, 80, 60),
    Hsl::new(150, 80, 50),
];

/// Display color stamped on a shape when it is drawn from the catalog.
///
/// Purely cosmetic: the engine copies it into board cells but never looks at it.
/// Random colors are drawn uniformly from a fixed palette with `rng.random()`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeColor {
    palette_index: u8,
}

/// The three gradient tones a renderer uses for one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorTones {
    pub primary: Hsl,
    pub secondary: Hsl,
    pub tertiary: Hsl,
}

impl ShapeColor {
    /// Number of distinct colors in the palette.
    pub const LEN: usize = PALETTE.len();

    /// Returns the palette color at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= ShapeColor::LEN`.
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub const fn from_palette(index: usize) -> Self {
        assert!(index < Self::LEN);
        Self {
            palette_index: index as u8,
        }
    }

    #[must_use]
    pub const fn palette_index(self) -> usize {
        self.palette_index as usize
    }

    #[must_use]
    pub const fn hsl(self) -> Hsl {
        PALETTE[self.palette_index as usize]
    }

    /// Derives the primary, secondary (lightness − 8) and tertiary (lightness − 15) tones.
    #[must_use]
    pub const fn tones(self) -> ColorTones {
        let primary = self.hsl();
        ColorTones {
            primary,
            secondary: primary.darkened(8),
            tertiary: primary.darkened(15),
        }
    }
}

impl fmt::Display for ShapeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.hsl(), f)
    }
}

impl Distribution<ShapeColor> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeColor {
        ShapeColor::from_palette(rng.random_range(0..ShapeColor::LEN))
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng as _, SeedableRng as _};
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_tones_darken_lightness() {
        let tones = ShapeColor::from_palette(0).tones();
        assert_eq!(tones.primary, Hsl::new(210, 85, 55));
        assert_eq!(tones.secondary, Hsl::new(210, 85, 47));
        assert_eq!(tones.tertiary, Hsl::new(210, 85, 40));
    }

    #[test]
    fn test_display_format() {
        let color = ShapeColor::from_palette(4);
        assert_eq!(color.to_string(), "hsl(25, 90%, 60%)");
        assert_eq!(color.tones().tertiary.to_string(), "hsl(25, 90%, 45%)");
    }

    #[test]
    fn test_random_colors_stay_in_palette() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut seen = [false; ShapeColor::LEN];
        for _ in 0..1000 {
            let color: ShapeColor = rng.random();
            seen[color.palette_index()] = true;
        }
        assert!(seen.iter().all(|&s| s), "every palette entry should be drawn");
    }

    #[test]
    #[should_panic(expected = "index < Self::LEN")]
    fn test_from_palette_out_of_range() {
        let _ = ShapeColor::from_palette(ShapeColor::LEN);
    }
}
