use arrayvec::ArrayVec;

use crate::core::Shape;

use super::shape_generator::ShapeGenerator;

/// Number of shapes dealt into an empty tray.
pub const TRAY_CAPACITY: usize = 3;

/// The shapes currently offered to the player, in deal order.
///
/// Shapes are addressed by position. Removing a shape shifts every later shape down
/// by one, so indices must be re-read from the tray after each placement.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Tray {
    shapes: ArrayVec<Shape, TRAY_CAPACITY>,
}

impl Tray {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            shapes: ArrayVec::new_const(),
        }
    }

    /// Builds a tray from up to [`TRAY_CAPACITY`] shapes.
    ///
    /// # Panics
    ///
    /// Panics if more than [`TRAY_CAPACITY`] shapes are given.
    #[must_use]
    pub fn from_shapes<I>(shapes: I) -> Self
    where
        I: IntoIterator<Item = Shape>,
    {
        let mut tray = Self::new();
        for shape in shapes {
            assert!(!tray.shapes.is_full(), "tray holds at most {TRAY_CAPACITY} shapes");
            tray.shapes.push(shape);
        }
        tray
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Shape> {
        self.shapes.get(index)
    }

    /// The shape the hint advisor works on.
    #[must_use]
    pub fn first(&self) -> Option<&Shape> {
        self.shapes.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    /// Removes and returns the shape at `index`, shifting later shapes down.
    pub fn take(&mut self, index: usize) -> Option<Shape> {
        (index < self.shapes.len()).then(|| self.shapes.remove(index))
    }

    pub(crate) fn clear(&mut self) {
        self.shapes.clear();
    }

    /// Deals shapes until the tray is full.
    pub(crate) fn refill(&mut self, generator: &mut ShapeGenerator) {
        while !self.shapes.is_full() {
            self.shapes.push(generator.next_shape());
        }
    }
}

impl<'a> IntoIterator for &'a Tray {
    type Item = &'a Shape;
    type IntoIter = std::slice::Iter<'a, Shape>;

    fn into_iter(self) -> Self::IntoIter {
        self.shapes.iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::{Difficulty, ShapeColor, ShapeMatrix, ShapeSeed};

    use super::*;

    fn shape(art: &str, color: usize) -> Shape {
        Shape::new(ShapeMatrix::from_ascii(art), ShapeColor::from_palette(color))
    }

    #[test]
    fn test_take_shifts_indices() {
        let a = shape("#", 0);
        let b = shape("##", 1);
        let c = shape("###", 2);
        let mut tray = Tray::from_shapes([a, b, c]);

        assert_eq!(tray.take(0), Some(a));
        assert_eq!(tray.len(), 2);
        assert_eq!(tray.get(0), Some(&b));
        assert_eq!(tray.get(1), Some(&c));
        assert_eq!(tray.take(2), None);
        assert_eq!(tray.len(), 2);
    }

    #[test]
    fn test_refill_tops_up_to_capacity() {
        let mut generator = ShapeGenerator::with_seed(Difficulty::Normal, ShapeSeed::from_bytes([1; 16]));
        let mut tray = Tray::from_shapes([shape("#", 0)]);
        tray.refill(&mut generator);
        assert_eq!(tray.len(), TRAY_CAPACITY);
        assert_eq!(tray.first(), Some(&shape("#", 0)));

        tray.clear();
        assert!(tray.is_empty());
        tray.refill(&mut generator);
        assert_eq!(tray.iter().count(), TRAY_CAPACITY);
    }

    #[test]
    #[should_panic(expected = "at most")]
    fn test_from_shapes_over_capacity() {
        let _ = Tray::from_shapes([shape("#", 0); 4]);
    }
}
