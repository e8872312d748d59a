// scout_core/src/control/transforms.rs

use crate::types::{Cell, GridShape};

// =========================================================================
// == Coordinate Space Conversion ==
// =========================================================================

/// Per-axis linear scaling between two `(rows, cols)` spaces:
/// `coord * to_dim / from_dim`, floored.
///
/// The controller uses three of these: original image to grid, grid to debug
/// image, and original image to debug image. Each is derived from the shapes it
/// is built with and must be rebuilt when either shape changes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ScaleTransform {
    from: GridShape,
    to: GridShape,
}

impl ScaleTransform {
    /// `None` when the source space is empty.
    pub fn new(from: GridShape, to: GridShape) -> Option<Self> {
        (!from.is_empty()).then_some(Self { from, to })
    }

    pub fn from_shape(&self) -> GridShape {
        self.from
    }

    pub fn to_shape(&self) -> GridShape {
        self.to
    }

    /// Maps a position from the source space into the target space.
    pub fn apply(&self, cell: Cell) -> Cell {
        Cell::new(
            scale(cell.row, self.to.rows, self.from.rows),
            scale(cell.col, self.to.cols, self.from.cols),
        )
    }

    /// Maps a `(height, width)` extent. Uses the same rule as positions.
    pub fn apply_size(&self, height: isize, width: isize) -> (isize, isize) {
        (
            scale(height, self.to.rows, self.from.rows),
            scale(width, self.to.cols, self.from.cols),
        )
    }

    /// The transform back. `None` when the target space is empty.
    pub fn inverse(&self) -> Option<Self> {
        Self::new(self.to, self.from)
    }
}

#[inline]
fn scale(value: isize, to: usize, from: usize) -> isize {
    (value * to as isize).div_euclid(from as isize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_each_axis_independently() {
        let t = ScaleTransform::new(GridShape::new(120, 160), GridShape::new(60, 60)).unwrap();
        assert_eq!(t.apply(Cell::new(119, 159)), Cell::new(59, 59));
        assert_eq!(t.apply(Cell::new(60, 80)), Cell::new(30, 30));
        assert_eq!(t.apply_size(20, 16), (10, 6));
    }

    #[test]
    fn negative_positions_floor() {
        let t = ScaleTransform::new(GridShape::new(60, 60), GridShape::new(30, 30)).unwrap();
        assert_eq!(t.apply(Cell::new(-1, -3)), Cell::new(-1, -2));
    }

    #[test]
    fn grid_to_debug_round_trip() {
        let t = ScaleTransform::new(GridShape::new(60, 60), GridShape::new(480, 640)).unwrap();
        let back = t.inverse().unwrap();
        for row in 0..60 {
            for col in 0..60 {
                let cell = Cell::new(row, col);
                assert!(back.apply(t.apply(cell)).chebyshev(&cell) <= 1);
            }
        }
    }

    #[test]
    fn empty_source_has_no_transform() {
        assert!(ScaleTransform::new(GridShape::new(0, 10), GridShape::default()).is_none());
    }
}
