// scout_core/src/rendering/mod.rs

//! Drawing-target adapters.
//!
//! Debug overlays and rasterised path maps are drawn with `embedded-graphics`
//! primitives. These adapters let those primitives write straight into an
//! `image::RgbImage` or a binary `DMatrix<u8>` grid.

mod canvas;

pub use canvas::{GridCanvas, RgbCanvas};

use embedded_graphics::prelude::Point;

use crate::types::Cell;

/// Swaps a `(row, col)` cell into the `(x, y)` point drawing primitives expect.
///
/// This is the only place where the row/col convention turns into x/y.
pub fn to_point(cell: Cell) -> Point {
    Point::new(cell.col as i32, cell.row as i32)
}
