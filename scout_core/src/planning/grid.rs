// scout_core/src/planning/grid.rs

use nalgebra::DMatrix;

use crate::types::{Cell, GridShape};

pub const FREE: u8 = 0;
pub const BLOCKED: u8 = 1;

/// 8-connected moves. Orthogonal first, then diagonal; the order is part of
/// the planner's tie-breaking.
pub const DIRECTIONS: [(isize, isize); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1), // Cardinal
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1), // Diagonal
];

/// Returns the `(rows, cols)` shape of a matrix.
pub fn shape_of<T>(matrix: &DMatrix<T>) -> GridShape {
    GridShape::new(matrix.nrows(), matrix.ncols())
}

/// Reads a cell, treating anything outside the grid as `None`.
pub fn get<T: Copy>(matrix: &DMatrix<T>, cell: Cell) -> Option<T> {
    if shape_of(matrix).contains(cell) {
        Some(matrix[(cell.row as usize, cell.col as usize)])
    } else {
        None
    }
}

/// Writes a cell if it lies inside the grid; out-of-bounds writes are ignored.
pub fn set<T>(matrix: &mut DMatrix<T>, cell: Cell, value: T) {
    if shape_of(matrix).contains(cell) {
        matrix[(cell.row as usize, cell.col as usize)] = value;
    }
}

pub fn is_blocked(matrix: &DMatrix<u8>, cell: Cell) -> bool {
    // Out of bounds is considered occupied
    get(matrix, cell).map_or(true, |v| v != FREE)
}

/// Builds an occupancy grid from row-major rows of 0/1 values. Handy in tests and tools.
pub fn from_rows(rows: &[&[u8]]) -> DMatrix<u8> {
    let n_rows = rows.len();
    let n_cols = rows.first().map_or(0, |r| r.len());
    DMatrix::from_fn(n_rows, n_cols, |r, c| rows[r].get(c).copied().unwrap_or(FREE))
}
