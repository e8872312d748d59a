// scout_core/src/control/probes.rs

use nalgebra::DMatrix;

use super::config::ProbeConfig;
use crate::types::{Cell, GridShape};

/// Fraction of occupied cells above which a probe block reports a collision.
const COLLISION_FRACTION: f64 = 0.5;

/// The forward reference point: bottom row, middle column.
pub fn forward_reference(shape: GridShape) -> Cell {
    Cell::new(shape.rows as isize - 1, (shape.cols / 2) as isize)
}

/// Precomputed square probe blocks, left side first, then the mirrored right side.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionProbes {
    /// Top-left corner of every block.
    blocks: Vec<Cell>,
    block_size: usize,
    shape: GridShape,
}

impl CollisionProbes {
    /// Places the blocks relative to [`forward_reference`]. Each block is centred
    /// horizontally on its offset column.
    pub fn new(config: &ProbeConfig, shape: GridShape) -> Self {
        let reference = forward_reference(shape);
        let centring = (-(config.block_size as isize)).div_euclid(2);

        let place = |(d_row, d_col): (isize, isize)| {
            Cell::new(reference.row + d_row, reference.col + d_col + centring)
        };
        let left = config.left_offsets.iter().copied().map(place);
        let right = config
            .left_offsets
            .iter()
            .map(|&(d_row, d_col)| (d_row, -d_col))
            .map(place);

        Self {
            blocks: left.chain(right).collect(),
            block_size: config.block_size,
            shape,
        }
    }

    pub fn blocks(&self) -> &[Cell] {
        &self.blocks
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The first block that does not lie fully inside the grid, if any.
    pub fn first_outside(&self) -> Option<Cell> {
        let size = self.block_size as isize;
        self.blocks.iter().copied().find(|block| {
            block.row < 0
                || block.col < 0
                || block.row + size > self.shape.rows as isize
                || block.col + size > self.shape.cols as isize
        })
    }

    /// One flag per block, in block order: true when more than half the block is occupied.
    pub fn check(&self, raw: &DMatrix<u8>) -> Vec<bool> {
        self.blocks
            .iter()
            .map(|&block| self.block_mean(raw, block) > COLLISION_FRACTION)
            .collect()
    }

    fn block_mean(&self, raw: &DMatrix<u8>, block: Cell) -> f64 {
        let rows = clip(block.row, self.block_size, raw.nrows());
        let cols = clip(block.col, self.block_size, raw.ncols());
        let count = rows.len() * cols.len();
        if count == 0 {
            return 0.0;
        }
        let occupied = rows
            .flat_map(|r| cols.clone().map(move |c| (r, c)))
            .filter(|&idx| raw[idx] != 0)
            .count();
        occupied as f64 / count as f64
    }
}

/// The in-bounds part of `[start, start + len)`.
fn clip(start: isize, len: usize, bound: usize) -> std::ops::Range<usize> {
    let lo = start.clamp(0, bound as isize) as usize;
    let hi = (start + len as isize).clamp(0, bound as isize) as usize;
    lo..hi.max(lo)
}

/// Splits collision flags into `(left, right)` halves.
pub fn split_sides(collisions: &[bool]) -> (&[bool], &[bool]) {
    collisions.split_at(collisions.len() / 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_probes() -> CollisionProbes {
        CollisionProbes::new(&ProbeConfig::default(), GridShape::default())
    }

    #[test]
    fn blocks_mirror_around_the_reference() {
        let probes = default_probes();
        assert_eq!(probes.len(), 6);
        assert_eq!(probes.blocks()[0], Cell::new(49, 13));
        assert_eq!(probes.blocks()[3], Cell::new(49, 43));
        assert_eq!(probes.blocks()[2], Cell::new(29, 18));
        assert_eq!(probes.blocks()[5], Cell::new(29, 38));
        assert_eq!(probes.first_outside(), None);
    }

    #[test]
    fn more_than_half_occupied_collides() {
        let probes = default_probes();
        let mut raw = DMatrix::<u8>::zeros(60, 60);
        // Exactly half of the first block: not a collision.
        for r in 49..51 {
            for c in 13..17 {
                raw[(r, c)] = 1;
            }
        }
        assert!(probes.check(&raw).iter().all(|&hit| !hit));

        raw[(51, 13)] = 1;
        let hits = probes.check(&raw);
        assert!(hits[0]);
        assert_eq!(hits.iter().filter(|&&h| h).count(), 1);

        let (left, right) = split_sides(&hits);
        assert_eq!(left.len(), 3);
        assert!(right.iter().all(|&h| !h));
    }

    #[test]
    fn blocks_off_the_grid_are_detected() {
        let config = ProbeConfig {
            left_offsets: vec![(-10, -40)],
            block_size: 4,
        };
        let probes = CollisionProbes::new(&config, GridShape::default());
        assert_eq!(probes.first_outside(), Some(Cell::new(49, -12)));
    }
}
