// scout_core/src/types.rs

use serde::{Deserialize, Serialize};

// --- Grid Geometry ---

/// Represents a 2D index in the navigation grid, ordered `(row, col)`.
///
/// Signed so that neighbour generation and probe offsets can step outside the
/// grid before being bounds-checked.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    pub row: isize,
    pub col: isize,
}

impl Cell {
    pub const fn new(row: isize, col: isize) -> Self {
        Self { row, col }
    }

    /// Chebyshev (king-move) distance between two cells.
    pub fn chebyshev(&self, other: &Cell) -> usize {
        (self.row - other.row)
            .unsigned_abs()
            .max((self.col - other.col).unsigned_abs())
    }

    /// True when `other` is one of the 8 neighbours of `self`.
    pub fn is_adjacent(&self, other: &Cell) -> bool {
        self != other && self.chebyshev(other) == 1
    }

    pub fn offset(&self, d_row: isize, d_col: isize) -> Cell {
        Cell::new(self.row + d_row, self.col + d_col)
    }
}

impl From<(isize, isize)> for Cell {
    fn from((row, col): (isize, isize)) -> Self {
        Cell::new(row, col)
    }
}

/// Dimensions of a grid or image, `(rows, cols)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridShape {
    pub rows: usize,
    pub cols: usize,
}

impl GridShape {
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Checks if a cell lies inside `[0, rows) x [0, cols)`.
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row >= 0
            && cell.row < self.rows as isize
            && cell.col >= 0
            && cell.col < self.cols as isize
    }

    pub fn len(&self) -> usize {
        self.rows * self.cols
    }
}

impl Default for GridShape {
    fn default() -> Self {
        Self::new(60, 60)
    }
}

impl From<(usize, usize)> for GridShape {
    fn from((rows, cols): (usize, usize)) -> Self {
        GridShape::new(rows, cols)
    }
}

// --- Targets ---

/// The nearest detected target in grid-cell units.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ObjectPosition {
    pub center_row: isize,
    pub center_col: isize,
    pub height: isize,
    pub width: isize,
}

impl ObjectPosition {
    pub const fn new(center_row: isize, center_col: isize, height: isize, width: isize) -> Self {
        Self {
            center_row,
            center_col,
            height,
            width,
        }
    }

    pub fn center(&self) -> Cell {
        Cell::new(self.center_row, self.center_col)
    }
}

/// A detector bounding box in original-image pixels. `(x, y)` is the top-left corner.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub x: isize,
    pub y: isize,
    pub width: isize,
    pub height: isize,
}

impl BoundingBox {
    pub const fn new(x: isize, y: isize, width: isize, height: isize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Centre of the box as a `(row, col)` cell in image pixels.
    pub fn center(&self) -> Cell {
        Cell::new(self.y + self.height / 2, self.x + self.width / 2)
    }

    /// Row of the bottom edge; larger means closer to the vehicle.
    pub fn bottom(&self) -> isize {
        self.y + self.height
    }
}

// --- Commands ---

pub const COMMAND_LIMIT: i32 = 100;

/// Linear and angular velocity command, each clamped to `[-100, 100]`.
///
/// Positive angular turns counter-clockwise seen from above.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct VelocityCommand {
    pub linear: i32,
    pub angular: i32,
}

impl VelocityCommand {
    pub const STOP: VelocityCommand = VelocityCommand {
        linear: 0,
        angular: 0,
    };

    pub fn new(linear: i32, angular: i32) -> Self {
        Self {
            linear: linear.clamp(-COMMAND_LIMIT, COMMAND_LIMIT),
            angular: angular.clamp(-COMMAND_LIMIT, COMMAND_LIMIT),
        }
    }

    /// Rounds and clamps floating point velocities.
    pub fn from_f64(linear: f64, angular: f64) -> Self {
        Self::new(round_to_i32(linear), round_to_i32(angular))
    }
}

fn round_to_i32(value: f64) -> i32 {
    if value.is_nan() {
        0
    } else {
        value
            .round()
            .clamp(-COMMAND_LIMIT as f64, COMMAND_LIMIT as f64) as i32
    }
}

/// What gets emitted to the motor/transport collaborator once per processed frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ControlOutput {
    Drive(VelocityCommand),
    /// Target reached: stop and alert.
    Signal,
}

/// Result of one controller iteration.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Decision {
    pub command: VelocityCommand,
    pub signal: bool,
}

impl Decision {
    pub fn new(command: VelocityCommand, signal: bool) -> Self {
        // Signaling and motion are mutually exclusive.
        let command = if signal { VelocityCommand::STOP } else { command };
        Self { command, signal }
    }

    pub fn output(&self) -> ControlOutput {
        if self.signal {
            ControlOutput::Signal
        } else {
            ControlOutput::Drive(self.command)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn velocity_command_is_clamped() {
        let cmd = VelocityCommand::new(250, -101);
        assert_eq!(cmd, VelocityCommand::new(100, -100));
        assert_eq!(VelocityCommand::from_f64(99.6, -0.4), VelocityCommand::new(100, 0));
        assert_eq!(VelocityCommand::from_f64(f64::NAN, 1e9).linear, 0);
    }

    #[test]
    fn signaling_decision_zeroes_the_command() {
        let decision = Decision::new(VelocityCommand::new(80, -20), true);
        assert_eq!(decision.command, VelocityCommand::STOP);
        assert_eq!(decision.output(), ControlOutput::Signal);

        let decision = Decision::new(VelocityCommand::new(80, -20), false);
        assert_eq!(
            decision.output(),
            ControlOutput::Drive(VelocityCommand::new(80, -20))
        );
    }

    #[test]
    fn cell_adjacency_uses_eight_neighbours() {
        let c = Cell::new(5, 5);
        assert!(c.is_adjacent(&Cell::new(6, 6)));
        assert!(c.is_adjacent(&Cell::new(4, 5)));
        assert!(!c.is_adjacent(&c));
        assert!(!c.is_adjacent(&Cell::new(7, 5)));
        assert_eq!(c.chebyshev(&Cell::new(0, 8)), 5);
    }

    #[test]
    fn bounding_box_center_and_bottom() {
        let b = BoundingBox::new(10, 20, 6, 8);
        assert_eq!(b.center(), Cell::new(24, 13));
        assert_eq!(b.bottom(), 28);
    }
}
