// scout_core/src/planning/astar.rs

use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashMap},
};

use embedded_graphics::{
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Line, PrimitiveStyle},
};
use nalgebra::DMatrix;
use num_traits::Zero;
use tracing::{debug, trace};

use super::error::PlanningError;
use super::grid::{self, BLOCKED, DIRECTIONS};
use super::smoothing::box_smooth;
use super::{AngleUnit, HeadingMethod, PlannerConfig};
use crate::rendering::{to_point, GridCanvas};
use crate::types::Cell;

// Type aliases for clarity
type Cost = f64;

/// Ordered cells from the start up to the cell adjacent to the goal.
pub type Path = Vec<Cell>;

/// Running cost of the start node.
const START_COST: Cost = 1.0;
/// Extra fraction of `step_cost` charged for a diagonal move (sqrt(2) - 1).
const DIAGONAL_SURCHARGE: Cost = 0.414;

#[derive(Debug, Copy, Clone)]
struct OpenItem {
    cell: Cell,
    parent: Option<Cell>,
    cost: Cost,
    /// Insertion order; the earliest-inserted item wins cost ties.
    seq: u64,
}

impl Eq for OpenItem {}

impl PartialEq for OpenItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Ord for OpenItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behavior
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone)]
struct CachedQuery {
    start: Cell,
    goal: Cell,
    path: Option<Path>,
}

/// A* search over an occupancy grid plus an optional additive cost field.
///
/// The running cost of a node is its parent's cost plus the Euclidean distance
/// to the goal, the step cost (with a surcharge for diagonals) and the cost
/// field value at the node. The search stops as soon as the goal is generated
/// as a neighbour, so the goal itself is never expanded and never part of the
/// returned [`Path`].
///
/// The last `(start, goal)` query is cached until the maps are replaced.
#[derive(Debug)]
pub struct PathFinder {
    config: PlannerConfig,
    occupancy: Option<DMatrix<u8>>,
    cost_field: Option<DMatrix<f32>>,
    /// Walls plus every cell the last search pushed to the open set.
    visited: Option<DMatrix<u8>>,
    last_query: Option<CachedQuery>,
    searches: u64,
}

impl PathFinder {
    pub fn new(config: PlannerConfig) -> Result<Self, PlanningError> {
        config.validate()?;
        Ok(Self {
            config,
            occupancy: None,
            cost_field: None,
            visited: None,
            last_query: None,
            searches: 0,
        })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Replaces the grid state and drops every cached result.
    ///
    /// A cost field, if given, must have the occupancy grid's exact shape.
    pub fn set_maps(
        &mut self,
        occupancy: DMatrix<u8>,
        cost_field: Option<DMatrix<f32>>,
    ) -> Result<(), PlanningError> {
        let shape = grid::shape_of(&occupancy);
        if shape.is_empty() {
            return Err(PlanningError::EmptyGrid);
        }
        if let Some(cost) = &cost_field {
            let cost_shape = grid::shape_of(cost);
            if cost_shape != shape {
                return Err(PlanningError::ShapeMismatch {
                    grid: shape,
                    cost: cost_shape,
                });
            }
        }

        self.occupancy = Some(occupancy);
        self.cost_field = cost_field;
        self.visited = None;
        self.last_query = None;
        Ok(())
    }

    pub fn has_maps(&self) -> bool {
        self.occupancy.is_some()
    }

    /// Number of searches actually run, i.e. queries that missed the cache.
    pub fn searches_run(&self) -> u64 {
        self.searches
    }

    /// The checked-cells map of the most recent search.
    pub fn visited_map(&self) -> Option<&DMatrix<u8>> {
        self.visited.as_ref()
    }

    /// Finds a path from `start` to the cell before `goal`.
    ///
    /// Returns `None` when no path exists. Repeating the previous query returns
    /// the cached result without searching again.
    pub fn find_path(&mut self, start: Cell, goal: Cell) -> Option<Path> {
        if let Some(cached) = &self.last_query {
            if cached.start == start && cached.goal == goal {
                trace!("[PathFinder] cache hit: start={:?} goal={:?}", start, goal);
                return cached.path.clone();
            }
        }

        let path = self.search(start, goal);
        self.last_query = Some(CachedQuery {
            start,
            goal,
            path: path.clone(),
        });
        path
    }

    /// [`find_path`](Self::find_path) followed by box smoothing.
    pub fn find_path_smoothed(&mut self, start: Cell, goal: Cell) -> Option<Path> {
        let raw = self.find_path(start, goal)?;
        Some(box_smooth(
            &raw,
            self.config.smoothing_window,
            self.config.smoothing_stride,
        ))
    }

    /// Direction of the first smoothed segment (first to third sample).
    ///
    /// `None` when there is no path, the smoothed path has fewer than three
    /// samples, or the first and third samples coincide.
    pub fn initial_heading(&mut self, start: Cell, goal: Cell, unit: AngleUnit) -> Option<f64> {
        let smoothed = self.find_path_smoothed(start, goal)?;
        if smoothed.len() < 3 {
            return None;
        }

        let (first, third) = (smoothed[0], smoothed[2]);
        let dx = (third.col - first.col) as f64;
        let dy = (third.row - first.row) as f64;
        let hypotenuse = dx.hypot(dy);
        if hypotenuse == 0.0 {
            return None;
        }

        let angle = match self.config.heading_method {
            HeadingMethod::Acos => (dx / hypotenuse).acos(),
            HeadingMethod::Atan2 => (-dy).atan2(dx),
        };

        Some(match unit {
            AngleUnit::Radians => angle,
            AngleUnit::Degrees => angle.to_degrees(),
        })
    }

    /// A map with 1 on every raw path cell.
    pub fn path_map(&mut self, start: Cell, goal: Cell) -> Option<DMatrix<u8>> {
        let path = self.find_path(start, goal)?;
        let mut map = self.blank_map()?;
        for cell in path {
            grid::set(&mut map, cell, BLOCKED);
        }
        Some(map)
    }

    /// A map with the smoothed polyline drawn with 1-pixel lines.
    pub fn smoothed_path_map(&mut self, start: Cell, goal: Cell) -> Option<DMatrix<u8>> {
        let smoothed = self.find_path_smoothed(start, goal)?;
        let mut map = self.blank_map()?;
        if let [only] = smoothed.as_slice() {
            grid::set(&mut map, *only, BLOCKED);
        }
        {
            let mut canvas = GridCanvas::new(&mut map);
            let style = PrimitiveStyle::with_stroke(BinaryColor::On, 1);
            for segment in smoothed.windows(2) {
                let _ = Line::new(to_point(segment[0]), to_point(segment[1]))
                    .into_styled(style)
                    .draw(&mut canvas);
            }
        }
        Some(map)
    }

    fn blank_map(&self) -> Option<DMatrix<u8>> {
        let occupancy = self.occupancy.as_ref()?;
        Some(DMatrix::zeros(occupancy.nrows(), occupancy.ncols()))
    }

    fn search(&mut self, start: Cell, goal: Cell) -> Option<Path> {
        self.searches += 1;
        trace!("[PathFinder] search: start={:?} goal={:?}", start, goal);

        let occupancy = self.occupancy.as_ref()?;
        let shape = grid::shape_of(occupancy);

        // Walls and already-queued cells are both "checked" and never revisited.
        let mut checked = occupancy.clone();

        if !shape.contains(start) || !shape.contains(goal) {
            debug!("[PathFinder] FAILED: start or goal outside the grid");
            self.visited = Some(checked);
            return None;
        }
        if grid::is_blocked(occupancy, start) {
            debug!("[PathFinder] FAILED: start {:?} is blocked", start);
            self.visited = Some(checked);
            return None;
        }
        if start == goal {
            // The goal is only ever reached as a neighbour of an expanded node.
            debug!("[PathFinder] FAILED: start equals goal");
            self.visited = Some(checked);
            return None;
        }

        grid::set(&mut checked, start, BLOCKED);

        let mut open_set = BinaryHeap::new();
        let mut closed_set: HashMap<Cell, Option<Cell>> = HashMap::new();
        let mut seq = 0u64;
        open_set.push(OpenItem {
            cell: start,
            parent: None,
            cost: START_COST,
            seq,
        });

        let mut before_goal = None;
        'search: while let Some(current) = open_set.pop() {
            closed_set.insert(current.cell, current.parent);

            for (i, (d_row, d_col)) in DIRECTIONS.iter().enumerate() {
                let next = current.cell.offset(*d_row, *d_col);

                if next == goal {
                    before_goal = Some(current.cell);
                    break 'search;
                }

                if grid::is_blocked(&checked, next) {
                    continue;
                }

                seq += 1;
                let diagonal = i >= 4;
                open_set.push(OpenItem {
                    cell: next,
                    parent: Some(current.cell),
                    cost: self.running_cost(next, goal, current.cost, diagonal),
                    seq,
                });
                grid::set(&mut checked, next, BLOCKED);
            }
        }

        let path = before_goal.map(|last| reconstruct_path(last, &closed_set));
        match &path {
            Some(p) => trace!(
                "[PathFinder] SUCCESS: {} cells, {} nodes expanded",
                p.len(),
                closed_set.len()
            ),
            None => debug!(
                "[PathFinder] FAILED: NoPath after expanding {} nodes",
                closed_set.len()
            ),
        }

        self.visited = Some(checked);
        path
    }

    fn running_cost(&self, cell: Cell, goal: Cell, parent_cost: Cost, diagonal: bool) -> Cost {
        let mut cost = parent_cost + heuristic(cell, goal) + self.config.step_cost;
        if diagonal {
            cost += self.config.step_cost * DIAGONAL_SURCHARGE;
        }
        let field = self
            .cost_field
            .as_ref()
            .and_then(|field| grid::get(field, cell))
            .map_or_else(Cost::zero, Cost::from);
        cost + field
    }
}

/// Euclidean distance to the goal.
fn heuristic(cell: Cell, goal: Cell) -> Cost {
    let d_row = (cell.row - goal.row) as Cost;
    let d_col = (cell.col - goal.col).abs() as Cost;
    (d_row.powi(2) + d_col.powi(2)).sqrt()
}

/// Walks parent links back through the closed set and reverses into start -> goal order.
fn reconstruct_path(last: Cell, closed_set: &HashMap<Cell, Option<Cell>>) -> Path {
    let mut path = vec![last];
    let mut parent = closed_set.get(&last).copied().flatten();
    while let Some(cell) = parent {
        path.push(cell);
        parent = closed_set.get(&cell).copied().flatten();
    }
    path.reverse();
    path
}
