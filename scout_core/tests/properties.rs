// scout_core/tests/properties.rs

//! Property-based tests for the planner and the coordinate transforms.
//!
//! Run with: cargo test -p scout_core --test properties

use nalgebra::DMatrix;
use proptest::prelude::*;
use scout_core::control::ScaleTransform;
use scout_core::planning::smoothing::box_smooth;
use scout_core::planning::{PathFinder, PlannerConfig};
use scout_core::types::{Cell, GridShape};

// =============================================================================
// Strategies
// =============================================================================

fn arb_shape() -> impl Strategy<Value = GridShape> {
    (2usize..24, 2usize..24).prop_map(|(rows, cols)| GridShape::new(rows, cols))
}

fn arb_cell_in(shape: GridShape) -> impl Strategy<Value = Cell> {
    (0..shape.rows as isize, 0..shape.cols as isize).prop_map(|(row, col)| Cell::new(row, col))
}

/// An empty grid with two distinct cells inside it.
fn arb_open_query() -> impl Strategy<Value = (GridShape, Cell, Cell)> {
    arb_shape()
        .prop_flat_map(|shape| (Just(shape), arb_cell_in(shape), arb_cell_in(shape)))
        .prop_filter("start and goal must differ", |(_, start, goal)| start != goal)
}

/// A grid with roughly 30% walls, a free start and a distinct goal.
fn arb_cluttered_query() -> impl Strategy<Value = (DMatrix<u8>, Cell, Cell)> {
    arb_shape()
        .prop_flat_map(|shape| {
            let walls = prop::collection::vec(prop::bool::weighted(0.3), shape.len());
            (Just(shape), walls, arb_cell_in(shape), arb_cell_in(shape))
        })
        .prop_filter_map("start must be free and differ from goal", |(shape, walls, start, goal)| {
            let mut occupancy =
                DMatrix::from_fn(shape.rows, shape.cols, |r, c| u8::from(walls[r * shape.cols + c]));
            if start == goal {
                return None;
            }
            occupancy[(start.row as usize, start.col as usize)] = 0;
            Some((occupancy, start, goal))
        })
}

fn arb_path() -> impl Strategy<Value = Vec<Cell>> {
    prop::collection::vec((0isize..60, 0isize..60), 4..120)
        .prop_map(|cells| cells.into_iter().map(Cell::from).collect())
}

fn planner_for(occupancy: DMatrix<u8>) -> PathFinder {
    let mut planner = PathFinder::new(PlannerConfig::default()).unwrap();
    planner.set_maps(occupancy, None).unwrap();
    planner
}

// =============================================================================
// Property Tests: Path Finding
// =============================================================================

proptest! {
    /// On an open grid the path needs exactly one cell per king move.
    #[test]
    fn open_grid_path_length_is_chebyshev_distance((shape, start, goal) in arb_open_query()) {
        let mut planner = planner_for(DMatrix::zeros(shape.rows, shape.cols));
        let path = planner.find_path(start, goal);
        prop_assert!(path.is_some());
        let path = path.unwrap();
        prop_assert_eq!(path.len(), start.chebyshev(&goal));
        prop_assert_eq!(path[0], start);
    }

    /// Every found path is a chain of free, 8-connected cells ending next to the goal.
    #[test]
    fn found_paths_are_connected_and_free((occupancy, start, goal) in arb_cluttered_query()) {
        let mut planner = planner_for(occupancy.clone());
        if let Some(path) = planner.find_path(start, goal) {
            prop_assert_eq!(path[0], start);
            prop_assert!(path.last().unwrap().is_adjacent(&goal));
            for pair in path.windows(2) {
                prop_assert!(pair[0].is_adjacent(&pair[1]));
            }
            for cell in &path {
                prop_assert_eq!(occupancy[(cell.row as usize, cell.col as usize)], 0);
            }
        }
    }

    /// Repeating a query returns the same answer without searching again.
    #[test]
    fn repeated_queries_are_served_from_cache((occupancy, start, goal) in arb_cluttered_query()) {
        let mut planner = planner_for(occupancy.clone());
        let first = planner.find_path(start, goal);
        let searches = planner.searches_run();
        let second = planner.find_path(start, goal);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(planner.searches_run(), searches);

        // A fresh planner over the same map agrees.
        let mut fresh = planner_for(occupancy);
        prop_assert_eq!(fresh.find_path(start, goal), first);
    }
}

// =============================================================================
// Property Tests: Smoothing and Transforms
// =============================================================================

proptest! {
    /// Smoothing keeps the start and never lengthens a path of four or more cells.
    #[test]
    fn smoothing_keeps_start_and_never_grows(path in arb_path()) {
        let smoothed = box_smooth(&path, 25, 7);
        prop_assert!(!smoothed.is_empty());
        prop_assert!(smoothed.len() <= path.len());
        prop_assert_eq!(smoothed[0], path[0]);
    }

    /// Scaling up and back lands within one cell of the original position.
    #[test]
    fn upscale_round_trip_is_within_one_cell(
        (from, to, cell) in (arb_shape(), 1usize..8, 1usize..8).prop_flat_map(|(from, kr, kc)| {
            let to = GridShape::new(from.rows * kr + kr / 2, from.cols * kc + kc / 2);
            (Just(from), Just(to), arb_cell_in(from))
        })
    ) {
        let forward = ScaleTransform::new(from, to).unwrap();
        let back = forward.inverse().unwrap();
        let mapped = forward.apply(cell);
        prop_assert!(to.contains(mapped));
        let round_trip = back.apply(mapped);
        prop_assert!(round_trip.chebyshev(&cell) <= 1);
        prop_assert!(round_trip.row <= cell.row && round_trip.col <= cell.col);
    }
}
