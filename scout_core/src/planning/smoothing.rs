// scout_core/src/planning/smoothing.rs

//! Box-filter smoothing of raw grid paths.
//!
//! Each retained sample is the average of the raw cells inside a window of
//! `window` consecutive indices centred on it. Indices that fall off either end
//! of the path are dropped from the average rather than clamped to an endpoint.
//! Only every `stride`-th window centre is kept, starting `(window - 1) / 2`
//! indices before the first cell.

use crate::types::Cell;

use super::astar::Path;

/// Smooths and decimates a raw path. An empty input yields an empty output.
///
/// `window` is assumed odd and `stride` non-zero; both are checked when the
/// planner configuration is validated.
pub fn box_smooth(path: &[Cell], window: usize, stride: usize) -> Path {
    if path.is_empty() || window == 0 || stride == 0 {
        return Vec::new();
    }

    let offset = ((window - 1) / 2) as isize;
    let len = path.len() as isize;
    let mut smoothed = Vec::with_capacity(path.len() / stride + 2);

    let mut centre = -offset;
    while centre < len + offset {
        if let Some(cell) = window_average(path, centre, window) {
            smoothed.push(cell);
        }
        centre += stride as isize;
    }
    smoothed
}

fn window_average(path: &[Cell], centre: isize, window: usize) -> Option<Cell> {
    let offset = ((window - 1) / 2) as isize;
    let len = path.len() as isize;

    let (mut sum_row, mut sum_col, mut count) = (0isize, 0isize, 0isize);
    for k in 0..window as isize {
        let i = centre + k - offset;
        if i >= 0 && i < len {
            let cell = path[i as usize];
            sum_row += cell.row;
            sum_col += cell.col;
            count += 1;
        }
    }

    // Integer division truncates toward zero; grid cells are never negative.
    (count > 0).then(|| Cell::new(sum_row / count, sum_col / count))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_up(len: isize) -> Vec<Cell> {
        (0..len).map(|i| Cell::new(59 - i, 30)).collect()
    }

    #[test]
    fn first_sample_is_the_start_cell() {
        let path = straight_up(40);
        let smoothed = box_smooth(&path, 25, 7);
        assert_eq!(smoothed[0], path[0]);
    }

    #[test]
    fn output_count_follows_stride() {
        // Centres run from -12 to len + 11 in steps of 7.
        let path = straight_up(40);
        let smoothed = box_smooth(&path, 25, 7);
        assert_eq!(smoothed.len(), (40 + 24 + 6) / 7);
        assert!(smoothed.len() <= path.len());
    }

    #[test]
    fn straight_line_stays_on_its_column() {
        let path = straight_up(30);
        for cell in box_smooth(&path, 25, 7) {
            assert_eq!(cell.col, 30);
        }
    }

    #[test]
    fn averages_exclude_out_of_range_neighbours() {
        let path = vec![Cell::new(0, 0), Cell::new(0, 3), Cell::new(0, 9)];
        // Centres run -1..=3; the window at -1 only sees index 0.
        let smoothed = box_smooth(&path, 3, 1);
        assert_eq!(
            smoothed,
            vec![
                Cell::new(0, 0),
                Cell::new(0, 1),
                Cell::new(0, 4),
                Cell::new(0, 6),
                Cell::new(0, 9),
            ]
        );
    }

    #[test]
    fn empty_path_smooths_to_nothing() {
        assert!(box_smooth(&[], 25, 7).is_empty());
    }
}
