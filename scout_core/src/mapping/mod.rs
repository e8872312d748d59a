// scout_core/src/mapping/mod.rs

//! Map ingestion: turns a raw segmentation mask into the three grids the
//! controller works with.
//!
//! - **raw**: the mask resized to the grid shape and binarised. Collision probes
//!   read this one.
//! - **expanded**: obstacles dilated by a Gaussian blur plus a threshold offset.
//!   The planner searches this one.
//! - **cost**: the expanded map blurred again and scaled, a soft repulsion that
//!   rises towards obstacle boundaries.

pub mod filters;

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::planning::grid;
use crate::types::GridShape;
use filters::GaussianKernel;

/// Gaussian dilation: `blocked = floor(blur(raw * 255) / 255 + offset) >= 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlurThreshold {
    /// Kernel side length in cells. Must be odd.
    pub kernel: usize,
    pub sigma: f64,
    /// Added to the normalised blur before flooring. Larger values grow obstacles further.
    pub offset: f64,
}

impl Default for BlurThreshold {
    fn default() -> Self {
        Self {
            kernel: 19,
            sigma: 5.0,
            offset: 0.8,
        }
    }
}

/// Cost field: `blur(expanded * 255) * multiplier`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CostFieldConfig {
    pub kernel: usize,
    pub sigma: f64,
    pub multiplier: f32,
}

impl Default for CostFieldConfig {
    fn default() -> Self {
        Self {
            kernel: 21,
            sigma: 7.0,
            multiplier: 5.0,
        }
    }
}

/// The derived grids of one ingested mask.
#[derive(Debug, Clone, PartialEq)]
pub struct MapLayers {
    /// Shape of the mask before resizing, used for original-image transforms.
    pub source_shape: GridShape,
    pub raw: DMatrix<u8>,
    pub expanded: DMatrix<u8>,
    pub cost: DMatrix<f32>,
}

impl MapLayers {
    pub fn shape(&self) -> GridShape {
        grid::shape_of(&self.raw)
    }
}

/// Builds [`MapLayers`] with fixed kernels, computed once.
#[derive(Debug, Clone)]
pub struct MapProcessor {
    grid_shape: GridShape,
    dilation_kernel: GaussianKernel,
    dilation_offset: f64,
    cost_kernel: GaussianKernel,
    cost_multiplier: f32,
}

impl MapProcessor {
    pub fn new(grid_shape: GridShape, dilation: &BlurThreshold, cost: &CostFieldConfig) -> Self {
        Self {
            grid_shape,
            dilation_kernel: GaussianKernel::new(dilation.kernel, dilation.sigma),
            dilation_offset: dilation.offset,
            cost_kernel: GaussianKernel::new(cost.kernel, cost.sigma),
            cost_multiplier: cost.multiplier,
        }
    }

    pub fn grid_shape(&self) -> GridShape {
        self.grid_shape
    }

    /// Resizes, dilates and derives the cost field. `None` for an empty mask.
    pub fn process(&self, mask: &DMatrix<u8>) -> Option<MapLayers> {
        let source_shape = grid::shape_of(mask);
        if source_shape.is_empty() {
            return None;
        }

        let raw = filters::resize_binary(mask, self.grid_shape);
        let expanded = self.expand(&raw);
        let cost = self.cost_field(&expanded);
        trace!(
            "[MapProcessor] {}x{} -> {}x{}, {} raw / {} expanded blocked cells",
            source_shape.rows,
            source_shape.cols,
            self.grid_shape.rows,
            self.grid_shape.cols,
            raw.iter().filter(|&&v| v != 0).count(),
            expanded.iter().filter(|&&v| v != 0).count(),
        );

        Some(MapLayers {
            source_shape,
            raw,
            expanded,
            cost,
        })
    }

    pub fn expand(&self, raw: &DMatrix<u8>) -> DMatrix<u8> {
        let blurred = filters::gaussian_blur(&raw.map(|v| v.saturating_mul(255)), &self.dilation_kernel);
        blurred.map(|v| u8::from((v as f64 / 255.0 + self.dilation_offset).floor() >= 1.0))
    }

    pub fn cost_field(&self, expanded: &DMatrix<u8>) -> DMatrix<f32> {
        let blurred = filters::gaussian_blur(&expanded.map(|v| v.saturating_mul(255)), &self.cost_kernel);
        blurred.map(|v| v as f32 * self.cost_multiplier)
    }
}

/// An all-free mask of any shape. Feeding it to the controller disables collision avoidance.
pub fn empty_map(shape: GridShape) -> DMatrix<u8> {
    DMatrix::zeros(shape.rows, shape.cols)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processor() -> MapProcessor {
        MapProcessor::new(
            GridShape::default(),
            &BlurThreshold::default(),
            &CostFieldConfig::default(),
        )
    }

    fn block(shape: GridShape, rows: std::ops::Range<usize>, cols: std::ops::Range<usize>) -> DMatrix<u8> {
        let mut map = empty_map(shape);
        for r in rows {
            for c in cols.clone() {
                map[(r, c)] = 1;
            }
        }
        map
    }

    #[test]
    fn empty_mask_yields_empty_layers() {
        let layers = processor().process(&empty_map(GridShape::new(120, 160))).unwrap();
        assert_eq!(layers.shape(), GridShape::default());
        assert_eq!(layers.source_shape, GridShape::new(120, 160));
        assert!(layers.raw.iter().all(|&v| v == 0));
        assert!(layers.expanded.iter().all(|&v| v == 0));
        assert!(layers.cost.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn zero_sized_mask_is_rejected() {
        assert!(processor().process(&DMatrix::zeros(0, 10)).is_none());
    }

    #[test]
    fn dilation_grows_obstacles() {
        let layers = processor()
            .process(&block(GridShape::default(), 20..30, 20..30))
            .unwrap();
        for r in 20..30 {
            for c in 20..30 {
                assert_eq!(layers.expanded[(r, c)], 1, "({r}, {c})");
            }
        }
        assert_eq!(layers.expanded[(18, 25)], 1);
        assert_eq!(layers.expanded[(25, 31)], 1);
        assert_eq!(layers.expanded[(50, 50)], 0);
        assert_eq!(layers.raw[(18, 25)], 0);
    }

    #[test]
    fn cost_rises_towards_obstacles() {
        let layers = processor()
            .process(&block(GridShape::default(), 20..30, 20..30))
            .unwrap();
        let near = layers.cost[(25, 35)];
        let far = layers.cost[(25, 45)];
        assert!(near > far, "near {near} far {far}");
        assert!(layers.cost[(25, 25)] <= 255.0 * 5.0);
    }
}
