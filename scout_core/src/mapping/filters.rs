// scout_core/src/mapping/filters.rs

//! Low-level filters over `DMatrix<u8>` grids.
//!
//! The Gaussian blur treats its input as an 8-bit image: the result is rounded
//! and saturated back into `0..=255`, and borders are handled by mirroring
//! without repeating the edge cell (`dcb|abcd|cba`).

use image::{imageops, GrayImage, Luma};
use nalgebra::DMatrix;

use crate::types::GridShape;

/// Threshold applied after resizing a 0/255 mask back to binary.
const RESIZE_THRESHOLD: u8 = 128;

/// A normalised 1-D Gaussian kernel, applied separably along rows and columns.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianKernel {
    weights: Vec<f32>,
}

impl GaussianKernel {
    /// Builds a kernel of `size` taps (expected odd) with standard deviation `sigma`.
    ///
    /// A non-positive sigma falls back to `0.3 * ((size - 1) * 0.5 - 1) + 0.8`.
    pub fn new(size: usize, sigma: f64) -> Self {
        let size = size.max(1);
        let sigma = if sigma > 0.0 {
            sigma
        } else {
            0.3 * ((size as f64 - 1.0) * 0.5 - 1.0) + 0.8
        };
        let centre = (size as f64 - 1.0) / 2.0;
        let raw: Vec<f64> = (0..size)
            .map(|i| {
                let x = i as f64 - centre;
                (-(x * x) / (2.0 * sigma * sigma)).exp()
            })
            .collect();
        let sum: f64 = raw.iter().sum();
        Self {
            weights: raw.iter().map(|w| (w / sum) as f32).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    fn radius(&self) -> isize {
        (self.weights.len() / 2) as isize
    }
}

/// Maps an out-of-range index back into `[0, len)` by reflection around the edge cells.
#[inline]
fn reflect_101(mut i: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let last = len as isize - 1;
    while i < 0 || i > last {
        if i < 0 {
            i = -i;
        }
        if i > last {
            i = 2 * last - i;
        }
    }
    i as usize
}

/// Separable Gaussian blur of an 8-bit grid.
pub fn gaussian_blur(src: &DMatrix<u8>, kernel: &GaussianKernel) -> DMatrix<u8> {
    let (rows, cols) = (src.nrows(), src.ncols());
    if rows == 0 || cols == 0 {
        return src.clone();
    }
    let radius = kernel.radius();
    let weights = kernel.weights();

    // Horizontal pass
    let horizontal = DMatrix::<f32>::from_fn(rows, cols, |r, c| {
        weights
            .iter()
            .enumerate()
            .map(|(k, w)| {
                let cc = reflect_101(c as isize + k as isize - radius, cols);
                w * src[(r, cc)] as f32
            })
            .sum()
    });

    // Vertical pass
    DMatrix::<u8>::from_fn(rows, cols, |r, c| {
        let value: f32 = weights
            .iter()
            .enumerate()
            .map(|(k, w)| {
                let rr = reflect_101(r as isize + k as isize - radius, rows);
                w * horizontal[(rr, c)]
            })
            .sum();
        value.round().clamp(0.0, 255.0) as u8
    })
}

/// Any non-zero value becomes 1.
pub fn binarize(src: &DMatrix<u8>) -> DMatrix<u8> {
    src.map(|v| u8::from(v != 0))
}

/// Scales a binary grid by `scale`, e.g. 255 to turn a 0/1 mask into a viewable image.
pub fn to_gray_image(src: &DMatrix<u8>, scale: u8) -> GrayImage {
    let mut img = GrayImage::new(src.ncols() as u32, src.nrows() as u32);
    for ((r, c), value) in indexed(src) {
        img.put_pixel(c as u32, r as u32, Luma([value.saturating_mul(scale)]));
    }
    img
}

/// Reads an 8-bit image back into a `(row, col)` grid.
pub fn from_gray_image(img: &GrayImage) -> DMatrix<u8> {
    DMatrix::from_fn(img.height() as usize, img.width() as usize, |r, c| {
        img.get_pixel(c as u32, r as u32).0[0]
    })
}

/// Resizes a binary grid to `shape` with bilinear interpolation and re-thresholds it.
///
/// Returns a copy when the shape already matches.
pub fn resize_binary(src: &DMatrix<u8>, shape: GridShape) -> DMatrix<u8> {
    if src.nrows() == shape.rows && src.ncols() == shape.cols {
        return binarize(src);
    }
    let img = to_gray_image(&binarize(src), 255);
    let resized = imageops::resize(
        &img,
        shape.cols as u32,
        shape.rows as u32,
        imageops::FilterType::Triangle,
    );
    from_gray_image(&resized).map(|v| u8::from(v >= RESIZE_THRESHOLD))
}

fn indexed(src: &DMatrix<u8>) -> impl Iterator<Item = ((usize, usize), u8)> + '_ {
    (0..src.nrows()).flat_map(move |r| (0..src.ncols()).map(move |c| ((r, c), src[(r, c)])))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn kernel_is_normalised_and_symmetric() {
        let kernel = GaussianKernel::new(19, 5.0);
        assert_eq!(kernel.len(), 19);
        let sum: f32 = kernel.weights().iter().sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-5);
        for i in 0..19 {
            assert_relative_eq!(kernel.weights()[i], kernel.weights()[18 - i]);
        }
        assert!(kernel.weights()[9] > kernel.weights()[8]);
    }

    #[test]
    fn reflection_skips_the_edge_cell() {
        assert_eq!(reflect_101(-1, 5), 1);
        assert_eq!(reflect_101(-2, 5), 2);
        assert_eq!(reflect_101(5, 5), 3);
        assert_eq!(reflect_101(6, 5), 2);
        assert_eq!(reflect_101(-30, 5), 2);
        assert_eq!(reflect_101(7, 1), 0);
    }

    #[test]
    fn blur_keeps_a_constant_grid_constant() {
        let src = DMatrix::<u8>::from_element(8, 6, 200);
        let blurred = gaussian_blur(&src, &GaussianKernel::new(21, 7.0));
        assert!(blurred.iter().all(|&v| v == 200));
    }

    #[test]
    fn blur_spreads_a_block() {
        let mut src = DMatrix::<u8>::zeros(20, 20);
        for r in 8..12 {
            for c in 8..12 {
                src[(r, c)] = 255;
            }
        }
        let blurred = gaussian_blur(&src, &GaussianKernel::new(5, 1.0));
        assert!(blurred[(7, 10)] > 0);
        assert!(blurred[(10, 10)] < 255);
        assert_eq!(blurred[(0, 0)], 0);
    }

    #[test]
    fn resize_preserves_a_large_obstacle() {
        let mut src = DMatrix::<u8>::zeros(120, 160);
        for r in 60..120 {
            for c in 0..80 {
                src[(r, c)] = 1;
            }
        }
        let resized = resize_binary(&src, GridShape::new(60, 60));
        assert_eq!(resized.nrows(), 60);
        assert_eq!(resized.ncols(), 60);
        assert_eq!(resized[(50, 10)], 1);
        assert_eq!(resized[(10, 50)], 0);
        assert!(resized.iter().all(|&v| v <= 1));
    }

    #[test]
    fn gray_image_round_trip_keeps_orientation() {
        let mut src = DMatrix::<u8>::zeros(2, 3);
        src[(1, 2)] = 1;
        let img = to_gray_image(&src, 255);
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(2, 1).0[0], 255);
        assert_eq!(from_gray_image(&img).map(|v| v / 255), src);
    }
}
