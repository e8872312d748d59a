// scout_core/src/rendering/canvas.rs

use std::convert::Infallible;

use embedded_graphics::{
    pixelcolor::{BinaryColor, Rgb888, RgbColor},
    prelude::*,
};
use image::{Rgb, RgbImage};
use nalgebra::DMatrix;

/// An `embedded-graphics` draw target backed by an RGB debug image.
pub struct RgbCanvas<'a> {
    image: &'a mut RgbImage,
}

impl<'a> RgbCanvas<'a> {
    pub fn new(image: &'a mut RgbImage) -> Self {
        Self { image }
    }
}

impl OriginDimensions for RgbCanvas<'_> {
    fn size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }
}

impl DrawTarget for RgbCanvas<'_> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (width, height) = self.image.dimensions();
        for Pixel(point, color) in pixels {
            // Primitives may spill past the edges; clip silently.
            if point.x < 0 || point.y < 0 {
                continue;
            }
            let (x, y) = (point.x as u32, point.y as u32);
            if x < width && y < height {
                self.image
                    .put_pixel(x, y, Rgb([color.r(), color.g(), color.b()]));
            }
        }
        Ok(())
    }
}

/// A binary draw target over a grid matrix: `On` writes 1, `Off` writes 0.
pub struct GridCanvas<'a> {
    grid: &'a mut DMatrix<u8>,
}

impl<'a> GridCanvas<'a> {
    pub fn new(grid: &'a mut DMatrix<u8>) -> Self {
        Self { grid }
    }
}

impl OriginDimensions for GridCanvas<'_> {
    fn size(&self) -> Size {
        Size::new(self.grid.ncols() as u32, self.grid.nrows() as u32)
    }
}

impl DrawTarget for GridCanvas<'_> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (rows, cols) = self.grid.shape();
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            let (row, col) = (point.y as usize, point.x as usize);
            if row < rows && col < cols {
                self.grid[(row, col)] = u8::from(color.is_on());
            }
        }
        Ok(())
    }
}
