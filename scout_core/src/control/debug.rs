// scout_core/src/control/debug.rs

//! Debug overlays drawn onto the controller's debug image. Drawing never
//! changes a control decision, and each overlay is drawn at most once per
//! iteration.

use embedded_graphics::{
    mono_font::{
        ascii::{FONT_10X20, FONT_6X10},
        MonoTextStyle,
    },
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Circle, Line, PrimitiveStyle, Rectangle},
    text::Text,
};
use image::{GrayImage, Luma};
use nalgebra::DMatrix;
use tracing::trace;

use super::error::ControlError;
use super::iteration::Once;
use super::steering::SteeringController;
use crate::mapping::filters;
use crate::rendering::{to_point, RgbCanvas};
use crate::types::{Cell, ObjectPosition};

// --- Palette ---
const COLLIDING: Rgb888 = Rgb888::new(255, 255, 0);
const CLEAR: Rgb888 = Rgb888::new(0, 0, 255);
const DIRECTION: Rgb888 = Rgb888::new(255, 0, 255);
const TARGET: Rgb888 = Rgb888::new(200, 0, 200);
const PATH: Rgb888 = Rgb888::new(255, 255, 255);
const BANNER: Rgb888 = Rgb888::new(0, 0, 255);

const BANNER_TEXT: &str = "Signaling!";
/// Debug images at least this wide get the large font.
const LARGE_FONT_WIDTH: u32 = 320;

impl SteeringController {
    /// Fills every probe block: yellow when colliding, blue when clear.
    pub fn draw_collisions(&mut self) -> Result<(), ControlError> {
        if self.cache.is_done(Once::CollisionsDrawn) {
            return Ok(());
        }
        let collisions = self.check_collisions()?;
        let to_debug = self.grid_to_debug()?;
        let size = self.probes.block_size() as isize;
        let blocks: Vec<(Cell, bool)> = self.probes.blocks().iter().copied().zip(collisions).collect();

        let image = self.debug_image.as_mut().ok_or(ControlError::MapNotSet)?;
        let mut canvas = RgbCanvas::new(image);
        for (block, colliding) in blocks {
            let top_left = to_debug.apply(block);
            let bottom_right = to_debug.apply(block.offset(size, size));
            let color = if colliding { COLLIDING } else { CLEAR };
            let _ = Rectangle::with_corners(to_point(top_left), to_point(bottom_right))
                .into_styled(PrimitiveStyle::with_fill(color))
                .draw(&mut canvas);
        }

        self.cache.mark_done(Once::CollisionsDrawn);
        Ok(())
    }

    /// Draws the command indicator, the planned path, the target marker and the
    /// signalling banner.
    ///
    /// The indicator is a line from the grid centre whose vertical extent is the
    /// linear command and horizontal extent the angular command, each scaled by
    /// `dimension / 500`.
    pub fn draw_direction(&mut self, target: Option<ObjectPosition>) -> Result<(), ControlError> {
        if self.cache.is_done(Once::DirectionDrawn) {
            return Ok(());
        }
        let command = self.compute_direction(target)?;
        let signal = self.should_signal(target);
        let path = match target {
            Some(t) if self.is_seeking_target(target) => {
                self.sync_planner()?;
                let start = self.forward_reference();
                self.planner.find_path_smoothed(start, t.center())
            }
            _ => None,
        };

        let to_debug = self.grid_to_debug()?;
        let shape = self.grid_shape();
        let image = self.debug_image.as_mut().ok_or(ControlError::MapNotSet)?;
        let (debug_width, debug_height) = image.dimensions();
        let thickness = debug_height / 60 + 1;
        let radius = debug_height / 50 + 1;
        let mut canvas = RgbCanvas::new(image);

        if let Some(path) = path {
            let style = PrimitiveStyle::with_stroke(PATH, 1);
            for segment in path.windows(2) {
                let _ = Line::new(
                    to_point(to_debug.apply(segment[0])),
                    to_point(to_debug.apply(segment[1])),
                )
                .into_styled(style)
                .draw(&mut canvas);
            }
        }

        let (rows, cols) = (shape.rows as isize, shape.cols as isize);
        let centre = Cell::new(rows / 2, cols / 2);
        let tip = centre.offset(
            (-(command.linear as isize) * rows).div_euclid(500),
            (-(command.angular as isize) * cols).div_euclid(500),
        );
        let centre = to_point(to_debug.apply(centre));
        let _ = Line::new(centre, to_point(to_debug.apply(tip)))
            .into_styled(PrimitiveStyle::with_stroke(DIRECTION, thickness))
            .draw(&mut canvas);
        let _ = Circle::with_center(centre, 2 * radius + 1)
            .into_styled(PrimitiveStyle::with_fill(DIRECTION))
            .draw(&mut canvas);

        if let Some(t) = target {
            let marker = to_point(to_debug.apply(t.center()));
            let arm = (thickness * 3 / 2) as i32;
            let cross = PrimitiveStyle::with_stroke(TARGET, thickness);
            let _ = Line::new(marker - Point::new(arm, 0), marker + Point::new(arm, 0))
                .into_styled(cross)
                .draw(&mut canvas);
            let _ = Line::new(marker - Point::new(0, arm), marker + Point::new(0, arm))
                .into_styled(cross)
                .draw(&mut canvas);

            let (height, width) = to_debug.apply_size(t.height, t.width);
            let half = Point::new((width / 2) as i32, (height / 2) as i32);
            let _ = Rectangle::with_corners(marker - half, marker + half)
                .into_styled(PrimitiveStyle::with_stroke(TARGET, thickness / 4 + 1))
                .draw(&mut canvas);
        }

        if signal {
            let font = if debug_width >= LARGE_FONT_WIDTH {
                &FONT_10X20
            } else {
                &FONT_6X10
            };
            let _ = Text::new(BANNER_TEXT, Point::new(10, 30), MonoTextStyle::new(font, BANNER))
                .draw(&mut canvas);
        }

        trace!(
            "[SteeringController] direction overlay: command={:?} signal={}",
            command,
            signal
        );
        self.cache.mark_done(Once::DirectionDrawn);
        Ok(())
    }

    /// Runs a full planning pass on `raw` and tiles the intermediate grids into
    /// one grayscale image, three rows of two tiles:
    ///
    /// | raw                 | expanded      |
    /// |---------------------|---------------|
    /// | cost / multiplier   | visited cells |
    /// | smoothed path       | raw + path    |
    ///
    /// `goal` is in original-image pixels. This starts a new iteration and does
    /// not carve any target region.
    pub fn processing_snapshot(
        &mut self,
        raw: &DMatrix<u8>,
        goal: Cell,
    ) -> Result<GrayImage, ControlError> {
        self.set_map(Some(raw), None)?;
        let goal = self.original_to_grid()?.apply(goal);
        self.sync_planner()?;

        let start = self.forward_reference();
        let shape = self.grid_shape();
        let blank = || DMatrix::<u8>::zeros(shape.rows, shape.cols);
        let path = self.planner.smoothed_path_map(start, goal).unwrap_or_else(blank);
        let visited = self.planner.visited_map().cloned().unwrap_or_else(blank);

        let layers = self.layers.as_ref().ok_or(ControlError::MapNotSet)?;
        let multiplier = self.config.cost_field.multiplier;
        let cost = layers.cost.map(|v| {
            if multiplier > 0.0 {
                (v / multiplier).clamp(0.0, 255.0) as u8
            } else {
                0
            }
        });
        let overlay = layers.raw.zip_map(&path, |a, b| a.max(b));

        let tiles = [
            filters::to_gray_image(&layers.raw, 255),
            filters::to_gray_image(&layers.expanded, 255),
            filters::to_gray_image(&cost, 1),
            filters::to_gray_image(&visited, 255),
            filters::to_gray_image(&path, 255),
            filters::to_gray_image(&overlay, 255),
        ];

        let (tile_w, tile_h) = (shape.cols as u32, shape.rows as u32);
        let mut sheet = GrayImage::from_pixel(tile_w * 2, tile_h * 3, Luma([0]));
        for (i, tile) in tiles.iter().enumerate() {
            let (x0, y0) = ((i as u32 % 2) * tile_w, (i as u32 / 2) * tile_h);
            for (x, y, px) in tile.enumerate_pixels() {
                sheet.put_pixel(x0 + x, y0 + y, *px);
            }
        }
        Ok(sheet)
    }
}
