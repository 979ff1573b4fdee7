//! Draws the 16x8 LED matrix onto any `embedded-graphics` target, one
//! filled square per LED, so the game runs on an LCD.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

use crate::colour::PixelColour;
use crate::config::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::hal::PixelSink;

/// Matrix rows run bottom to top on screen and columns right to left, so
/// the playfield appears upright with column 7 on the left edge.
pub struct MatrixDisplay<D> {
    target: D,
    origin: Point,
    cell: u32,
}

impl<D> MatrixDisplay<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    pub fn new(target: D, origin: Point, cell: u32) -> Self {
        Self { target, origin, cell }
    }

    /// Screen area covered by the field.
    pub fn bounds(&self) -> Rectangle {
        Rectangle::new(
            self.origin,
            Size::new(FIELD_WIDTH as u32 * self.cell, FIELD_HEIGHT as u32 * self.cell),
        )
    }

    pub fn target_mut(&mut self) -> &mut D {
        &mut self.target
    }

    fn cell_rect(&self, row: u8, col: u8) -> Rectangle {
        let x = (FIELD_WIDTH - 1 - col) as i32 * self.cell as i32;
        let y = (FIELD_HEIGHT - 1 - row) as i32 * self.cell as i32;
        Rectangle::new(self.origin + Point::new(x, y), Size::new_equal(self.cell))
    }

    fn fill(&mut self, area: Rectangle, colour: Rgb565) {
        if area
            .into_styled(PrimitiveStyle::with_fill(colour))
            .draw(&mut self.target)
            .is_err()
        {
            log::warn!("matrix draw failed");
        }
    }
}

impl<D> PixelSink for MatrixDisplay<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    fn set_pixel(&mut self, row: u8, col: u8, colour: PixelColour) {
        if row >= FIELD_HEIGHT || col >= FIELD_WIDTH {
            return;
        }
        let area = self.cell_rect(row, col);
        self.fill(area, colour.into());
    }

    fn clear(&mut self) {
        let area = self.bounds();
        self.fill(area, PixelColour::BACKGROUND.into());
    }
}
