//! Drawing. The game draws through [`RenderSink`] in LCD pixel coordinates and never
//! touches the display directly.

use std::fmt;

use crate::entity::sprite::{Bitmap, Sprite};
use crate::error::RenderError;

pub mod recording;
pub mod screens;

pub use recording::{DrawCommand, RecordingSink};

/// The drawing primitives of a monochrome LCD.
///
/// Every frame is a `clear`, a run of draw calls, then `present`.
pub trait RenderSink {
    fn clear(&mut self) -> Result<(), RenderError>;

    fn pixel(&mut self, x: i32, y: i32) -> Result<(), RenderError>;

    fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) -> Result<(), RenderError>;

    /// Draws the outline of a `width` by `height` rectangle with its top-left corner at `(x, y)`.
    fn rect_outline(&mut self, x: i32, y: i32, width: i32, height: i32) -> Result<(), RenderError> {
        let (x1, y1) = (x + width - 1, y + height - 1);
        self.line(x, y, x1, y)?;
        self.line(x, y1, x1, y1)?;
        self.line(x, y, x, y1)?;
        self.line(x1, y, x1, y1)
    }

    fn string(&mut self, x: i32, y: i32, text: &str) -> Result<(), RenderError>;

    /// Draws formatted text, e.g. `sink.text(10, 2, format_args!("{}", fuel))`.
    fn text(&mut self, x: i32, y: i32, args: fmt::Arguments<'_>) -> Result<(), RenderError> {
        match args.as_str() {
            Some(text) => self.string(x, y, text),
            None => self.string(x, y, &args.to_string()),
        }
    }

    /// Draws the set pixels of a bitmap with its top-left corner at `(x, y)`.
    fn bitmap(&mut self, x: i32, y: i32, bitmap: &Bitmap) -> Result<(), RenderError> {
        for row in 0..bitmap.height {
            for col in 0..bitmap.width {
                if bitmap.is_set(col, row) {
                    self.pixel(x + i32::from(col), y + i32::from(row))?;
                }
            }
        }
        Ok(())
    }

    /// Draws a sprite at its position, rounded to the nearest pixel. Sprites past the bottom are skipped.
    fn sprite(&mut self, sprite: &Sprite) -> Result<(), RenderError> {
        if !sprite.is_live() {
            return Ok(());
        }
        self.bitmap(sprite.pos.x.round() as i32, sprite.pos.y.round() as i32, sprite.bitmap)
    }

    fn set_contrast(&mut self, contrast: u8) -> Result<(), RenderError>;

    fn present(&mut self) -> Result<(), RenderError>;
}
