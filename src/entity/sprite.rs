use glam::Vec2;

use crate::constants::LCD_HEIGHT;

/// A 1-bit image, up to 8 pixels wide. Each row is a byte, most significant bit on the left.
#[derive(Debug, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u8,
    pub height: u8,
    pub rows: &'static [u8],
}

impl Bitmap {
    /// Returns true if the pixel at `(x, y)` within the bitmap is set.
    pub fn is_set(&self, x: u8, y: u8) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.rows
            .get(y as usize)
            .is_some_and(|row| row & (0b1000_0000 >> x) != 0)
    }
}

/// An axis-aligned rectangle drawn with a shared bitmap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub pos: Vec2,
    pub width: u8,
    pub height: u8,
    pub bitmap: &'static Bitmap,
}

impl Sprite {
    pub fn new(x: f32, y: f32, bitmap: &'static Bitmap) -> Self {
        Self {
            pos: Vec2::new(x, y),
            width: bitmap.width,
            height: bitmap.height,
            bitmap,
        }
    }

    /// A sprite parked just below the screen, where it is neither drawn nor collided with.
    pub fn off_screen(bitmap: &'static Bitmap) -> Self {
        Self::new(0.0, (LCD_HEIGHT + 1) as f32, bitmap)
    }

    /// Swaps the bitmap, resizing the sprite to match.
    pub fn set_bitmap(&mut self, bitmap: &'static Bitmap) {
        self.bitmap = bitmap;
        self.width = bitmap.width;
        self.height = bitmap.height;
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    /// The first column right of the sprite.
    pub fn right(&self) -> f32 {
        self.pos.x + f32::from(self.width)
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    /// The first row below the sprite.
    pub fn bottom(&self) -> f32 {
        self.pos.y + f32::from(self.height)
    }

    /// Returns true once the whole sprite has scrolled past the bottom edge of the screen.
    pub fn is_past_bottom(&self) -> bool {
        self.pos.y >= LCD_HEIGHT as f32
    }

    /// Live sprites take part in collisions: anything not yet past the bottom edge.
    pub fn is_live(&self) -> bool {
        !self.is_past_bottom()
    }

    /// Moves the sprite below the screen so that it no longer takes part in the game.
    pub fn banish(&mut self) {
        self.pos.y = (LCD_HEIGHT + 1) as f32;
    }

    /// The screen row the sprite's bottom edge sits on.
    pub fn bottom_row(&self) -> i32 {
        self.bottom().ceil() as i32 - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::bitmaps::CAR;

    #[test]
    fn test_bitmap_pixels() {
        // Top row of the car is 0b0110_0000
        assert!(!CAR.is_set(0, 0));
        assert!(CAR.is_set(1, 0));
        assert!(CAR.is_set(2, 0));
        assert!(!CAR.is_set(3, 0));
        assert!(!CAR.is_set(8, 0));
        assert!(!CAR.is_set(0, 200));
    }

    #[test]
    fn test_banish_puts_sprite_past_bottom() {
        let mut sprite = Sprite::new(40.0, 10.0, &CAR);
        assert!(sprite.is_live());
        sprite.banish();
        assert!(sprite.is_past_bottom());
        assert!(!Sprite::off_screen(&CAR).is_live());
    }

    #[test]
    fn test_edges() {
        let sprite = Sprite::new(30.0, 5.0, &CAR);
        assert_eq!(sprite.right(), 34.0);
        assert_eq!(sprite.bottom(), 10.0);
        assert_eq!(sprite.bottom_row(), 9);
    }
}
