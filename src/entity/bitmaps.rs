//! The bitmaps for every sprite in the game.

use crate::entity::sprite::Bitmap;

pub static CAR: Bitmap = Bitmap {
    width: 4,
    height: 5,
    rows: &[0b0110_0000, 0b1111_0000, 0b0110_0000, 0b0110_0000, 0b1111_0000],
};

pub static FUEL_STATION: Bitmap = Bitmap {
    width: 6,
    height: 8,
    rows: &[
        0b1111_1100,
        0b1000_0100,
        0b1011_0100,
        0b1010_0100,
        0b1011_0100,
        0b1010_0100,
        0b1000_0100,
        0b1111_1100,
    ],
};

static TREE: Bitmap = Bitmap {
    width: 5,
    height: 6,
    rows: &[0b0010_0000, 0b0111_0000, 0b1111_1000, 0b0111_0000, 0b0010_0000, 0b0010_0000],
};

static ROCK: Bitmap = Bitmap {
    width: 4,
    height: 3,
    rows: &[0b0110_0000, 0b1101_0000, 0b1111_0000],
};

static HOUSE: Bitmap = Bitmap {
    width: 7,
    height: 6,
    rows: &[
        0b0001_0000,
        0b0010_1000,
        0b0100_0100,
        0b1111_1110,
        0b1001_0010,
        0b1111_1110,
    ],
};

static ZOMBIE: Bitmap = Bitmap {
    width: 3,
    height: 5,
    rows: &[0b1110_0000, 0b0100_0000, 0b1110_0000, 0b0100_0000, 0b1010_0000],
};

static POTHOLE: Bitmap = Bitmap {
    width: 4,
    height: 3,
    rows: &[0b0110_0000, 0b1001_0000, 0b0110_0000],
};

static OIL_SLICK: Bitmap = Bitmap {
    width: 5,
    height: 4,
    rows: &[0b0110_0000, 0b1111_1000, 0b0111_1000, 0b0011_0000],
};

pub static TERRAIN: [&Bitmap; 3] = [&TREE, &ROCK, &HOUSE];
pub static HAZARDS: [&Bitmap; 3] = [&ZOMBIE, &POTHOLE, &OIL_SLICK];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitmap_dimensions_match_rows() {
        for bitmap in TERRAIN.iter().chain(HAZARDS.iter()).chain([&&CAR, &&FUEL_STATION]) {
            assert_eq!(bitmap.rows.len(), bitmap.height as usize);
            assert!(bitmap.width <= 8);
            let unused = 0xFFu8.checked_shr(u32::from(bitmap.width)).unwrap_or(0);
            assert!(bitmap.rows.iter().all(|row| row & unused == 0));
        }
    }
}
