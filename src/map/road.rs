//! The road: a column of left-edge offsets, one per screen row, generated at the top and
//! scrolled down one row per step.

use rand::Rng;
use strum_macros::{Display, EnumIter};
use tracing::trace;

use crate::constants::{DASHBOARD_BORDER_X, LCD_HEIGHT, LCD_WIDTH, ROAD_CURVE, ROAD_SECTION, ROAD_WIDTH};

const ROWS: usize = LCD_HEIGHT as usize;

/// The direction new road rows drift in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display)]
pub enum RoadDirection {
    Left,
    Right,
    Straight,
}

impl RoadDirection {
    pub fn dx(self) -> i32 {
        match self {
            RoadDirection::Left => -1,
            RoadDirection::Right => 1,
            RoadDirection::Straight => 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Road {
    /// The x-coordinate of the road's left edge on each screen row, top row first.
    rows: [i32; ROWS],
    direction: RoadDirection,
    /// Steps that must pass between two horizontal moves.
    curve_threshold: u8,
    /// Steps left before the direction is rerolled.
    section_remaining: u8,
    /// Steps since the last horizontal move.
    step_counter: u8,
}

impl Road {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut road = Self {
            rows: [0; ROWS],
            direction: RoadDirection::Straight,
            curve_threshold: *ROAD_CURVE.start(),
            section_remaining: *ROAD_SECTION.start(),
            step_counter: 0,
        };
        road.reset(rng);
        road
    }

    /// The left edge of a road centred in the playable area.
    pub fn centred_x() -> i32 {
        (LCD_WIDTH - DASHBOARD_BORDER_X) / 2 - ROAD_WIDTH / 2 + DASHBOARD_BORDER_X - 1
    }

    /// Straightens the road in the middle of the playable area. The first section is always straight.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.fill(Self::centred_x());
        self.step_counter = 0;
        self.curve_threshold = *ROAD_CURVE.start();
        self.direction = RoadDirection::Straight;
        self.section_remaining = rng.random_range(ROAD_SECTION);
    }

    /// Sets every row to the same offset.
    pub fn fill(&mut self, x: i32) {
        self.rows = [x; ROWS];
    }

    /// Generates a new top row and scrolls the rest down by one, dropping the bottom row.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.step_counter = self.step_counter.saturating_add(1);

        let mut x = self.rows[0];
        let dx = self.direction.dx();
        let fits = x + dx > DASHBOARD_BORDER_X && x + dx + ROAD_WIDTH < LCD_WIDTH - 1;
        if fits && self.step_counter > self.curve_threshold {
            self.step_counter = 0;
            x += dx;
        }

        self.rows.copy_within(0..ROWS - 1, 1);
        self.rows[0] = x;

        self.section_remaining = self.section_remaining.wrapping_sub(1);
        // A wrapped counter is treated the same as one that reached zero
        if self.section_remaining == 0 || self.section_remaining > *ROAD_SECTION.end() {
            self.reroll(rng);
        }
    }

    /// Starts a new section. After the first straight, sections always curve.
    fn reroll<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.direction = if rng.random_bool(0.5) {
            RoadDirection::Left
        } else {
            RoadDirection::Right
        };
        self.curve_threshold = rng.random_range(ROAD_CURVE);
        self.section_remaining = rng.random_range(ROAD_SECTION);
        self.step_counter = 0;
        trace!(
            direction = %self.direction,
            curve = self.curve_threshold,
            length = self.section_remaining,
            "New road section"
        );
    }

    /// Keeps the road straight for at least the next `rows` steps.
    pub fn force_straight(&mut self, rows: u8) {
        self.direction = RoadDirection::Straight;
        self.section_remaining = self.section_remaining.max(rows);
    }

    /// The road's left edge on screen row `row`. Rows off the screen use the nearest edge row.
    pub fn x_at(&self, row: i32) -> i32 {
        self.rows[row.clamp(0, LCD_HEIGHT - 1) as usize]
    }

    /// The left edge of the most recently generated row.
    pub fn top(&self) -> i32 {
        self.rows[0]
    }

    pub fn center_x(&self, row: i32) -> i32 {
        self.x_at(row) + ROAD_WIDTH / 2
    }

    /// Returns true if the horizontal span `left..right` lies within the road on `row`.
    pub fn contains_span(&self, left: f32, right: f32, row: i32) -> bool {
        let x = self.x_at(row) as f32;
        left >= x && right <= x + ROAD_WIDTH as f32
    }

    pub fn rows(&self) -> &[i32] {
        &self.rows
    }

    pub fn direction(&self) -> RoadDirection {
        self.direction
    }

    pub fn curve_threshold(&self) -> u8 {
        self.curve_threshold
    }

    pub fn section_remaining(&self) -> u8 {
        self.section_remaining
    }
}
