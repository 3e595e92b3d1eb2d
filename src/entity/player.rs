//! The player's car: steering, throttle and braking, and its gauges.

use serde::Deserialize;
use strum_macros::{Display, EnumString};

use crate::constants::{
    ANALOG_MAX, BRAKE_RATE, COAST_DOWN_RATE, COAST_UP_RATE, CONDITION_MAX, DASHBOARD_BORDER_X, FUEL_BURN_PER_STEP,
    FUEL_MAX, LCD_HEIGHT, LCD_WIDTH, SPEED_COAST, SPEED_FACTOR, SPEED_MAX, SPEED_MIN, SPEED_OFFROAD_MAX,
    THROTTLE_RATE,
};
use crate::entity::bitmaps::CAR;
use crate::entity::collision::{intersects, Scene};
use crate::entity::sprite::Sprite;
use crate::map::road::Road;

/// How far the car moves sideways for one tick of steering input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Steering {
    /// The faster the car goes, the further it moves per tick.
    #[default]
    SpeedScaled,
    /// One pixel per tick, regardless of speed.
    FixedUnit,
}

impl Steering {
    pub fn displacement(self, speed: f32) -> f32 {
        match self {
            Steering::SpeedScaled => (speed / SPEED_FACTOR) / 2.0,
            Steering::FixedUnit => 1.0,
        }
    }
}

/// The pedals, as read from the debounced buttons for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pedals {
    pub brake: bool,
    pub throttle: bool,
}

/// Checks if the given coordinate falls within the playable area.
pub fn in_bounds(x: f32, y: f32) -> bool {
    if x <= DASHBOARD_BORDER_X as f32 || x > (LCD_WIDTH - 1) as f32 {
        return false;
    }
    if y <= 1.0 || y > (LCD_HEIGHT - 1) as f32 {
        return false;
    }
    true
}

/// Returns true if the sprite's horizontal span is not fully on the road at its bottom row.
pub fn offroad(sprite: &Sprite, road: &Road) -> bool {
    !road.contains_span(sprite.left(), sprite.right(), sprite.bottom_row())
}

/// The highest speed the car may reach for a speed-limit dial reading.
///
/// The dial sweeps from 1 to [`SPEED_MAX`]. Off the road the ceiling is scaled down by
/// `SPEED_OFFROAD_MAX / SPEED_MAX`, so it is always lower than on the road.
pub fn speed_ceiling(dial: u16, offroad: bool) -> f32 {
    let dial = f32::from(dial.min(ANALOG_MAX)) / f32::from(ANALOG_MAX);
    let ceiling = SPEED_COAST + dial * (SPEED_MAX - SPEED_COAST);
    if offroad {
        ceiling * SPEED_OFFROAD_MAX / SPEED_MAX
    } else {
        ceiling
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub sprite: Sprite,
    pub speed: f32,
    pub condition: u8,
    pub fuel: f32,
    /// Steps travelled since the start of the race.
    pub distance: u32,
    pub steering: Steering,
}

impl Player {
    pub fn new(steering: Steering) -> Self {
        Self {
            sprite: Sprite::off_screen(&CAR),
            speed: SPEED_MAX,
            condition: CONDITION_MAX,
            fuel: FUEL_MAX,
            distance: 0,
            steering,
        }
    }

    /// The row the car drives on, just above the bottom border.
    pub fn home_row() -> f32 {
        (LCD_HEIGHT - i32::from(CAR.height) - 2) as f32
    }

    /// Fills up the gauges and places the car in the middle of the road.
    pub fn setup(&mut self, road: &Road) {
        self.speed = SPEED_MAX;
        self.condition = CONDITION_MAX;
        self.fuel = FUEL_MAX;
        self.distance = 0;
        self.sprite.pos.y = Self::home_row();
        self.recenter(road);
    }

    /// Centres the car horizontally on the road at its current row.
    pub fn recenter(&mut self, road: &Road) {
        let centre = road.center_x(self.sprite.bottom_row());
        self.sprite.pos.x = (centre - i32::from(self.sprite.width) / 2) as f32;
    }

    /// Steers the car by one tick in the direction of `sign` (negative is left).
    ///
    /// The move is rejected if the car would leave the playable area, or if it would run
    /// sideways into an obstacle it was not already touching. Returns the distance moved.
    pub fn move_by(&mut self, sign: f32, scene: &Scene) -> f32 {
        let dx = sign.signum() * self.steering.displacement(self.speed);
        if dx == 0.0 {
            return 0.0;
        }

        let mut moved = self.sprite;
        moved.pos.x += dx;

        if !in_bounds(moved.left(), moved.top()) || !in_bounds(moved.right(), moved.top()) {
            return 0.0;
        }

        let blocked = scene
            .sprites()
            .any(|other| intersects(&moved, other) && !intersects(&self.sprite, other));
        if blocked {
            return 0.0;
        }

        self.sprite = moved;
        dx
    }

    /// Applies one tick of pedal input and clamps the speed to the dial's ceiling.
    ///
    /// Braking is the strongest force and wins over the throttle. With neither pedal held the
    /// car settles at [`SPEED_COAST`] rather than stopping.
    pub fn speed_input(&mut self, pedals: Pedals, dial: u16, road: &Road) -> f32 {
        let ceiling = speed_ceiling(dial, offroad(&self.sprite, road));

        if pedals.brake {
            self.speed -= BRAKE_RATE;
        } else if pedals.throttle {
            self.speed += THROTTLE_RATE;
        } else if self.speed > SPEED_COAST {
            self.speed = (self.speed - COAST_DOWN_RATE).max(SPEED_COAST);
        } else {
            self.speed = (self.speed + COAST_UP_RATE).min(SPEED_COAST);
        }

        self.speed = self.speed.clamp(SPEED_MIN, ceiling);
        ceiling
    }

    /// Burns fuel for one world step, never dropping below empty.
    pub fn burn_fuel(&mut self) {
        self.fuel = (self.fuel - FUEL_BURN_PER_STEP).max(0.0);
    }

    /// Adds fuel, never exceeding a full tank. Returns true once the tank is full.
    pub fn add_fuel(&mut self, amount: f32) -> bool {
        self.fuel = (self.fuel + amount).min(FUEL_MAX);
        self.fuel >= FUEL_MAX
    }

    pub fn is_out_of_fuel(&self) -> bool {
        self.fuel <= 0.0
    }
}
