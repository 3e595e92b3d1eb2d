//! This module contains all the constants used in the game.

use std::ops::RangeInclusive;
use std::time::Duration;

/// The main loop frequency, in ticks per second.
pub const LOOP_FREQ: f32 = 60.0;
pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// The period of the input sampling timer (an 8MHz clock, prescaled by 256, overflowing every 256 counts).
pub const SAMPLE_PERIOD: Duration = Duration::from_micros(8192);

/// The width of the LCD, in pixels.
pub const LCD_WIDTH: i32 = 84;
/// The height of the LCD, in pixels.
pub const LCD_HEIGHT: i32 = 48;
pub const LCD_MAX_CONTRAST: u8 = 0x7F;
/// The column separating the dashboard from the playable area.
pub const DASHBOARD_BORDER_X: i32 = 26;

/// The number of consecutive identical samples required before a control changes state.
pub const DEBOUNCE_SAMPLES: usize = 6;
/// The maximum value of an analog channel (10-bit ADC).
pub const ANALOG_MAX: u16 = 1023;

/// Divides the player's speed to get the number of world steps per tick.
pub const SPEED_FACTOR: f32 = 4.0;
pub const SPEED_MIN: f32 = 0.0;
pub const SPEED_MAX: f32 = 10.0;
/// The speed ceiling while off-road, relative to `SPEED_MAX`.
pub const SPEED_OFFROAD_MAX: f32 = 3.0;
/// The speed the car settles at when no pedal is held.
pub const SPEED_COAST: f32 = 1.0;

/// Braking takes the car from full speed to a standstill in 2 seconds.
pub const BRAKE_RATE: f32 = SPEED_MAX / (2.0 * LOOP_FREQ);
/// Accelerating takes the car from coasting speed to full speed in 5 seconds.
pub const THROTTLE_RATE: f32 = (SPEED_MAX - SPEED_COAST) / (5.0 * LOOP_FREQ);
/// Coasting from full speed back down to `SPEED_COAST` takes 3 seconds.
pub const COAST_DOWN_RATE: f32 = (SPEED_MAX - SPEED_COAST) / (3.0 * LOOP_FREQ);
/// Coasting up from a standstill to `SPEED_COAST` takes 2.5 seconds.
pub const COAST_UP_RATE: f32 = SPEED_COAST / (2.5 * LOOP_FREQ);

pub const ROAD_WIDTH: i32 = 16;
/// The number of steps the road must take before it can move horizontally again.
pub const ROAD_CURVE: RangeInclusive<u8> = 2..=3;
/// The number of steps the road takes before it changes direction.
pub const ROAD_SECTION: RangeInclusive<u8> = 15..=35;

pub const N_TERRAIN: usize = 4;
pub const N_HAZARD: usize = 3;
/// The percent chance, per step, that an off-screen hazard comes back.
pub const HAZARD_SPAWN_CHANCE: u32 = 5;

pub const FUEL_MAX: f32 = 100.0;
pub const FUEL_BURN_PER_STEP: f32 = 0.05;
/// Refuelling fills an empty tank in 3 seconds.
pub const FUEL_REFILL_PER_TICK: f32 = FUEL_MAX / (3.0 * LOOP_FREQ);
/// The number of steps between fuel stations.
pub const FUEL_STATION_INTERVAL: RangeInclusive<i32> = 150..=300;
/// Extra straight road rows beyond the height of the fuel station.
pub const FUEL_STATION_MARGIN: u8 = 4;
pub const REFUEL_SPEED_THRESHOLD: f32 = 2.0;
/// The largest horizontal gap, in pixels, between the car and the station that still allows refuelling.
pub const REFUEL_ADJACENT_DISTANCE: f32 = 2.0;

pub const CONDITION_MAX: u8 = 100;
pub const COLLISION_PENALTY: u8 = 25;

/// The number of steps to the finish line.
pub const FINISH_DISTANCE: u32 = 3000;
