//! The fuel station: when it appears, where it goes, and refuelling at it.

use rand::Rng;
use smallvec::SmallVec;
use strum_macros::Display;
use tracing::{debug, info};

use crate::constants::{
    DASHBOARD_BORDER_X, FUEL_MAX, FUEL_REFILL_PER_TICK, FUEL_STATION_INTERVAL, FUEL_STATION_MARGIN, LCD_WIDTH,
    REFUEL_ADJACENT_DISTANCE, REFUEL_SPEED_THRESHOLD, ROAD_WIDTH,
};
use crate::entity::bitmaps::FUEL_STATION;
use crate::entity::obstacle::{Side, TerrainPool};
use crate::entity::player::Player;
use crate::entity::sprite::Sprite;
use crate::map::road::Road;

/// Whether a new station may be spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SchedulerState {
    /// The countdown is still running, or the previous station is still on screen.
    Waiting,
    Eligible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum RefuelState {
    #[default]
    Idle,
    Refuelling,
}

#[derive(Debug, Clone)]
pub struct FuelStation {
    pub sprite: Sprite,
    /// Steps until the next station may spawn. Goes negative while waiting for the last one to leave.
    countdown: i32,
    refuel: RefuelState,
}

impl Default for FuelStation {
    fn default() -> Self {
        Self {
            sprite: Sprite::off_screen(&FUEL_STATION),
            countdown: *FUEL_STATION_INTERVAL.start(),
            refuel: RefuelState::Idle,
        }
    }
}

impl FuelStation {
    /// Parks the station off-screen and starts a fresh countdown.
    pub fn setup<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.sprite.banish();
        self.countdown = rng.random_range(FUEL_STATION_INTERVAL);
        self.refuel = RefuelState::Idle;
    }

    pub fn state(&self) -> SchedulerState {
        if self.countdown < 0 && self.sprite.is_past_bottom() {
            SchedulerState::Eligible
        } else {
            SchedulerState::Waiting
        }
    }

    pub fn countdown(&self) -> i32 {
        self.countdown
    }

    pub fn refuel_state(&self) -> RefuelState {
        self.refuel
    }

    /// Scrolls the station down one row and spawns a new one once it is due. Returns true on a spawn.
    pub fn step<R: Rng + ?Sized>(&mut self, road: &mut Road, terrain: &mut TerrainPool, rng: &mut R) -> bool {
        if self.sprite.is_live() {
            self.sprite.pos.y += 1.0;
        }
        self.countdown = self.countdown.saturating_sub(1);

        match self.state() {
            SchedulerState::Eligible => self.reset(road, terrain, rng),
            SchedulerState::Waiting => false,
        }
    }

    /// The station's x position on `side` of a road whose left edge is at `road_x`, if it fits.
    fn x_on(side: Side, road_x: i32) -> Option<i32> {
        let width = i32::from(FUEL_STATION.width);
        match side {
            Side::Left => Some(road_x - width - 1).filter(|&x| x > DASHBOARD_BORDER_X),
            Side::Right => Some(road_x + ROAD_WIDTH + 2).filter(|&x| x + width <= LCD_WIDTH - 1),
        }
    }

    /// Spawns the station just above the top of the screen.
    ///
    /// The road is forced straight alongside the station so that the car can pull up next to
    /// it, and any terrain in the way is moved. Returns false if no side of the road had room.
    pub fn reset<R: Rng + ?Sized>(&mut self, road: &mut Road, terrain: &mut TerrainPool, rng: &mut R) -> bool {
        road.force_straight(FUEL_STATION.height + FUEL_STATION_MARGIN);
        self.countdown = rng.random_range(FUEL_STATION_INTERVAL);

        let road_x = road.top();
        let preferred = Side::random(rng);
        let Some(x) = Self::x_on(preferred, road_x).or_else(|| Self::x_on(preferred.opposite(), road_x)) else {
            self.sprite.banish();
            return false;
        };

        self.sprite.pos.x = x as f32;
        self.sprite.pos.y = (1 - i32::from(self.sprite.height)) as f32;

        let displaced: SmallVec<[usize; 4]> = terrain.overlapping(&self.sprite).collect();
        for &slot in &displaced {
            terrain.reset(slot, 0, road, Some(&self.sprite), rng);
        }

        debug!(x, displaced = displaced.len(), next = self.countdown, "Fuel station spawned");
        true
    }

    /// Returns true if the car is stopped (or nearly) right next to the station with the brake held.
    pub fn can_refuel(&self, player: &Player, brake: bool) -> bool {
        if !brake || player.speed >= REFUEL_SPEED_THRESHOLD || player.fuel >= FUEL_MAX || !self.sprite.is_live() {
            return false;
        }

        let car = &player.sprite;
        let vertical = car.bottom() > self.sprite.top() && car.top() < self.sprite.bottom();
        let gap_right = self.sprite.left() - car.right();
        let gap_left = car.left() - self.sprite.right();
        let adjacent = (0.0..=REFUEL_ADJACENT_DISTANCE).contains(&gap_right)
            || (0.0..=REFUEL_ADJACENT_DISTANCE).contains(&gap_left);

        vertical && adjacent
    }

    /// Advances the refuelling interaction by one tick.
    ///
    /// While refuelling the car is held at a standstill and the tank fills at a fixed rate.
    /// Letting go of the brake, moving off, or filling the tank ends it.
    pub fn update_refuel(&mut self, player: &mut Player, brake: bool) -> RefuelState {
        self.refuel = match self.refuel {
            RefuelState::Idle if self.can_refuel(player, brake) => {
                info!(fuel = player.fuel, "Refuelling");
                player.speed = 0.0;
                RefuelState::Refuelling
            }
            RefuelState::Idle => RefuelState::Idle,
            RefuelState::Refuelling if !brake || player.speed > 0.0 => {
                debug!(fuel = player.fuel, "Refuelling cancelled");
                RefuelState::Idle
            }
            RefuelState::Refuelling => {
                player.speed = 0.0;
                if player.add_fuel(FUEL_REFILL_PER_TICK) {
                    info!("Tank full");
                    RefuelState::Idle
                } else {
                    RefuelState::Refuelling
                }
            }
        };
        self.refuel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::obstacle::ObstacleKind;
    use crate::entity::player::Steering;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_waits_for_countdown() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut road = Road::new(&mut rng);
        let mut terrain = TerrainPool::new(ObstacleKind::Terrain);
        let mut station = FuelStation::default();
        station.setup(&mut rng);

        let countdown = station.countdown();
        for _ in 0..countdown {
            assert_eq!(station.state(), SchedulerState::Waiting);
            assert!(!station.step(&mut road, &mut terrain, &mut rng));
        }
        assert!(station.step(&mut road, &mut terrain, &mut rng));
        assert!(station.sprite.is_live());
        assert_eq!(road.direction(), crate::map::RoadDirection::Straight);
    }

    #[test]
    fn test_station_sits_beside_road() {
        for road_x in [DASHBOARD_BORDER_X + 1, Road::centred_x(), LCD_WIDTH - 2 - ROAD_WIDTH] {
            let x = FuelStation::x_on(Side::Left, road_x).or_else(|| FuelStation::x_on(Side::Right, road_x));
            let x = x.expect("one side always fits");
            let right = x + i32::from(FUEL_STATION.width);
            assert!(right < road_x || x > road_x + ROAD_WIDTH);
        }
    }

    #[test]
    fn test_refuel_cancelled_by_releasing_brake() {
        let mut station = FuelStation::default();
        station.sprite.pos = glam::Vec2::new(30.0, 38.0);
        let mut player = Player::new(Steering::default());
        player.sprite.pos = glam::Vec2::new(37.0, 41.0);
        player.speed = 0.5;
        player.fuel = 10.0;

        assert_eq!(station.update_refuel(&mut player, true), RefuelState::Refuelling);
        assert_eq!(player.speed, 0.0);
        assert_eq!(station.update_refuel(&mut player, true), RefuelState::Refuelling);
        assert!(player.fuel > 10.0);
        assert_eq!(station.update_refuel(&mut player, false), RefuelState::Idle);
    }
}
