use tracing::{debug, info};

use crate::constants::{COLLISION_PENALTY, FUEL_MAX};
use crate::entity::obstacle::{HazardPool, TerrainPool};
use crate::entity::player::Player;
use crate::entity::sprite::Sprite;
use crate::map::road::Road;

/// Axis-aligned bounding box overlap.
///
/// Boxes that merely touch along an edge do not overlap. Collision is deliberately
/// bounding-box only: transparent bitmap pixels still count.
pub fn intersects(a: &Sprite, b: &Sprite) -> bool {
    !(a.right() <= b.left() || a.left() >= b.right() || a.bottom() <= b.top() || a.top() >= b.bottom())
}

/// Everything on screen the player can run into.
#[derive(Clone, Copy)]
pub struct Scene<'a> {
    pub terrain: &'a TerrainPool,
    pub hazards: &'a HazardPool,
    pub station: &'a Sprite,
}

impl<'a> Scene<'a> {
    /// All live obstacle sprites, including the fuel station.
    pub fn sprites(&self) -> impl Iterator<Item = &'a Sprite> + 'a {
        self.terrain
            .live()
            .chain(self.hazards.live())
            .chain(Some(self.station).filter(|s| s.is_live()))
    }

    /// Returns true if `sprite` overlaps any live obstacle other than itself.
    pub fn check_collision(&self, sprite: &Sprite) -> bool {
        self.sprites()
            .any(|other| !std::ptr::eq(other, sprite) && intersects(sprite, other))
    }
}

/// What a crash did to the car.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionOutcome {
    /// The car is damaged but still drivable.
    Damaged { condition: u8 },
    /// The car's condition reached zero.
    Wrecked,
}

/// Applies the consequences of a crash.
///
/// The car stops, the tank is refilled, and condition drops by [`COLLISION_PENALTY`]. The car
/// is placed back in the middle of the road, and any hazard just ahead of it is cleared so the
/// player does not crash again immediately.
pub fn handle_collision(player: &mut Player, road: &Road, hazards: &mut HazardPool) -> CollisionOutcome {
    player.speed = 0.0;
    player.fuel = FUEL_MAX;
    player.condition = player.condition.saturating_sub(COLLISION_PENALTY);

    player.recenter(road);

    let car = player.sprite;
    let cleared = hazards.clear_band(car.top() - f32::from(car.height), car.bottom());
    debug!(cleared, condition = player.condition, "Collision handled");

    if player.condition == 0 {
        info!("Car wrecked");
        CollisionOutcome::Wrecked
    } else {
        CollisionOutcome::Damaged {
            condition: player.condition,
        }
    }
}
