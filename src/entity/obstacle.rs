//! Fixed-size pools of terrain and hazards that scroll down the screen and are recycled at the top.

use std::ops::Range;

use glam::Vec2;
use rand::Rng;
use strum_macros::{Display, EnumIter};
use tracing::trace;

use crate::constants::{
    DASHBOARD_BORDER_X, HAZARD_SPAWN_CHANCE, LCD_WIDTH, N_HAZARD, N_TERRAIN, ROAD_CURVE, ROAD_WIDTH,
};
use crate::entity::bitmaps::{HAZARDS, TERRAIN};
use crate::entity::collision::intersects;
use crate::entity::sprite::{Bitmap, Sprite};
use crate::map::road::Road;

pub type TerrainPool = ObstaclePool<N_TERRAIN>;
pub type HazardPool = ObstaclePool<N_HAZARD>;

/// What a pool holds. Terrain lines the roadside; hazards sit on the road itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display)]
pub enum ObstacleKind {
    Terrain,
    Hazard,
}

/// Which side of the road (or, for hazards, which half of it) an obstacle goes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            Side::Left
        } else {
            Side::Right
        }
    }
}

impl ObstacleKind {
    pub fn bitmaps(self) -> &'static [&'static Bitmap] {
        match self {
            ObstacleKind::Terrain => &TERRAIN,
            ObstacleKind::Hazard => &HAZARDS,
        }
    }

    /// The inclusive range of x positions an obstacle of `width` may take on `side`, given the
    /// road's left edge. `None` if there is no room.
    pub fn span(self, side: Side, road_x: i32, width: i32, padding: i32) -> Option<(i32, i32)> {
        let (lo, hi) = match (self, side) {
            (ObstacleKind::Terrain, Side::Left) => (DASHBOARD_BORDER_X + 1, road_x - padding - width),
            (ObstacleKind::Terrain, Side::Right) => (road_x + ROAD_WIDTH + 1 + padding, LCD_WIDTH - 1 - width),
            (ObstacleKind::Hazard, Side::Left) => (road_x + padding, road_x + ROAD_WIDTH / 2 - width),
            (ObstacleKind::Hazard, Side::Right) => (road_x + ROAD_WIDTH / 2, road_x + ROAD_WIDTH - padding - width),
        };
        (lo <= hi).then_some((lo, hi))
    }
}

/// Distance to keep from the road's edge, so that the road curving alongside a freshly placed
/// obstacle can never run into it.
pub fn placement_padding(height: u8) -> i32 {
    i32::from(height) / (i32::from(*ROAD_CURVE.start()) + 1) + 1
}

#[derive(Debug, Clone, Copy)]
pub struct Obstacle {
    pub sprite: Sprite,
    /// Index into the kind's bitmap table.
    pub type_index: usize,
}

#[derive(Debug, Clone)]
pub struct ObstaclePool<const N: usize> {
    pub kind: ObstacleKind,
    pub members: [Obstacle; N],
}

impl<const N: usize> ObstaclePool<N> {
    /// Creates a pool with every member parked off-screen.
    pub fn new(kind: ObstacleKind) -> Self {
        let bitmap = kind.bitmaps()[0];
        Self {
            kind,
            members: std::array::from_fn(|_| Obstacle {
                sprite: Sprite::off_screen(bitmap),
                type_index: 0,
            }),
        }
    }

    /// Places every member on screen, spreading their bottom rows evenly over `rows`.
    pub fn setup<R: Rng + ?Sized>(&mut self, rows: Range<i32>, road: &Road, avoid: Option<&Sprite>, rng: &mut R) {
        for slot in 0..N {
            self.members[slot].sprite.banish();
        }
        let spacing = (rows.end - rows.start) / N.max(1) as i32;
        for slot in 0..N {
            self.reset(slot, rows.start + spacing * slot as i32, road, avoid, rng);
        }
    }

    /// Re-places a member with a new random type, with its bottom edge on row `y_bottom`.
    ///
    /// Returns false if the member ended up banished, either because neither side of the road
    /// had room or because the new spot overlapped another live member (or `avoid`).
    pub fn reset<R: Rng + ?Sized>(
        &mut self,
        slot: usize,
        y_bottom: i32,
        road: &Road,
        avoid: Option<&Sprite>,
        rng: &mut R,
    ) -> bool {
        let bitmaps = self.kind.bitmaps();
        let type_index = rng.random_range(0..bitmaps.len());
        let bitmap = bitmaps[type_index];

        let width = i32::from(bitmap.width);
        let padding = placement_padding(bitmap.height);
        let road_x = road.x_at(y_bottom);

        let preferred = Side::random(rng);
        let span = self
            .kind
            .span(preferred, road_x, width, padding)
            .or_else(|| self.kind.span(preferred.opposite(), road_x, width, padding));

        let member = &mut self.members[slot];
        member.type_index = type_index;
        member.sprite.set_bitmap(bitmap);

        let Some((lo, hi)) = span else {
            trace!(kind = %self.kind, slot, road_x, "No room on either side");
            member.sprite.banish();
            return false;
        };

        let x = rng.random_range(lo..=hi);
        member.sprite.pos = Vec2::new(x as f32, (y_bottom - i32::from(bitmap.height) + 1) as f32);

        let placed = member.sprite;
        let overlaps = self
            .members
            .iter()
            .enumerate()
            .filter(|(other, m)| *other != slot && m.sprite.is_live())
            .any(|(_, m)| intersects(&placed, &m.sprite))
            || avoid.is_some_and(|s| s.is_live() && intersects(&placed, s));

        if overlaps {
            trace!(kind = %self.kind, slot, "Placement overlapped, banishing");
            self.members[slot].sprite.banish();
            return false;
        }

        trace!(kind = %self.kind, slot, x, y_bottom, "Placed");
        true
    }

    /// Scrolls every live member down one row and recycles the ones that leave the screen.
    ///
    /// Terrain comes straight back at the top. A hazard only comes back with a
    /// [`HAZARD_SPAWN_CHANCE`] percent chance per step, so hazards arrive in bursts.
    pub fn step<R: Rng + ?Sized>(&mut self, road: &Road, avoid: Option<&Sprite>, rng: &mut R) {
        for slot in 0..N {
            let sprite = &mut self.members[slot].sprite;
            if sprite.is_live() {
                sprite.pos.y += 1.0;
                if sprite.is_live() {
                    continue;
                }
            }

            let respawn = match self.kind {
                ObstacleKind::Terrain => true,
                ObstacleKind::Hazard => rng.random_ratio(HAZARD_SPAWN_CHANCE, 100),
            };
            if respawn {
                self.reset(slot, 0, road, avoid, rng);
            }
        }
    }

    /// Banishes every live member whose rows overlap `top..bottom`, returning how many were cleared.
    pub fn clear_band(&mut self, top: f32, bottom: f32) -> usize {
        let mut cleared = 0;
        for member in self.members.iter_mut() {
            let sprite = &mut member.sprite;
            if sprite.is_live() && sprite.bottom() > top && sprite.top() < bottom {
                sprite.banish();
                cleared += 1;
            }
        }
        cleared
    }

    pub fn banish(&mut self, slot: usize) {
        self.members[slot].sprite.banish();
    }

    /// The sprites of every live member.
    pub fn live(&self) -> impl Iterator<Item = &Sprite> + '_ {
        self.members.iter().map(|m| &m.sprite).filter(|s| s.is_live())
    }

    /// The slots of every live member that overlaps `sprite`.
    pub fn overlapping(&self, sprite: &Sprite) -> impl Iterator<Item = usize> + '_ {
        let sprite = *sprite;
        self.members
            .iter()
            .enumerate()
            .filter(move |(_, m)| m.sprite.is_live() && intersects(&m.sprite, &sprite))
            .map(|(slot, _)| slot)
    }
}
