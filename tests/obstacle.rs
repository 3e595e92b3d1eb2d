use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use speculoos::prelude::*;

use zombie_race::constants::{HAZARD_SPAWN_CHANCE, LCD_HEIGHT, ROAD_WIDTH};
use zombie_race::entity::collision::intersects;
use zombie_race::entity::fuel::FuelStation;
use zombie_race::entity::obstacle::{HazardPool, ObstacleKind, ObstaclePool, TerrainPool};
use zombie_race::map::Road;

fn assert_no_overlaps<const N: usize>(pool: &ObstaclePool<N>) {
    let live: Vec<_> = pool.live().collect();
    for (i, a) in live.iter().enumerate() {
        for b in &live[i + 1..] {
            assert!(!intersects(a, b), "{a:?} overlaps {b:?}");
        }
    }
}

#[test]
fn test_live_members_never_overlap() {
    for seed in 0..10 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut road = Road::new(&mut rng);
        let mut terrain = TerrainPool::new(ObstacleKind::Terrain);
        let mut hazards = HazardPool::new(ObstacleKind::Hazard);
        terrain.setup(0..LCD_HEIGHT, &road, None, &mut rng);
        hazards.setup(0..LCD_HEIGHT / 2, &road, None, &mut rng);

        for _ in 0..1000 {
            road.step(&mut rng);
            terrain.step(&road, None, &mut rng);
            hazards.step(&road, None, &mut rng);
            if rng.random_ratio(1, 10) {
                let slot = rng.random_range(0..terrain.members.len());
                terrain.reset(slot, rng.random_range(0..LCD_HEIGHT), &road, None, &mut rng);
            }
            assert_no_overlaps(&terrain);
            assert_no_overlaps(&hazards);
        }
    }
}

#[test]
fn test_terrain_beside_and_hazards_on_road() {
    let mut rng = SmallRng::seed_from_u64(17);
    let road = Road::new(&mut rng);
    let mut terrain = TerrainPool::new(ObstacleKind::Terrain);
    let mut hazards = HazardPool::new(ObstacleKind::Hazard);

    for _ in 0..200 {
        for slot in 0..terrain.members.len() {
            terrain.reset(slot, 30, &road, None, &mut rng);
        }
        for slot in 0..hazards.members.len() {
            hazards.reset(slot, 30, &road, None, &mut rng);
        }

        let road_x = road.x_at(30) as f32;
        for sprite in terrain.live() {
            assert!(sprite.right() < road_x || sprite.left() > road_x + ROAD_WIDTH as f32);
        }
        for sprite in hazards.live() {
            assert!(sprite.left() > road_x && sprite.right() < road_x + ROAD_WIDTH as f32);
        }
    }
}

#[test]
fn test_terrain_avoids_fuel_station() {
    let mut rng = SmallRng::seed_from_u64(33);
    let road = Road::new(&mut rng);
    let mut station = FuelStation::default();
    station.sprite.pos.x = (road.top() - 7) as f32;
    station.sprite.pos.y = 20.0;

    let mut terrain = TerrainPool::new(ObstacleKind::Terrain);
    for _ in 0..500 {
        let slot = rng.random_range(0..terrain.members.len());
        terrain.reset(slot, rng.random_range(18..32), &road, Some(&station.sprite), &mut rng);
        for sprite in terrain.live() {
            assert!(!intersects(sprite, &station.sprite));
        }
    }
}

#[test]
fn test_hazard_respawn_frequency() {
    let mut rng = SmallRng::seed_from_u64(2024);
    let road = Road::new(&mut rng);
    let mut pool = ObstaclePool::<1>::new(ObstacleKind::Hazard);

    const TRIALS: u32 = 40_000;
    let mut respawns = 0;
    for _ in 0..TRIALS {
        pool.banish(0);
        pool.step(&road, None, &mut rng);
        if pool.members[0].sprite.is_live() {
            respawns += 1;
        }
    }

    let frequency = f64::from(respawns) / f64::from(TRIALS);
    let expected = f64::from(HAZARD_SPAWN_CHANCE) / 100.0;
    assert_that(&(frequency - expected).abs()).is_less_than(0.01);
}

#[test]
fn test_terrain_always_comes_back() {
    let mut rng = SmallRng::seed_from_u64(9);
    let road = Road::new(&mut rng);
    let mut pool = ObstaclePool::<1>::new(ObstacleKind::Terrain);
    for _ in 0..100 {
        pool.banish(0);
        pool.step(&road, None, &mut rng);
        assert_that(&pool.members[0].sprite.is_live()).is_true();
        assert_that(&pool.members[0].sprite.bottom_row()).is_equal_to(0);
    }
}
