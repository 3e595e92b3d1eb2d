use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::constants::{FINISH_DISTANCE, LCD_HEIGHT, LCD_MAX_CONTRAST};
use crate::entity::collision::{handle_collision, CollisionOutcome, Scene};
use crate::entity::fuel::{FuelStation, RefuelState};
use crate::entity::obstacle::{HazardPool, ObstacleKind, TerrainPool};
use crate::entity::player::{Pedals, Player, Steering};
use crate::game::screen::GameScreen;
use crate::input::{Control, InputFrame};
use crate::map::road::Road;
use crate::timer::{GameTimer, StepAccumulator};

/// The `GameState` struct holds everything that makes up a race.
///
/// The road, both obstacle pools, the fuel station and the car are stepped together from
/// here, with a single seeded random generator, so that two states built with the same seed
/// and fed the same input play out identically.
#[derive(Debug, Clone)]
pub struct GameState {
    screen: GameScreen,
    pub player: Player,
    pub road: Road,
    pub terrain: TerrainPool,
    pub hazards: HazardPool,
    pub station: FuelStation,
    pub steps: StepAccumulator,
    pub timer: GameTimer,
    /// Elapsed race time captured when the game was last paused.
    pub time_paused: f32,
    /// LCD contrast, `0..=LCD_MAX_CONTRAST`, set from the dial on the start screen.
    pub contrast: u8,
    seed: u64,
    rng: SmallRng,
}

impl GameState {
    pub fn with_seed(seed: u64, steering: Steering) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let road = Road::new(&mut rng);
        Self {
            screen: GameScreen::Start,
            player: Player::new(steering),
            road,
            terrain: TerrainPool::new(ObstacleKind::Terrain),
            hazards: HazardPool::new(ObstacleKind::Hazard),
            station: FuelStation::default(),
            steps: StepAccumulator::default(),
            timer: GameTimer::default(),
            time_paused: 0.0,
            contrast: LCD_MAX_CONTRAST / 2,
            seed,
            rng,
        }
    }

    pub fn screen(&self) -> GameScreen {
        self.screen
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Switches screens, running the setup the new screen needs first.
    ///
    /// Entering [`GameScreen::Playing`] from any other screen starts a fresh race. Toggling
    /// pause keeps the race as it is.
    pub fn change_screen(&mut self, next: GameScreen) {
        let was_playing = matches!(self.screen, GameScreen::Playing { .. });
        if matches!(next, GameScreen::Playing { .. }) && !was_playing {
            self.setup_world();
        }

        info!(from = %self.screen, to = %next, "Screen changed");
        self.screen = next;
    }

    /// Resets the road, repopulates the pools and puts a fresh car in the middle of the road.
    pub fn setup_world(&mut self) {
        self.road.reset(&mut self.rng);
        self.player.setup(&self.road);
        self.station.setup(&mut self.rng);
        self.terrain.setup(0..LCD_HEIGHT, &self.road, Some(&self.station.sprite), &mut self.rng);
        self.hazards.setup(0..LCD_HEIGHT / 2, &self.road, None, &mut self.rng);
        self.steps.reset();
        self.timer.reset();
        self.time_paused = 0.0;
        debug!(
            terrain = self.terrain.live().count(),
            hazards = self.hazards.live().count(),
            "World set up"
        );
    }

    /// Sets the contrast from a reading of the contrast dial.
    pub fn set_contrast_from_dial(&mut self, dial: u16) {
        self.contrast = (f32::from(dial) / 1024.0 * f32::from(LCD_MAX_CONTRAST)) as u8;
    }

    /// Steps until the finish line.
    pub fn remaining_distance(&self) -> u32 {
        FINISH_DISTANCE.saturating_sub(self.player.distance)
    }

    /// Everything the car can run into.
    pub fn scene(&self) -> Scene<'_> {
        Scene {
            terrain: &self.terrain,
            hazards: &self.hazards,
            station: &self.station.sprite,
        }
    }

    /// Advances a running race by one tick.
    ///
    /// Steering and pedals are applied first, then the world steps if enough speed has built
    /// up, then crashes are resolved, and finally the race is checked for an ending.
    pub fn tick(&mut self, input: InputFrame) {
        self.timer.tick();

        let scene = Scene {
            terrain: &self.terrain,
            hazards: &self.hazards,
            station: &self.station.sprite,
        };
        if input.is_held(Control::StickLeft) {
            self.player.move_by(-1.0, &scene);
        } else if input.is_held(Control::StickRight) {
            self.player.move_by(1.0, &scene);
        }

        let pedals = Pedals {
            brake: input.is_held(Control::Brake),
            throttle: input.is_held(Control::Throttle),
        };
        if self.station.update_refuel(&mut self.player, pedals.brake) == RefuelState::Idle {
            self.player.speed_input(pedals, input.speed_limit, &self.road);
        }

        if self.steps.advance(self.player.speed) {
            self.step_world();
        }

        if self.scene().check_collision(&self.player.sprite) {
            let outcome = handle_collision(&mut self.player, &self.road, &mut self.hazards);
            if outcome == CollisionOutcome::Wrecked {
                self.change_screen(GameScreen::GameOver { won: false });
                return;
            }
        }

        self.check_game_over();
    }

    /// Scrolls the world down by one row and charges the car for the distance.
    pub fn step_world(&mut self) {
        self.road.step(&mut self.rng);
        self.terrain.step(&self.road, Some(&self.station.sprite), &mut self.rng);
        self.hazards.step(&self.road, None, &mut self.rng);
        self.station.step(&mut self.road, &mut self.terrain, &mut self.rng);

        self.player.distance = self.player.distance.saturating_add(1);
        self.player.burn_fuel();
    }

    /// Ends the race if the tank is empty, the car is wrecked, or the finish line is reached.
    pub fn check_game_over(&mut self) {
        if self.player.is_out_of_fuel() || self.player.condition == 0 {
            info!(
                fuel = self.player.fuel,
                condition = self.player.condition,
                distance = self.player.distance,
                "Race lost"
            );
            self.change_screen(GameScreen::GameOver { won: false });
        } else if self.remaining_distance() == 0 {
            info!(time = self.timer.elapsed(), "Race won");
            self.change_screen(GameScreen::GameOver { won: true });
        }
    }
}
