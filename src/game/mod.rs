//! This module contains the main game logic and state.

use tracing::{debug, warn};

use crate::config::Config;
use crate::entity::player::Steering;
use crate::error::{GameResult, RenderError, TransportError};
use crate::input::{Buttons, EdgeDetector, InputFrame};
use crate::render::{screens, RenderSink};
use crate::telemetry::{self, Command, Frame, TelemetryLink};

use self::screen::GameScreen;
use self::state::GameState;

pub mod screen;
pub mod state;

/// The `Game` struct is the main entry point for the game.
///
/// It turns held controls into presses, routes them to the current screen, and owns the
/// optional telemetry link the car reports over.
pub struct Game {
    pub state: GameState,
    edges: EdgeDetector,
    link: Option<TelemetryLink>,
}

impl Game {
    /// Builds a game from the configuration, opening the telemetry device if one is set.
    pub fn new(config: &Config) -> GameResult<Self> {
        let mut game = Self::with_seed(config.seed, config.steering);
        if let Some(path) = &config.serial {
            game.attach_link(TelemetryLink::open(path)?);
        }
        Ok(game)
    }

    pub fn with_seed(seed: u64, steering: Steering) -> Self {
        Self {
            state: GameState::with_seed(seed, steering),
            edges: EdgeDetector::default(),
            link: None,
        }
    }

    pub fn attach_link(&mut self, link: TelemetryLink) {
        self.link = Some(link);
    }

    pub fn screen(&self) -> GameScreen {
        self.state.screen()
    }

    /// Runs one tick of the current screen.
    pub fn update(&mut self, input: InputFrame) {
        let pressed = self.edges.rising(input.held);

        match self.state.screen() {
            GameScreen::Start => self.update_start(input, pressed),
            GameScreen::Playing { paused } => self.update_playing(input, pressed, paused),
            GameScreen::GameOver { .. } => self.update_game_over(pressed),
        }
    }

    fn update_start(&mut self, input: InputFrame, pressed: Buttons) {
        self.state.set_contrast_from_dial(input.contrast);

        if pressed.intersects(Buttons::THROTTLE | Buttons::BRAKE) {
            self.state.change_screen(GameScreen::Playing { paused: false });
        }
    }

    fn update_playing(&mut self, input: InputFrame, pressed: Buttons, mut paused: bool) {
        if pressed.contains(Buttons::STICK_CENTRE) {
            paused = !paused;
            if paused {
                self.state.time_paused = self.state.timer.elapsed();
            }
            self.state.change_screen(GameScreen::Playing { paused });
        }
        if paused {
            return;
        }

        if pressed.contains(Buttons::STICK_UP) {
            self.report(Command::Save);
        } else if pressed.contains(Buttons::STICK_DOWN) {
            self.report(Command::Debug);
        }

        self.state.tick(input);
    }

    fn update_game_over(&mut self, pressed: Buttons) {
        if pressed.contains(Buttons::THROTTLE) {
            self.state.change_screen(GameScreen::Playing { paused: false });
        } else if pressed.contains(Buttons::BRAKE) {
            self.state.change_screen(GameScreen::Start);
        } else if pressed.contains(Buttons::STICK_UP) {
            if let Err(e) = self.load() {
                warn!(error = %e, "Could not restore the saved race");
            }
        }
    }

    /// Sends a SAVE or DEBUG frame if a link is attached. Failures are logged, never fatal.
    fn report(&mut self, command: Command) {
        let Some(link) = self.link.as_mut() else {
            debug!(%command, "No telemetry link attached");
            return;
        };

        let frame = match command {
            Command::Debug => Frame::debug(&self.state),
            _ => Frame::save(&self.state),
        };
        if let Err(e) = frame.and_then(|frame| link.send(&frame)) {
            warn!(%command, error = %e, "Telemetry send failed");
        }
    }

    /// Asks for the saved race back and tries to restore it.
    pub fn load(&mut self) -> Result<(), TransportError> {
        let request = Frame::new(Command::Load);
        if let Some(link) = self.link.as_mut() {
            link.send(&request)?;
        }
        telemetry::load(&request, &mut self.state)
    }

    pub fn draw(&self, sink: &mut dyn RenderSink) -> Result<(), RenderError> {
        screens::draw(sink, &self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(game: &mut Game, held: Buttons) {
        game.update(InputFrame::new(held, 512, 1023));
        game.update(InputFrame::new(Buttons::empty(), 512, 1023));
    }

    #[test]
    fn test_either_pedal_starts() {
        for pedal in [Buttons::THROTTLE, Buttons::BRAKE] {
            let mut game = Game::with_seed(1, Steering::default());
            press(&mut game, pedal);
            assert_eq!(game.screen(), GameScreen::Playing { paused: false });
        }
    }

    #[test]
    fn test_holding_does_not_repeat() {
        let mut game = Game::with_seed(1, Steering::default());
        press(&mut game, Buttons::THROTTLE);
        let input = InputFrame::new(Buttons::STICK_CENTRE, 512, 1023);
        game.update(input);
        game.update(input);
        game.update(input);
        assert_eq!(game.screen(), GameScreen::Playing { paused: true });
    }

    #[test]
    fn test_game_over_controls() {
        let mut game = Game::with_seed(1, Steering::default());
        press(&mut game, Buttons::THROTTLE);
        game.state.change_screen(GameScreen::GameOver { won: false });

        press(&mut game, Buttons::STICK_UP);
        assert_eq!(game.screen(), GameScreen::GameOver { won: false });
        assert!(matches!(game.load(), Err(TransportError::NotImplemented(Command::Load))));

        press(&mut game, Buttons::BRAKE);
        assert_eq!(game.screen(), GameScreen::Start);
    }
}
