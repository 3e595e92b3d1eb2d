use strum_macros::Display;

/// The screen the game is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum GameScreen {
    /// Title screen, waiting for a pedal.
    #[default]
    Start,
    /// A race is on.
    Playing { paused: bool },
    /// The race ended, either at the finish line or with an empty tank or wrecked car.
    GameOver { won: bool },
}

impl GameScreen {
    pub fn is_running(self) -> bool {
        matches!(self, GameScreen::Playing { paused: false })
    }
}
