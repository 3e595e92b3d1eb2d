#![allow(dead_code)]

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use zombie_race::entity::player::Steering;
use zombie_race::game::screen::GameScreen;
use zombie_race::game::state::GameState;
use zombie_race::input::{Buttons, InputFrame};

pub const FULL_DIAL: u16 = 1023;

/// A state already racing, with every hazard cleared out of the way.
pub fn racing(seed: u64) -> GameState {
    let mut state = GameState::with_seed(seed, Steering::default());
    state.change_screen(GameScreen::Playing { paused: false });
    state.hazards.clear_band(-100.0, 100.0);
    state
}

pub fn holding(held: Buttons) -> InputFrame {
    InputFrame::new(held, 512, FULL_DIAL)
}

pub fn idle() -> InputFrame {
    holding(Buttons::empty())
}

/// A writer whose bytes can still be read after it has been handed off.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn bytes(&self) -> Vec<u8> {
        self.0.lock().unwrap().clone()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
