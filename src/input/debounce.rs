//! Debouncing of noisy digital inputs.
//!
//! Each control keeps a short history of its raw samples. The stable state only changes once
//! the whole history agrees, so a contact bouncing for a few samples never produces a press.

use circular_buffer::CircularBuffer;
use strum::{EnumCount, IntoEnumIterator};

use crate::constants::DEBOUNCE_SAMPLES;
use crate::input::{Buttons, Control};

/// A single debounced input with a bounded sample history.
#[derive(Debug, Clone)]
pub struct Debouncer {
    history: CircularBuffer<DEBOUNCE_SAMPLES, bool>,
    state: bool,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self {
            history: CircularBuffer::new(),
            state: false,
        }
    }
}

impl Debouncer {
    /// Records a raw sample and returns the (possibly updated) stable state.
    pub fn sample(&mut self, raw: bool) -> bool {
        self.history.push_back(raw);

        if self.history.is_full() {
            if self.history.iter().all(|&s| s) {
                self.state = true;
            } else if self.history.iter().all(|&s| !s) {
                self.state = false;
            }
        }

        self.state
    }
}

/// Debouncers for every control, indexed by [`Control`].
#[derive(Debug, Clone, Default)]
pub struct DebouncedControls {
    inputs: [Debouncer; Control::COUNT],
}

impl DebouncedControls {
    /// Feeds one raw sample of every control and returns the stable set of held controls.
    pub fn sample(&mut self, raw: Buttons) -> Buttons {
        let mut held = Buttons::empty();
        for (control, debouncer) in Control::iter().zip(self.inputs.iter_mut()) {
            if debouncer.sample(raw.contains(control.flag())) {
                held |= control.flag();
            }
        }
        held
    }
}
