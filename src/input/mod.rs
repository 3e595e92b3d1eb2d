//! Controls, debouncing, and the snapshot shared between the sampling timer and the main loop.

use bitflags::bitflags;
use strum_macros::{Display, EnumCount, EnumIter};

pub mod debounce;
pub mod shared;

pub use debounce::{DebouncedControls, Debouncer};
pub use shared::{InputSnapshot, RawPins, Sampler};

/// One of the seven digital controls on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, Display)]
pub enum Control {
    /// The left push button.
    Brake,
    /// The right push button.
    Throttle,
    StickCentre,
    StickLeft,
    StickRight,
    StickUp,
    StickDown,
}

impl Control {
    pub fn flag(self) -> Buttons {
        match self {
            Control::Brake => Buttons::BRAKE,
            Control::Throttle => Buttons::THROTTLE,
            Control::StickCentre => Buttons::STICK_CENTRE,
            Control::StickLeft => Buttons::STICK_LEFT,
            Control::StickRight => Buttons::STICK_RIGHT,
            Control::StickUp => Buttons::STICK_UP,
            Control::StickDown => Buttons::STICK_DOWN,
        }
    }
}

bitflags! {
    /// A set of controls, one bit each.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Buttons: u8 {
        const BRAKE = 1 << 0;
        const THROTTLE = 1 << 1;
        const STICK_CENTRE = 1 << 2;
        const STICK_LEFT = 1 << 3;
        const STICK_RIGHT = 1 << 4;
        const STICK_UP = 1 << 5;
        const STICK_DOWN = 1 << 6;
    }
}

/// The analog channels wired to the two potentiometers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumCount, Display)]
pub enum Dial {
    Contrast,
    SpeedLimit,
}

/// Everything the main loop reads from the input side in one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputFrame {
    /// Debounced controls currently held down.
    pub held: Buttons,
    /// Analog reading of the contrast dial, `0..=ANALOG_MAX`.
    pub contrast: u16,
    /// Analog reading of the speed-limit dial, `0..=ANALOG_MAX`.
    pub speed_limit: u16,
}

impl InputFrame {
    pub fn new(held: Buttons, contrast: u16, speed_limit: u16) -> Self {
        Self {
            held,
            contrast,
            speed_limit,
        }
    }

    pub fn is_held(&self, control: Control) -> bool {
        self.held.contains(control.flag())
    }
}

/// Turns held controls into rising edges, so that holding a control fires it once.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeDetector {
    previous: Buttons,
}

impl EdgeDetector {
    /// Returns the controls that are held now but were not held on the previous call.
    pub fn rising(&mut self, held: Buttons) -> Buttons {
        let pressed = held & !self.previous;
        self.previous = held;
        pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::{EnumCount, IntoEnumIterator};

    #[test]
    fn test_control_flags_are_distinct() {
        let all = Control::iter().fold(Buttons::empty(), |acc, c| {
            assert!(!acc.contains(c.flag()), "{c} shares a bit");
            acc | c.flag()
        });
        assert_eq!(all, Buttons::all());
        assert_eq!(Control::COUNT, 7);
    }

    #[test]
    fn test_edge_detector_fires_once_per_press() {
        let mut edges = EdgeDetector::default();
        assert_eq!(edges.rising(Buttons::BRAKE), Buttons::BRAKE);
        assert_eq!(edges.rising(Buttons::BRAKE), Buttons::empty());
        assert_eq!(edges.rising(Buttons::BRAKE | Buttons::STICK_UP), Buttons::STICK_UP);
        assert_eq!(edges.rising(Buttons::empty()), Buttons::empty());
        assert_eq!(edges.rising(Buttons::BRAKE), Buttons::BRAKE);
    }
}
