//! State shared between the sampling timer and the main loop.
//!
//! The timer side is the only writer of [`InputSnapshot`], the main loop the only reader.
//! A whole snapshot is packed into one atomic word, so a reader never pairs the buttons
//! from one sample with the dials from another.

use std::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use tracing::debug;

use crate::constants::{ANALOG_MAX, SAMPLE_PERIOD};
use crate::input::{Buttons, DebouncedControls, Dial, InputFrame};

/// The raw, undebounced pin levels and analog readings, as seen by the hardware.
///
/// On the desktop these are driven by the keyboard handler.
#[derive(Debug, Default)]
pub struct RawPins {
    levels: AtomicU8,
    dials: [AtomicU16; 2],
}

impl RawPins {
    pub fn set_level(&self, buttons: Buttons, high: bool) {
        if high {
            self.levels.fetch_or(buttons.bits(), Ordering::Relaxed);
        } else {
            self.levels.fetch_and(!buttons.bits(), Ordering::Relaxed);
        }
    }

    pub fn levels(&self) -> Buttons {
        Buttons::from_bits_truncate(self.levels.load(Ordering::Relaxed))
    }

    pub fn set_dial(&self, dial: Dial, value: u16) {
        self.dials[dial as usize].store(value.min(ANALOG_MAX), Ordering::Relaxed);
    }

    /// Nudges a dial by `delta`, saturating within the ADC range.
    pub fn turn_dial(&self, dial: Dial, delta: i32) {
        let current = i32::from(self.read_dial(dial));
        let next = (current + delta).clamp(0, i32::from(ANALOG_MAX));
        self.set_dial(dial, next as u16);
    }

    pub fn read_dial(&self, dial: Dial) -> u16 {
        self.dials[dial as usize].load(Ordering::Relaxed)
    }
}

const BUTTON_BITS: u32 = 7;
const DIAL_BITS: u32 = 10;
const DIAL_MASK: u32 = (1 << DIAL_BITS) - 1;
const CONTRAST_SHIFT: u32 = BUTTON_BITS;
const SPEED_LIMIT_SHIFT: u32 = BUTTON_BITS + DIAL_BITS;

/// Layout: bits 0..7 the held buttons, 7..17 the contrast dial, 17..27 the speed dial.
fn pack(frame: InputFrame) -> u32 {
    let contrast = u32::from(frame.contrast.min(ANALOG_MAX)) & DIAL_MASK;
    let speed_limit = u32::from(frame.speed_limit.min(ANALOG_MAX)) & DIAL_MASK;
    u32::from(frame.held.bits()) | (contrast << CONTRAST_SHIFT) | (speed_limit << SPEED_LIMIT_SHIFT)
}

fn unpack(word: u32) -> InputFrame {
    InputFrame::new(
        Buttons::from_bits_truncate(word as u8),
        ((word >> CONTRAST_SHIFT) & DIAL_MASK) as u16,
        ((word >> SPEED_LIMIT_SHIFT) & DIAL_MASK) as u16,
    )
}

/// The latest debounced state, published once per timer tick.
#[derive(Debug, Default)]
pub struct InputSnapshot {
    packed: AtomicU32,
}

impl InputSnapshot {
    /// Replaces the whole snapshot with a single store.
    pub fn publish(&self, frame: InputFrame) {
        self.packed.store(pack(frame), Ordering::Release);
    }

    /// Copies the snapshot out for one main loop iteration.
    pub fn frame(&self) -> InputFrame {
        unpack(self.packed.load(Ordering::Acquire))
    }
}

/// The body of the sampling timer interrupt: debounces the raw pins and publishes a snapshot.
#[derive(Debug, Default)]
pub struct Sampler {
    controls: DebouncedControls,
}

impl Sampler {
    pub fn tick(&mut self, raw: &RawPins, snapshot: &InputSnapshot) {
        let held = self.controls.sample(raw.levels());
        snapshot.publish(InputFrame::new(
            held,
            raw.read_dial(Dial::Contrast),
            raw.read_dial(Dial::SpeedLimit),
        ));
    }

    /// Runs the sampler on its own thread every [`SAMPLE_PERIOD`] until `running` is cleared.
    pub fn spawn(
        mut self,
        raw: Arc<RawPins>,
        snapshot: Arc<InputSnapshot>,
        running: Arc<AtomicBool>,
    ) -> std::io::Result<JoinHandle<()>> {
        thread::Builder::new().name("sampler".into()).spawn(move || {
            debug!(period = ?SAMPLE_PERIOD, "Sampler started");
            let mut next = Instant::now();
            while running.load(Ordering::Relaxed) {
                self.tick(&raw, &snapshot);
                next += SAMPLE_PERIOD;
                let now = Instant::now();
                if next > now {
                    spin_sleep::sleep(next - now);
                } else {
                    next = now;
                }
            }
            debug!("Sampler stopped");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEBOUNCE_SAMPLES;

    #[test]
    fn test_snapshot_only_changes_after_debounce() {
        let raw = RawPins::default();
        let snapshot = InputSnapshot::default();
        let mut sampler = Sampler::default();

        raw.set_level(Buttons::THROTTLE, true);
        for _ in 0..DEBOUNCE_SAMPLES - 1 {
            sampler.tick(&raw, &snapshot);
            assert!(snapshot.frame().held.is_empty());
        }
        sampler.tick(&raw, &snapshot);
        assert_eq!(snapshot.frame().held, Buttons::THROTTLE);
    }

    #[test]
    fn test_packing_keeps_every_field() {
        let frame = InputFrame::new(Buttons::all(), ANALOG_MAX, 1);
        assert_eq!(unpack(pack(frame)), frame);
        let frame = InputFrame::new(Buttons::STICK_DOWN, 0, ANALOG_MAX);
        assert_eq!(unpack(pack(frame)), frame);
        assert!(pack(InputFrame::new(Buttons::all(), ANALOG_MAX, ANALOG_MAX)) < 1 << 27);
    }

    #[test]
    fn test_frames_never_mix_samples() {
        let snapshot = InputSnapshot::default();
        let released = InputFrame::new(Buttons::empty(), 0, 0);
        let pressed = InputFrame::new(Buttons::THROTTLE, ANALOG_MAX, ANALOG_MAX);
        let done = AtomicBool::new(false);

        thread::scope(|scope| {
            scope.spawn(|| {
                for i in 0..200_000 {
                    snapshot.publish(if i % 2 == 0 { pressed } else { released });
                }
                done.store(true, Ordering::Release);
            });

            while !done.load(Ordering::Acquire) {
                let frame = snapshot.frame();
                assert!(frame == pressed || frame == released, "mixed frame {frame:?}");
            }
        });
    }

    #[test]
    fn test_dials_saturate() {
        let raw = RawPins::default();
        raw.turn_dial(Dial::SpeedLimit, 5000);
        assert_eq!(raw.read_dial(Dial::SpeedLimit), ANALOG_MAX);
        raw.turn_dial(Dial::SpeedLimit, -5000);
        assert_eq!(raw.read_dial(Dial::SpeedLimit), 0);
    }
}
