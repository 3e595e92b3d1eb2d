//! The desktop LCD emulator: an SDL2 window standing in for the display, the keyboard
//! standing in for the buttons, joystick and dials.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use sdl2::event::{Event, WindowEvent};
use sdl2::gfx::primitives::DrawRenderer;
use sdl2::keyboard::Keycode;
use sdl2::pixels::Color;
use sdl2::render::Canvas;
use sdl2::video::Window;
use sdl2::EventPump;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::constants::{ANALOG_MAX, LCD_HEIGHT, LCD_MAX_CONTRAST, LCD_WIDTH, LOOP_TIME};
use crate::error::RenderError;
use crate::formatter;
use crate::game::Game;
use crate::input::{Buttons, Dial, InputSnapshot, RawPins, Sampler};
use crate::render::RenderSink;

/// How far one key press turns a dial.
const DIAL_STEP: i32 = 32;

const BACKLIGHT: Color = Color::RGB(0xC7, 0xCF, 0xA1);

/// An SDL2 canvas scaled up to look like the LCD.
pub struct LcdCanvas {
    canvas: Canvas<Window>,
    ink: Color,
}

impl LcdCanvas {
    pub fn new(mut canvas: Canvas<Window>, scale: u32) -> Result<Self> {
        canvas.set_scale(scale as f32, scale as f32).map_err(|e| anyhow!(e))?;
        Ok(Self {
            canvas,
            ink: ink_for(LCD_MAX_CONTRAST / 2),
        })
    }
}

/// Higher contrast gives darker pixels.
fn ink_for(contrast: u8) -> Color {
    let contrast = u32::from(contrast.min(LCD_MAX_CONTRAST));
    let level = (0xB0 - contrast * 0xB0 / u32::from(LCD_MAX_CONTRAST)) as u8;
    Color::RGB(level / 3, level / 2, level / 3)
}

fn draw_failed(e: String) -> RenderError {
    RenderError::DrawFailed(e)
}

impl RenderSink for LcdCanvas {
    fn clear(&mut self) -> Result<(), RenderError> {
        self.canvas.set_draw_color(BACKLIGHT);
        self.canvas.clear();
        self.canvas.set_draw_color(self.ink);
        Ok(())
    }

    fn pixel(&mut self, x: i32, y: i32) -> Result<(), RenderError> {
        self.canvas.draw_point((x, y)).map_err(draw_failed)
    }

    fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) -> Result<(), RenderError> {
        self.canvas.draw_line((x0, y0), (x1, y1)).map_err(draw_failed)
    }

    fn string(&mut self, x: i32, y: i32, text: &str) -> Result<(), RenderError> {
        self.canvas.string(x as i16, y as i16, text, self.ink).map_err(draw_failed)
    }

    fn set_contrast(&mut self, contrast: u8) -> Result<(), RenderError> {
        self.ink = ink_for(contrast);
        self.canvas.set_draw_color(self.ink);
        Ok(())
    }

    fn present(&mut self) -> Result<(), RenderError> {
        self.canvas.present();
        Ok(())
    }
}

/// The control a key drives, if any.
fn binding(keycode: Keycode) -> Option<Buttons> {
    match keycode {
        Keycode::Z | Keycode::LShift => Some(Buttons::BRAKE),
        Keycode::X | Keycode::LCtrl => Some(Buttons::THROTTLE),
        Keycode::Space | Keycode::Return => Some(Buttons::STICK_CENTRE),
        Keycode::Left | Keycode::A => Some(Buttons::STICK_LEFT),
        Keycode::Right | Keycode::D => Some(Buttons::STICK_RIGHT),
        Keycode::Up | Keycode::W => Some(Buttons::STICK_UP),
        Keycode::Down | Keycode::S => Some(Buttons::STICK_DOWN),
        _ => None,
    }
}

/// The dial a key turns, and which way.
fn dial_binding(keycode: Keycode) -> Option<(Dial, i32)> {
    match keycode {
        Keycode::LeftBracket => Some((Dial::Contrast, -DIAL_STEP)),
        Keycode::RightBracket => Some((Dial::Contrast, DIAL_STEP)),
        Keycode::Minus => Some((Dial::SpeedLimit, -DIAL_STEP)),
        Keycode::Equals => Some((Dial::SpeedLimit, DIAL_STEP)),
        _ => None,
    }
}

pub struct App {
    game: Game,
    lcd: LcdCanvas,
    event_pump: EventPump,
    pins: Arc<RawPins>,
    snapshot: Arc<InputSnapshot>,
    sampling: Arc<AtomicBool>,
    sampler: Option<JoinHandle<()>>,
}

impl App {
    pub fn new(config: &Config) -> Result<Self> {
        let sdl_context = sdl2::init().map_err(|e| anyhow!(e))?;
        let video_subsystem = sdl_context.video().map_err(|e| anyhow!(e))?;

        let window = video_subsystem
            .window(
                "Zombie Race",
                LCD_WIDTH as u32 * config.scale,
                LCD_HEIGHT as u32 * config.scale,
            )
            .position_centered()
            .build()?;
        let lcd = LcdCanvas::new(window.into_canvas().accelerated().build()?, config.scale)?;
        let event_pump = sdl_context.event_pump().map_err(|e| anyhow!(e))?;

        let game = Game::new(config)?;

        let pins = Arc::new(RawPins::default());
        pins.set_dial(Dial::Contrast, ANALOG_MAX / 2);
        pins.set_dial(Dial::SpeedLimit, ANALOG_MAX);
        let snapshot = Arc::new(InputSnapshot::default());
        let sampling = Arc::new(AtomicBool::new(true));
        let sampler = Sampler::default().spawn(pins.clone(), snapshot.clone(), sampling.clone())?;

        info!(seed = config.seed, steering = %config.steering, scale = config.scale, "Emulator started");

        Ok(Self {
            game,
            lcd,
            event_pump,
            pins,
            snapshot,
            sampling,
            sampler: Some(sampler),
        })
    }

    /// Runs one iteration of the main loop. Returns false once the window is closed.
    pub fn run(&mut self) -> bool {
        let start = Instant::now();

        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => {
                    info!("Exit requested. Exiting...");
                    return false;
                }
                Event::Window {
                    win_event: WindowEvent::FocusLost,
                    ..
                } => {
                    debug!("Focus lost, releasing all controls");
                    self.pins.set_level(Buttons::all(), false);
                }
                Event::KeyDown {
                    keycode: Some(keycode),
                    repeat,
                    ..
                } => {
                    if let Some((dial, delta)) = dial_binding(keycode) {
                        self.pins.turn_dial(dial, delta);
                        debug!(%dial, value = self.pins.read_dial(dial), "Dial turned");
                    } else if let (Some(buttons), false) = (binding(keycode), repeat) {
                        self.pins.set_level(buttons, true);
                    }
                }
                Event::KeyUp {
                    keycode: Some(keycode),
                    ..
                } => {
                    if let Some(buttons) = binding(keycode) {
                        self.pins.set_level(buttons, false);
                    }
                }
                _ => {}
            }
        }

        self.game.update(self.snapshot.frame());
        formatter::increment_tick();

        if let Err(e) = self.game.draw(&mut self.lcd) {
            error!("Failed to draw game: {e}");
        }

        let elapsed = start.elapsed();
        if elapsed < LOOP_TIME {
            let time = LOOP_TIME.saturating_sub(elapsed);
            if time != Duration::ZERO {
                spin_sleep::sleep(time);
            }
        } else {
            warn!("Game loop behind schedule by: {:?}", elapsed - LOOP_TIME);
        }

        true
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.sampling.store(false, Ordering::Relaxed);
        if let Some(sampler) = self.sampler.take() {
            if sampler.join().is_err() {
                error!("Sampler thread panicked");
            }
        }
    }
}
