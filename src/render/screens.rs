//! One function per screen. Each frame is drawn from scratch.

use crate::constants::{DASHBOARD_BORDER_X, LCD_HEIGHT, LCD_WIDTH, ROAD_WIDTH};
use crate::error::RenderError;
use crate::game::screen::GameScreen;
use crate::game::state::GameState;
use crate::render::RenderSink;

/// Draws a complete frame for the current screen and presents it.
pub fn draw(sink: &mut dyn RenderSink, state: &GameState) -> Result<(), RenderError> {
    sink.clear()?;
    sink.set_contrast(state.contrast)?;

    match state.screen() {
        GameScreen::Start => draw_start(sink)?,
        GameScreen::Playing { paused } => draw_game(sink, state, paused)?,
        GameScreen::GameOver { won } => draw_game_over(sink, state, won)?,
    }

    draw_borders(sink)?;
    sink.present()
}

pub fn draw_borders(sink: &mut dyn RenderSink) -> Result<(), RenderError> {
    sink.rect_outline(0, 0, LCD_WIDTH, LCD_HEIGHT)
}

fn draw_start(sink: &mut dyn RenderSink) -> Result<(), RenderError> {
    sink.string(13, 3, "Zombie Race")?;
    sink.string(6, 30, "Brake or gas")?;
    sink.string(6, 38, "to start")
}

fn draw_game(sink: &mut dyn RenderSink, state: &GameState, paused: bool) -> Result<(), RenderError> {
    draw_dashboard(sink, state)?;

    if paused {
        sink.string(30, 2, "TIME:")?;
        sink.text(30, 12, format_args!("{:.3}", state.time_paused))?;
        sink.string(30, 22, "DISTANCE:")?;
        sink.text(30, 32, format_args!("{}", state.player.distance))?;
    } else {
        for (y, &x) in state.road.rows().iter().enumerate() {
            sink.pixel(x, y as i32)?;
            sink.pixel(x + ROAD_WIDTH, y as i32)?;
        }
        for sprite in state.terrain.live().chain(state.hazards.live()) {
            sink.sprite(sprite)?;
        }
        sink.sprite(&state.station.sprite)?;
    }

    sink.sprite(&state.player.sprite)
}

/// The gauges left of the playable area: health, fuel and speed.
fn draw_dashboard(sink: &mut dyn RenderSink, state: &GameState) -> Result<(), RenderError> {
    sink.line(DASHBOARD_BORDER_X, 1, DASHBOARD_BORDER_X, LCD_HEIGHT - 1)?;

    let player = &state.player;
    sink.string(2, 2, "H:")?;
    sink.text(10, 2, format_args!("{}", player.condition))?;
    sink.string(2, 12, "F:")?;
    sink.text(10, 12, format_args!("{}", player.fuel as u32))?;
    sink.string(2, 22, "S:")?;
    sink.text(11, 22, format_args!("{:.0}", player.speed))?;
    sink.string(2, 32, "D:")?;
    sink.text(10, 32, format_args!("{}", state.remaining_distance()))
}

fn draw_game_over(sink: &mut dyn RenderSink, state: &GameState, won: bool) -> Result<(), RenderError> {
    sink.string(13, 3, if won { "YOU MADE IT" } else { "GAME OVER" })?;
    sink.text(6, 14, format_args!("Time: {:.1}", state.timer.elapsed()))?;
    sink.text(6, 22, format_args!("Dist: {}", state.player.distance))?;
    sink.string(6, 30, "Gas: retry")?;
    sink.string(6, 38, "Brake: menu")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::player::Steering;
    use crate::render::{DrawCommand, RecordingSink};

    #[test]
    fn test_start_screen() {
        let state = GameState::with_seed(1, Steering::default());
        let mut sink = RecordingSink::new();
        draw(&mut sink, &state).unwrap();
        assert!(sink.has_text("Zombie Race"));
        assert_eq!(sink.frames(), 1);
        assert!(sink.last_frame().contains(&DrawCommand::Contrast(state.contrast)));
    }

    #[test]
    fn test_game_draws_road_edges() {
        let mut state = GameState::with_seed(1, Steering::default());
        state.change_screen(GameScreen::Playing { paused: false });
        let mut sink = RecordingSink::new();
        draw(&mut sink, &state).unwrap();

        let x = state.road.x_at(20);
        assert!(sink.has_pixel(x, 20));
        assert!(sink.has_pixel(x + ROAD_WIDTH, 20));
        assert!(sink.has_text("H:"));
    }

    #[test]
    fn test_paused_hides_road_and_shows_time() {
        let mut state = GameState::with_seed(1, Steering::default());
        state.change_screen(GameScreen::Playing { paused: false });
        state.change_screen(GameScreen::Playing { paused: true });
        let mut sink = RecordingSink::new();
        draw(&mut sink, &state).unwrap();

        assert!(sink.has_text("TIME:"));
        assert!(sink.has_text("DISTANCE:"));
        assert!(!sink.has_pixel(state.road.x_at(10), 10));
    }
}
