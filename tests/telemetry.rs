mod common;

use std::io::Cursor;

use pretty_assertions::assert_eq;
use speculoos::prelude::*;

use common::{holding, idle, racing, SharedBuffer};
use zombie_race::entity::player::Steering;
use zombie_race::error::TransportError;
use zombie_race::game::Game;
use zombie_race::input::Buttons;
use zombie_race::telemetry::{self, Command, Frame, FrameReader, TelemetryLink, MAX_LINE_LEN};

#[test]
fn test_frames_round_trip() {
    let state = racing(1);
    let save = Frame::save(&state).unwrap();
    let debug = Frame::debug(&state).unwrap();

    let mut bytes = Vec::new();
    save.encode(&mut bytes).unwrap();
    debug.encode(&mut bytes).unwrap();

    let frames: Vec<Frame> = FrameReader::new(Cursor::new(bytes)).collect::<Result<_, _>>().unwrap();
    assert_eq!(frames, vec![save, debug]);
}

#[test]
fn test_save_lines_are_named() {
    let state = racing(2);
    let frame = Frame::save(&state).unwrap();
    assert_that(&frame.command).is_equal_to(Command::Save);
    assert!(frame.lines.iter().any(|l| l == "condition: 100"));
    assert!(frame.lines.iter().any(|l| l.starts_with("fuel: ")));
    for line in &frame.lines {
        assert_that(&line.len()).is_less_than_or_equal_to(MAX_LINE_LEN);
        assert_that(line).contains(": ");
    }
}

#[test]
fn test_unknown_command_rejected() {
    let mut reader = FrameReader::new(Cursor::new(b"\x07\x00".to_vec()));
    assert!(matches!(reader.next_frame(), Err(TransportError::UnknownCommand(7))));
}

#[test]
fn test_overlong_line_rejected() {
    let mut bytes = vec![Command::Debug as u8, 1];
    bytes.extend(std::iter::repeat_n(b'a', MAX_LINE_LEN + 1));
    bytes.push(b'\n');
    let mut reader = FrameReader::new(Cursor::new(bytes));
    assert!(matches!(reader.next_frame(), Err(TransportError::LineTooLong(100))));
}

#[test]
fn test_load_is_not_implemented() {
    let mut state = racing(3);
    let mut frame = Frame::new(Command::Load);
    frame.push("distance", 10).unwrap();

    let result = telemetry::load(&frame, &mut state);
    assert!(matches!(result, Err(TransportError::NotImplemented(Command::Load))));
    assert_eq!(state.player.distance, 0);
}

#[test]
fn test_game_reports_over_link() {
    let buffer = SharedBuffer::default();
    let mut game = Game::with_seed(4, Steering::default());
    game.attach_link(TelemetryLink::from_writer(buffer.clone()));

    for held in [Buttons::THROTTLE, Buttons::STICK_UP, Buttons::STICK_DOWN] {
        game.update(holding(held));
        game.update(idle());
    }

    let frames: Vec<Frame> = FrameReader::new(Cursor::new(buffer.bytes()))
        .collect::<Result<_, _>>()
        .unwrap();
    let commands: Vec<Command> = frames.iter().map(|f| f.command).collect();
    assert_eq!(commands, vec![Command::Save, Command::Debug]);
    assert_that(&frames[1].lines.len()).is_greater_than(frames[0].lines.len());
}

#[test]
fn test_load_request_sent_then_refused() {
    let buffer = SharedBuffer::default();
    let mut game = Game::with_seed(5, Steering::default());
    game.attach_link(TelemetryLink::from_writer(buffer.clone()));

    let result = game.load();

    assert!(matches!(result, Err(TransportError::NotImplemented(Command::Load))));
    assert_eq!(buffer.bytes(), vec![Command::Load as u8, 0]);
}

#[test]
fn test_open_missing_device() {
    let result = TelemetryLink::open("/nonexistent/zombie-race/tty");
    assert!(matches!(result, Err(TransportError::Open { .. })));
}
