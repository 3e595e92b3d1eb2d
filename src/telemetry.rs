//! The serial telemetry link.
//!
//! A frame is one command byte, one line-count byte, then that many `\n`-terminated text
//! lines of the form `name: value`. The car sends SAVE frames with its gauges and DEBUG
//! frames with the full world layout; the monitor on the other end prints them.

use std::fmt::Display;
use std::fs::OpenOptions;
use std::io::{BufRead, ErrorKind, Write};
use std::path::Path;

use smallvec::SmallVec;
use strum_macros::{Display, EnumIter, FromRepr};
use tracing::debug;

use crate::error::TransportError;
use crate::game::state::GameState;

/// The longest line a frame may carry, not counting its newline.
pub const MAX_LINE_LEN: usize = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr, EnumIter, Display)]
#[repr(u8)]
pub enum Command {
    #[strum(to_string = "SAVE")]
    Save = 1,
    #[strum(to_string = "LOAD")]
    Load = 2,
    #[strum(to_string = "DEBUG")]
    Debug = 3,
}

impl TryFrom<u8> for Command {
    type Error = TransportError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Command::from_repr(code).ok_or(TransportError::UnknownCommand(code))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub command: Command,
    pub lines: SmallVec<[String; 8]>,
}

impl Frame {
    pub fn new(command: Command) -> Self {
        Self {
            command,
            lines: SmallVec::new(),
        }
    }

    /// Appends a `name: value` line.
    pub fn push(&mut self, name: &str, value: impl Display) -> Result<(), TransportError> {
        let line = format!("{name}: {value}");
        if line.contains('\n') {
            return Err(TransportError::InvalidLine(line));
        }
        if line.len() > MAX_LINE_LEN {
            return Err(TransportError::LineTooLong(line.len()));
        }
        if self.lines.len() >= usize::from(u8::MAX) {
            return Err(TransportError::TooManyLines(self.lines.len() + 1));
        }
        self.lines.push(line);
        Ok(())
    }

    /// A SAVE frame: the car's gauges and the race clock.
    pub fn save(state: &GameState) -> Result<Self, TransportError> {
        let mut frame = Self::new(Command::Save);
        let player = &state.player;
        frame.push("time", format_args!("{:.3}", state.timer.elapsed()))?;
        frame.push("distance", player.distance)?;
        frame.push("condition", player.condition)?;
        frame.push("fuel", format_args!("{:.2}", player.fuel))?;
        frame.push("speed", format_args!("{:.2}", player.speed))?;
        frame.push("x", format_args!("{:.2}", player.sprite.pos.x))?;
        frame.push("seed", state.seed())?;
        Ok(frame)
    }

    /// A DEBUG frame: the gauges plus the road and every sprite on screen.
    pub fn debug(state: &GameState) -> Result<Self, TransportError> {
        let mut frame = Self::save(state)?;
        frame.command = Command::Debug;
        frame.push("screen", state.screen())?;
        frame.push(
            "road",
            format_args!(
                "x={} dir={} curve={} left={}",
                state.road.top(),
                state.road.direction(),
                state.road.curve_threshold(),
                state.road.section_remaining()
            ),
        )?;
        for (pool, members) in [
            ("terrain", state.terrain.members.as_slice()),
            ("hazard", state.hazards.members.as_slice()),
        ] {
            for (slot, member) in members.iter().enumerate() {
                let sprite = &member.sprite;
                frame.push(
                    &format!("{pool}[{slot}]"),
                    format_args!("type={} x={:.0} y={:.0}", member.type_index, sprite.left(), sprite.top()),
                )?;
            }
        }
        frame.push(
            "station",
            format_args!(
                "x={:.0} y={:.0} countdown={} refuel={}",
                state.station.sprite.left(),
                state.station.sprite.top(),
                state.station.countdown(),
                state.station.refuel_state()
            ),
        )?;
        Ok(frame)
    }

    pub fn encode<W: Write>(&self, writer: &mut W) -> Result<(), TransportError> {
        let count = u8::try_from(self.lines.len()).map_err(|_| TransportError::TooManyLines(self.lines.len()))?;
        writer.write_all(&[self.command as u8, count])?;
        for line in &self.lines {
            if line.len() > MAX_LINE_LEN {
                return Err(TransportError::LineTooLong(line.len()));
            }
            writer.write_all(line.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        Ok(())
    }
}

/// Decodes frames from a byte stream.
pub struct FrameReader<R> {
    reader: R,
}

impl<R: BufRead> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Reads the next frame, or `None` if the stream ended cleanly between frames.
    pub fn next_frame(&mut self) -> Result<Option<Frame>, TransportError> {
        let mut header = [0u8; 2];
        match self.reader.read(&mut header[..1]) {
            Ok(0) => return Ok(None),
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::Interrupted => return self.next_frame(),
            Err(e) => return Err(e.into()),
        }
        let command = Command::try_from(header[0])?;

        if let Err(e) = self.reader.read_exact(&mut header[1..]) {
            return Err(match e.kind() {
                ErrorKind::UnexpectedEof => TransportError::MissingLineCount(command),
                _ => e.into(),
            });
        }
        let expected = header[1];

        let mut frame = Frame::new(command);
        let mut buffer = Vec::with_capacity(MAX_LINE_LEN + 1);
        for received in 0..expected {
            buffer.clear();
            let read = self.reader.read_until(b'\n', &mut buffer)?;
            if read == 0 || buffer.last() != Some(&b'\n') {
                return Err(TransportError::Truncated { expected, received });
            }
            buffer.pop();
            if buffer.len() > MAX_LINE_LEN {
                return Err(TransportError::LineTooLong(buffer.len()));
            }
            frame.lines.push(String::from_utf8_lossy(&buffer).into_owned());
        }

        Ok(Some(frame))
    }
}

impl<R: BufRead> Iterator for FrameReader<R> {
    type Item = Result<Frame, TransportError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame().transpose()
    }
}

/// Restores a race from a LOAD frame.
///
/// The save lines are a display format and do not carry enough of the world to rebuild
/// it, so loading is refused rather than guessed at.
pub fn load(frame: &Frame, _state: &mut GameState) -> Result<(), TransportError> {
    debug!(command = %frame.command, lines = frame.lines.len(), "Load requested");
    Err(TransportError::NotImplemented(Command::Load))
}

/// The write end of the telemetry link.
pub struct TelemetryLink {
    writer: Box<dyn Write + Send>,
}

impl TelemetryLink {
    /// Opens a serial device (or any file) for writing frames.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TransportError> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| TransportError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(path = %path.display(), "Telemetry link open");
        Ok(Self::from_writer(file))
    }

    pub fn from_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Box::new(writer),
        }
    }

    pub fn send(&mut self, frame: &Frame) -> Result<(), TransportError> {
        frame.encode(&mut self.writer)?;
        self.writer.flush()?;
        debug!(command = %frame.command, lines = frame.lines.len(), "Frame sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_command_codes() {
        assert_eq!(Command::try_from(1).unwrap(), Command::Save);
        assert_eq!(Command::try_from(3).unwrap(), Command::Debug);
        assert!(matches!(Command::try_from(9), Err(TransportError::UnknownCommand(9))));
        assert_eq!(Command::Load.to_string(), "LOAD");
    }

    #[test]
    fn test_encoded_layout() {
        let mut frame = Frame::new(Command::Save);
        frame.push("fuel", 42).unwrap();
        let mut bytes = Vec::new();
        frame.encode(&mut bytes).unwrap();
        assert_eq!(bytes, b"\x01\x01fuel: 42\n");
    }

    #[test]
    fn test_rejects_long_lines() {
        let mut frame = Frame::new(Command::Debug);
        let long = "x".repeat(MAX_LINE_LEN);
        assert!(matches!(frame.push("name", long), Err(TransportError::LineTooLong(_))));
        assert!(frame.lines.is_empty());
    }

    #[test]
    fn test_newline_inside_line_rejected() {
        let mut frame = Frame::new(Command::Save);
        let result = frame.push("name", "two\nlines");
        assert!(matches!(result, Err(TransportError::InvalidLine(line)) if line == "name: two\nlines"));
        assert!(frame.lines.is_empty());
    }

    #[test]
    fn test_frame_cut_after_command() {
        let mut reader = FrameReader::new(Cursor::new(b"\x01".to_vec()));
        let result = reader.next_frame();
        assert!(matches!(result, Err(TransportError::MissingLineCount(Command::Save))));
        assert_eq!(
            result.err().map(|e| e.to_string()),
            Some("SAVE frame ended before its line count".to_string())
        );
    }

    #[test]
    fn test_truncated_frame() {
        let mut reader = FrameReader::new(Cursor::new(b"\x03\x02one: 1\ntwo".to_vec()));
        assert!(matches!(
            reader.next_frame(),
            Err(TransportError::Truncated {
                expected: 2,
                received: 1
            })
        ));
    }

    #[test]
    fn test_empty_stream_has_no_frames() {
        let mut reader = FrameReader::new(Cursor::new(Vec::new()));
        assert!(reader.next_frame().unwrap().is_none());
    }
}
