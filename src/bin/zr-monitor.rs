//! Prints the telemetry frames a car sends over its serial link.

use std::fs::OpenOptions;
use std::io::{self, BufReader, Write};
use std::process::ExitCode;

use tracing::{error, warn};

use zombie_race::error::TransportError;
use zombie_race::logging::setup_logging;
use zombie_race::telemetry::{Command, Frame, FrameReader};

fn mode(command: Command) -> &'static str {
    match command {
        Command::Save => "Saving",
        Command::Load => "Loading",
        Command::Debug => "Debugging",
    }
}

fn print_frame(out: &mut impl Write, frame: &Frame) -> io::Result<()> {
    writeln!(out, "Mode: {}", mode(frame.command))?;
    for line in &frame.lines {
        writeln!(out, "  {line}")?;
    }
    out.flush()
}

fn main() -> ExitCode {
    setup_logging();

    let args: Vec<String> = std::env::args().collect();
    let [_, device] = args.as_slice() else {
        eprintln!("Expected 1 command line argument containing serial device name.");
        eprintln!("Example: zr-monitor /dev/ttyACM0");
        return ExitCode::from(1);
    };

    let file = match OpenOptions::new().read(true).write(true).open(device) {
        Ok(file) => file,
        Err(source) => {
            eprintln!(
                "{}",
                TransportError::Open {
                    path: device.into(),
                    source
                }
            );
            return ExitCode::from(1);
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for frame in FrameReader::new(BufReader::new(file)) {
        match frame {
            Ok(frame) => {
                if let Err(e) = print_frame(&mut out, &frame) {
                    error!(error = %e, "Could not write to stdout");
                    return ExitCode::from(1);
                }
            }
            Err(TransportError::Io(e)) => {
                error!(error = %e, "Serial link failed");
                return ExitCode::from(1);
            }
            // Resynchronise on the next byte
            Err(e) => warn!(error = %e, "Skipping malformed frame"),
        }
    }

    ExitCode::SUCCESS
}
