//! Log line formatter that stamps every event with the wall clock and the game tick.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Main loop ticks since startup, shown in every log line.
static TICK_COUNTER: AtomicU32 = AtomicU32::new(0);

/// The tick is shown as four hex digits and wraps every ~18 minutes at 60Hz.
const TICK_DISPLAY_MASK: u32 = 0xFFFF;

const TIMESTAMP_FORMAT: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second].[subsecond digits:3]");

/// Formats events as `12:34:56.789 0x01A4  INFO zombie_race::game: message key=value`.
pub struct TickFormatter;

impl<S, N> FormatEvent<S, N> for TickFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> fmt::Result {
        let meta = event.metadata();
        let ansi = writer.has_ansi_escapes();

        let timestamp = OffsetDateTime::now_utc().format(&TIMESTAMP_FORMAT).map_err(|_| fmt::Error)?;
        let tick = tick_count() & TICK_DISPLAY_MASK;
        if ansi {
            write!(writer, "\x1b[2m{timestamp} 0x{tick:04X}\x1b[0m ")?;
        } else {
            write!(writer, "{timestamp} 0x{tick:04X} ")?;
        }

        write_level(&mut writer, meta.level(), ansi)?;

        if ansi {
            write!(writer, " \x1b[2m{}:\x1b[0m ", meta.target())?;
        } else {
            write!(writer, " {}: ", meta.target())?;
        }

        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn write_level(writer: &mut Writer<'_>, level: &Level, ansi: bool) -> fmt::Result {
    let color = match *level {
        Level::TRACE => "\x1b[35m",
        Level::DEBUG => "\x1b[34m",
        Level::INFO => "\x1b[32m",
        Level::WARN => "\x1b[33m",
        Level::ERROR => "\x1b[31m",
    };
    if ansi {
        write!(writer, "{color}{:>5}\x1b[0m", level.as_str())
    } else {
        write!(writer, "{:>5}", level.as_str())
    }
}

/// Advances the tick shown in log lines. Called once per main loop iteration.
pub fn increment_tick() {
    TICK_COUNTER.fetch_add(1, Ordering::Relaxed);
}

pub fn tick_count() -> u32 {
    TICK_COUNTER.load(Ordering::Relaxed)
}
