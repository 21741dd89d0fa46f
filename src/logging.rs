//! Logger setup for binaries embedding the optimizer.

use std::io::Write;

use env_logger::{fmt::Formatter, Builder, Target};
use log::{Level, LevelFilter};

use crate::error::{Error, Result};

/// Line layout for log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// `LEVEL message`
    #[default]
    Compact,
    /// `LEVEL [target] message`
    Pretty,
}

/// Installs a stderr logger. Fails if a logger is already installed.
pub fn init_logger(level: LevelFilter, format: LogFormat, timestamp: bool) -> Result<()> {
    let mut builder = Builder::new();
    builder
        .filter_level(level)
        .write_style(env_logger::WriteStyle::Never)
        .target(Target::Stderr)
        .format(move |buf: &mut Formatter, record| {
            if timestamp {
                write!(buf, "{} ", buf.timestamp_millis())?;
            }
            match format {
                LogFormat::Compact => writeln!(buf, "{} {}", level_tag(record.level()), record.args()),
                LogFormat::Pretty => writeln!(
                    buf,
                    "{} [{}] {}",
                    level_tag(record.level()),
                    record.target(),
                    record.args()
                ),
            }
        });

    builder
        .try_init()
        .map_err(|e| Error::invalid_argument(format!("logger init failed: {e}")))
}

/// Parses a level name such as `info` or `DEBUG`.
pub fn parse_level(s: &str) -> Result<LevelFilter> {
    s.parse::<LevelFilter>()
        .map_err(|_| Error::invalid_argument(format!("unknown log level {s:?}")))
}

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}
