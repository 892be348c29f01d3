// std imports
use std::env;
use std::io::{self, IsTerminal, Write};
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

// third-party imports
use chrono::Local;
use env_logger::{Target, WriteStyle, fmt::Formatter};
use log::{LevelFilter, Record};

// local imports
use crate::error::{Error, Result};
use crate::timeformat::expand_time_format;
use crate::tristate::TriState;
use crate::writer::RotatingLogWriter;

// ---

pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";
pub const LOG_COLOR_VAR: &str = "LOG_COLOR";
pub const LOG_OUTPUT_VAR: &str = "LOG_OUTPUT";
pub const LOG_FORMAT_VAR: &str = "LOG_FORMAT";
pub const LOG_TIME_FORMAT_VAR: &str = "LOG_TIMEFORMAT";

// ---

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LogFormat {
    Json,
    Console,
}

impl FromStr for LogFormat {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "json" => Ok(Self::Json),
            "console" => Ok(Self::Console),
            _ => Err(Error::InvalidFormat {
                value: value.to_owned(),
            }),
        }
    }
}

// ---

#[derive(Debug)]
enum Sink {
    Stdout,
    Stderr,
    Rotating(Arc<RotatingLogWriter>),
}

impl Sink {
    fn from_spec(spec: &str) -> Result<Self> {
        match spec {
            "stdout" => Ok(Self::Stdout),
            "stderr" => Ok(Self::Stderr),
            _ => {
                if let Some(path) = spec.strip_prefix("file:") {
                    Ok(Self::Rotating(Arc::new(RotatingLogWriter::new(path, false)?)))
                } else if let Some(path) = spec.strip_prefix("pattern:") {
                    Ok(Self::Rotating(Arc::new(RotatingLogWriter::new(path, true)?)))
                } else {
                    Err(Error::InvalidOutput {
                        value: spec.to_owned(),
                    })
                }
            }
        }
    }

    fn is_terminal(&self) -> bool {
        match self {
            Self::Stdout => io::stdout().is_terminal(),
            Self::Stderr => io::stderr().is_terminal(),
            Self::Rotating(_) => false,
        }
    }
}

static SINK: OnceLock<Sink> = OnceLock::new();

// ---

/// Builds the process-wide logger from `LOG_*` environment variables.
///
/// `LOG_OUTPUT` selects the sink: `stdout`, `stderr` (default), `file:<path>`
/// or `pattern:<path>` where the path is expanded with
/// [`expand_path`](crate::strftime::expand_path) on open and on every
/// [`rotate`]. `LOG_FORMAT` picks `json` or `console` lines, defaulting to
/// `console` on a terminal sink. `LOG_TIMEFORMAT` accepts a symbolic alias or
/// a raw chrono layout.
pub fn init() -> Result<()> {
    let mut builder = env_logger::Builder::new();

    match env::var(LOG_LEVEL_VAR) {
        Ok(value) => {
            let level = value
                .parse::<LevelFilter>()
                .map_err(|_| Error::InvalidLevel { value })?;
            builder.filter_level(level);
        }
        Err(_) => {
            builder.filter_level(LevelFilter::Info);
        }
    }

    let mut color = match env::var(LOG_COLOR_VAR) {
        Ok(value) => value.parse::<TriState>()?,
        Err(_) => TriState::Auto,
    };

    let output = env::var(LOG_OUTPUT_VAR).unwrap_or_else(|_| "stderr".into());
    let sink = Sink::from_spec(&output)?;

    let is_terminal = sink.is_terminal();
    if !is_terminal && color == TriState::Auto {
        color = TriState::No;
    }
    builder.write_style(match color {
        TriState::Auto => WriteStyle::Auto,
        TriState::Yes => WriteStyle::Always,
        TriState::No => WriteStyle::Never,
    });

    let format = match env::var(LOG_FORMAT_VAR) {
        Ok(value) => value.parse::<LogFormat>()?,
        Err(_) => {
            if is_terminal {
                LogFormat::Console
            } else {
                LogFormat::Json
            }
        }
    };

    let time_format = env::var(LOG_TIME_FORMAT_VAR)
        .ok()
        .map(|value| expand_time_format(&value).into_owned());

    builder.format(move |buf, record| format_record(buf, record, format, time_format.as_deref()));

    match &sink {
        Sink::Stdout => builder.target(Target::Stdout),
        Sink::Stderr => builder.target(Target::Stderr),
        Sink::Rotating(writer) => builder.target(Target::Pipe(Box::new(PipeWriter(writer.clone())))),
    };

    builder.try_init().map_err(|_| Error::AlreadyInitialized)?;
    let _ = SINK.set(sink);

    Ok(())
}

/// Rotates the active file sink; a no-op for stream sinks.
pub fn rotate() -> Result<()> {
    match SINK.get() {
        Some(Sink::Rotating(writer)) => writer.rotate(),
        _ => Ok(()),
    }
}

/// Flushes the logger and closes the file sink, if any.
pub fn done() -> Result<()> {
    log::logger().flush();
    match SINK.get() {
        Some(Sink::Rotating(writer)) => writer.close(),
        _ => Ok(()),
    }
}

// ---

fn format_record(
    buf: &mut Formatter,
    record: &Record<'_>,
    format: LogFormat,
    time_format: Option<&str>,
) -> io::Result<()> {
    let now = Local::now();
    match format {
        LogFormat::Json => {
            let time = match time_format {
                Some(layout) => json::Value::from(now.format(layout).to_string()),
                None => json::Value::from(now.timestamp_millis()),
            };
            let line = json::json!({
                "time": time,
                "level": record.level().as_str().to_lowercase(),
                "target": record.target(),
                "message": record.args().to_string(),
            });
            writeln!(buf, "{line}")
        }
        LogFormat::Console => {
            let style = buf.default_level_style(record.level());
            let time = now.format(time_format.unwrap_or("%H:%M:%S"));
            writeln!(
                buf,
                "{time} {style}{:>5}{style:#} {} > {}",
                record.level(),
                record.target(),
                record.args()
            )
        }
    }
}

// ---

struct PipeWriter(Arc<RotatingLogWriter>);

impl Write for PipeWriter {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (&*self.0).write(buf)
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        (&*self.0).flush()
    }
}

// ---

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("console".parse::<LogFormat>().unwrap(), LogFormat::Console);
        let err = "plain".parse::<LogFormat>().unwrap_err();
        assert!(err.to_string().contains("plain"));
    }

    #[test]
    fn test_sink_from_spec_streams() {
        assert!(matches!(Sink::from_spec("stdout").unwrap(), Sink::Stdout));
        assert!(matches!(Sink::from_spec("stderr").unwrap(), Sink::Stderr));
    }

    #[test]
    fn test_sink_from_spec_file() {
        let path = std::env::temp_dir().join(format!("autolog-sink-{}.log", std::process::id()));
        let spec = format!("file:{}", path.display());
        let sink = Sink::from_spec(&spec).unwrap();
        assert!(matches!(sink, Sink::Rotating(_)));
        assert!(!sink.is_terminal());
        if let Sink::Rotating(writer) = sink {
            writer.close().unwrap();
        }
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_sink_from_spec_invalid() {
        let err = Sink::from_spec("syslog").unwrap_err();
        assert!(err.to_string().contains("syslog"));
    }
}
