//! Destinations for the lines logged by a [`Timer`].

use std::fmt::Debug;
use std::fmt::Formatter;
use std::io;
use std::io::Write;

use log::Level;

#[cfg(doc)]
use crate::Timer;

/// A destination which accepts the lines logged by a [`Timer`], one line per call.
///
/// Sinks are `Send`, so that a timer can be moved to, or shared behind a lock with, another
/// thread. Any `FnMut(&str) + Send` closure is a sink which never fails:
/// ```
/// use std::sync::Arc;
/// use std::sync::Mutex;
///
/// use thyming::Timer;
/// use thyming::TimerOptions;
///
/// let lines = Arc::new(Mutex::new(Vec::new()));
/// let sink_lines = Arc::clone(&lines);
/// let mut timer = Timer::with_options(TimerOptions {
///     logger: Some(Box::new(move |line: &str| {
///         sink_lines.lock().expect("not poisoned").push(line.to_owned())
///     })),
///     ..Default::default()
/// });
///
/// let _ = timer.start().expect("timer is stopped");
/// let _ = timer.stop().expect("timer is running");
///
/// let lines = lines.lock().expect("not poisoned");
/// assert_eq!(lines.len(), 1);
/// assert!(lines[0].starts_with("Elapsed time: "));
/// ```
pub trait LogSink: Send {
    /// Writes a single line, which never contains a newline character.
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

impl<F: FnMut(&str) + Send> LogSink for F {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self(line);
        Ok(())
    }
}

/// Forwards every line to the [`log`] facade at a fixed level.
///
/// This is the sink a [`Timer`] uses unless configured otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogCrateSink {
    level: Level,
}

impl LogCrateSink {
    /// Creates a sink which logs at the given level.
    pub fn new(level: Level) -> LogCrateSink {
        LogCrateSink { level }
    }

    /// The level at which lines are logged.
    pub fn level(&self) -> Level {
        self.level
    }
}

impl Default for LogCrateSink {
    fn default() -> Self {
        LogCrateSink::new(Level::Info)
    }
}

impl LogSink for LogCrateSink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        log::log!(self.level, "{line}");
        Ok(())
    }
}

/// Writes every line, followed by a newline, to the wrapped writer.
///
/// Write errors are returned to the [`Timer`], which passes them on to its caller.
pub struct WriterSink<W> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    /// Wraps the given writer.
    pub fn new(writer: W) -> WriterSink<W> {
        WriterSink { writer }
    }

    /// Unwraps the sink, returning the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterSink<io::Stdout> {
    /// A sink writing to the standard output.
    pub fn stdout() -> Self {
        WriterSink::new(io::stdout())
    }
}

impl WriterSink<io::Stderr> {
    /// A sink writing to the standard error.
    pub fn stderr() -> Self {
        WriterSink::new(io::stderr())
    }
}

impl<W> Debug for WriterSink<W> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriterSink")
            .field("writer", &"<Writer>")
            .finish()
    }
}

impl<W: Write + Send> LogSink for WriterSink<W> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.writer, "{line}")
    }
}
