//! Logger seam for I/O failures
//!
//! File resources never propagate I/O failures as panics. They report them
//! through a [`Logger`] and hand a typed error back to the caller.

use parking_lot::Mutex;

/// Severity of a log record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Error,
    Warn,
    Info,
    Debug,
}

/// Terminal color hint, ignored by sinks that do not render color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Default,
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Default => "default",
            Color::Red => "red",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Blue => "blue",
        }
    }
}

/// A single log record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: Level,
    pub message: String,
    pub color: Color,
    pub timestamped: bool,
}

impl LogRecord {
    /// Record for a failed filesystem call: `"<operation> : <error> of <path>"`
    pub fn io_failure(operation: &str, error: &std::io::Error, path: &str) -> Self {
        Self {
            level: Level::Debug,
            message: format!("{} : {} of {}", operation, error, path),
            color: Color::Red,
            timestamped: true,
        }
    }
}

/// Sink for log records. Implementations must not panic.
pub trait Logger: Send + Sync {
    fn log(&self, record: LogRecord);
}

/// Forwards records to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, record: LogRecord) {
        let color = record.color.as_str();
        let timestamped = record.timestamped;
        match record.level {
            Level::Error => tracing::error!(color, timestamped, "{}", record.message),
            Level::Warn => tracing::warn!(color, timestamped, "{}", record.message),
            Level::Info => tracing::info!(color, timestamped, "{}", record.message),
            Level::Debug => tracing::debug!(color, timestamped, "{}", record.message),
        }
    }
}

/// Keeps every record in memory
#[derive(Debug, Default)]
pub struct MemoryLogger {
    records: Mutex<Vec<LogRecord>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the records logged so far
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    /// Just the messages
    pub fn messages(&self) -> Vec<String> {
        self.records.lock().iter().map(|r| r.message.clone()).collect()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl Logger for MemoryLogger {
    fn log(&self, record: LogRecord) {
        self.records.lock().push(record);
    }
}
