//! User-facing progress output
//!
//! Progress lines go to an [`OutputSink`]; internal diagnostics use `tracing`.

use std::sync::{Arc, Mutex};
use tracing::Level;

const DEBUG_PREFIX: &str = "[pyinstaller-runner]";

/// Destination for progress lines
pub trait OutputSink: Send + Sync {
    fn write_line(&self, line: &str);

    /// Warnings and errors; defaults to the regular stream
    fn write_error_line(&self, line: &str) {
        self.write_line(line);
    }
}

/// Writes to stdout, warnings and errors to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write_line(&self, line: &str) {
        println!("{line}");
    }

    fn write_error_line(&self, line: &str) {
        eprintln!("{line}");
    }
}

/// Collects lines in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn contains(&self, line: &str) -> bool {
        self.lines().iter().any(|l| l == line)
    }
}

impl OutputSink for MemorySink {
    fn write_line(&self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }
}

/// How chatty the build is; maps onto `-v` occurrences
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    #[default]
    Normal,
    Verbose,
    Debug,
}

impl Verbosity {
    pub fn from_occurrences(count: u8) -> Self {
        match count {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    }

    /// Log level handed to the freezing tool
    pub fn log_level(self) -> Level {
        match self {
            Verbosity::Normal => Level::WARN,
            Verbosity::Verbose => Level::INFO,
            Verbosity::Debug => Level::DEBUG,
        }
    }
}

#[derive(Clone)]
pub struct Console {
    sink: Arc<dyn OutputSink>,
    verbosity: Verbosity,
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("verbosity", &self.verbosity)
            .finish_non_exhaustive()
    }
}

impl Console {
    pub fn new(sink: Arc<dyn OutputSink>, verbosity: Verbosity) -> Self {
        Self { sink, verbosity }
    }

    pub fn stdout(verbosity: Verbosity) -> Self {
        Self::new(Arc::new(StdoutSink), verbosity)
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn is_debug(&self) -> bool {
        self.verbosity == Verbosity::Debug
    }

    fn decorate(&self, msg: &str) -> String {
        if self.is_debug() {
            format!("{DEBUG_PREFIX} {msg}")
        } else {
            msg.to_string()
        }
    }

    pub fn log(&self, msg: &str) {
        self.sink.write_line(&self.decorate(msg));
    }

    pub fn warning(&self, msg: &str) {
        self.sink.write_error_line(&self.decorate(msg));
    }

    pub fn error(&self, msg: &str) {
        self.sink.write_error_line(&self.decorate(&format!("error: {msg}")));
    }

    pub fn debug(&self, msg: &str) {
        if self.is_debug() {
            self.log(msg);
        }
    }

    /// Echo captured command output, one debug line per output line
    pub fn debug_command(&self, output: &str) {
        for line in output.lines() {
            self.debug(&format!(" + {line}"));
        }
    }
}
