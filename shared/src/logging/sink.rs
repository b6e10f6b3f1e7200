//! Console sinks for encoded log records.

use std::io::Write;
use std::sync::{Arc, Mutex};

/// Destination for encoded log lines.
///
/// Writing is best-effort: implementations swallow their own failures.
pub trait LogSink: Send + Sync {
    /// Writes one encoded record. `line` carries no trailing newline.
    fn write_line(&self, line: &str);
}

/// Writes each record as one line on standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn write_line(&self, line: &str) {
        let mut out = std::io::stdout().lock();
        // A closed stdout must not take the request down with it
        let _ = writeln!(out, "{line}");
    }
}

/// Keeps records in memory. Used to inspect console output in tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every line written so far.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    /// Parses every line written so far as JSON, skipping unparseable lines.
    #[must_use]
    pub fn records(&self) -> Vec<serde_json::Value> {
        self.lines()
            .iter()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }
}
