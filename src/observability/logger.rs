//! Structured JSON logger
//!
//! - One log line = one JSON object
//! - `event` first, `severity` second, remaining keys sorted
//! - Written to stderr; stdout is reserved for command responses
//! - Synchronous, no buffering
//! - Lines below the process-wide minimum severity are dropped

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Per-row detail
    Trace = 0,
    /// Normal progress
    Info = 1,
    /// Row-level failures
    Warn = 2,
    /// Failures that stop a batch or a run
    Error = 3,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }

    fn from_u8(v: u8) -> Self {
        match v {
            0 => Severity::Trace,
            1 => Severity::Info,
            2 => Severity::Warn,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TRACE" => Ok(Severity::Trace),
            "INFO" => Ok(Severity::Info),
            "WARN" => Ok(Severity::Warn),
            "ERROR" => Ok(Severity::Error),
            _ => Err(format!(
                "invalid log level '{}' (expected TRACE, INFO, WARN or ERROR)",
                s
            )),
        }
    }
}

static MIN_SEVERITY: AtomicU8 = AtomicU8::new(Severity::Info as u8);

/// Structured logger writing JSON lines
pub struct Logger;

impl Logger {
    /// Sets the process-wide minimum severity
    pub fn set_min_severity(severity: Severity) {
        MIN_SEVERITY.store(severity as u8, Ordering::Relaxed);
    }

    /// Current minimum severity
    pub fn min_severity() -> Severity {
        Severity::from_u8(MIN_SEVERITY.load(Ordering::Relaxed))
    }

    /// Returns true if a line at `severity` would be written
    pub fn enabled(severity: Severity) -> bool {
        severity >= Self::min_severity()
    }

    /// Log an event with the given severity and fields
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        if !Self::enabled(severity) {
            return;
        }
        Self::log_to_writer(severity, event, fields, &mut io::stderr());
    }

    fn log_to_writer<W: Write>(
        severity: Severity,
        event: &str,
        fields: &[(&str, &str)],
        writer: &mut W,
    ) {
        let line = Self::render(severity, event, fields);
        // Logging must never fail the caller
        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }

    fn render(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
        let mut sorted: Vec<&(&str, &str)> = fields.iter().collect();
        sorted.sort_by_key(|(k, _)| *k);

        let mut output = String::with_capacity(128);
        output.push_str("{\"event\":");
        output.push_str(&quote(event));
        output.push_str(",\"severity\":");
        output.push_str(&quote(severity.as_str()));
        for (key, value) in sorted {
            output.push(',');
            output.push_str(&quote(key));
            output.push(':');
            output.push_str(&quote(value));
        }
        output.push_str("}\n");
        output
    }
}

fn quote(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}

/// Capture logs to a buffer for testing
#[cfg(test)]
pub fn capture_log(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    let mut buffer = Vec::new();
    Logger::log_to_writer(severity, event, fields, &mut buffer);
    String::from_utf8(buffer).unwrap()
}
