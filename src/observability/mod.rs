//! Observability for shiftseed
//!
//! Structured JSON log lines on stderr, one per event. The decoder and
//! validator never log; the loader and CLI log around them.
//!
//! ```ignore
//! use shiftseed::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::BatchStart, &[("kind", "soldier")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event at its own severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
