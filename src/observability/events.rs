//! Loader lifecycle events
//!
//! Every log line the loader writes is one of these events. Each event has
//! a fixed severity so call sites never pick one ad hoc.

use std::fmt;

use super::logger::Severity;

/// Observable events during a seeding run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Setup
    /// Configuration file loaded and validated
    ConfigLoaded,
    /// API user registered
    UserRegistered,
    /// API user registration refused
    UserRegisterFailed,
    /// Login succeeded, bearer token held
    LoginOk,
    /// Login refused
    LoginFailed,

    // Batches
    /// A fixture file is about to be processed
    BatchStart,
    /// A fixture file finished (with or without row failures)
    BatchComplete,
    /// A fixture file could not be read to the end
    BatchAborted,
    /// A header declared a type tag that fell back to string
    UnrecognizedTypeTag,

    // Rows
    /// Row could not be read from the source
    RowSourceFailed,
    /// Row cell could not be coerced
    RowDecodeFailed,
    /// Row failed its entity schema
    RowInvalid,
    /// Row accepted by the API
    RowSubmitted,
    /// Row refused by the API
    RowRejected,
    /// Row could not be sent
    RowSubmitFailed,

    // Listing
    /// Entities listed back from the API
    ListComplete,
    /// A collection could not be listed back
    ListFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::UserRegistered => "USER_REGISTERED",
            Event::UserRegisterFailed => "USER_REGISTER_FAILED",
            Event::LoginOk => "LOGIN_OK",
            Event::LoginFailed => "LOGIN_FAILED",

            Event::BatchStart => "BATCH_START",
            Event::BatchComplete => "BATCH_COMPLETE",
            Event::BatchAborted => "BATCH_ABORTED",
            Event::UnrecognizedTypeTag => "UNRECOGNIZED_TYPE_TAG",

            Event::RowSourceFailed => "ROW_SOURCE_FAILED",
            Event::RowDecodeFailed => "ROW_DECODE_FAILED",
            Event::RowInvalid => "ROW_INVALID",
            Event::RowSubmitted => "ROW_SUBMITTED",
            Event::RowRejected => "ROW_REJECTED",
            Event::RowSubmitFailed => "ROW_SUBMIT_FAILED",

            Event::ListComplete => "LIST_COMPLETE",
            Event::ListFailed => "LIST_FAILED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::RowSubmitted => Severity::Trace,
            Event::UserRegisterFailed
            | Event::UnrecognizedTypeTag
            | Event::RowSourceFailed
            | Event::RowDecodeFailed
            | Event::RowInvalid
            | Event::RowRejected
            | Event::ListFailed => Severity::Warn,
            Event::LoginFailed | Event::BatchAborted | Event::RowSubmitFailed => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_strings_are_upper_snake() {
        let events = [
            Event::ConfigLoaded,
            Event::LoginOk,
            Event::BatchStart,
            Event::RowInvalid,
            Event::ListComplete,
        ];
        for event in events {
            let s = event.as_str();
            assert!(s.chars().all(|c| c.is_ascii_uppercase() || c == '_'), "{s}");
        }
    }

    #[test]
    fn test_row_failures_are_warnings_or_errors() {
        assert_eq!(Event::RowInvalid.severity(), Severity::Warn);
        assert_eq!(Event::RowSubmitFailed.severity(), Severity::Error);
        assert_eq!(Event::RowSubmitted.severity(), Severity::Trace);
        assert_eq!(Event::BatchComplete.severity(), Severity::Info);
        assert_eq!(Event::ListFailed.severity(), Severity::Warn);
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::BatchStart), "BATCH_START");
    }
}
