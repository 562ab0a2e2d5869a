//! Fixture source errors

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for source operations
pub type SourceResult<T> = Result<T, SourceError>;

/// Failure to read rows from a fixture file
#[derive(Debug, Error)]
pub enum SourceError {
    /// Fixture file could not be opened
    #[error("failed to open fixture '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Header row could not be read
    #[error("failed to read header row: {0}")]
    Header(#[source] csv::Error),

    /// A data row could not be read or parsed
    #[error("row {row}: {source}")]
    Csv {
        row: usize,
        #[source]
        source: csv::Error,
    },

    /// A data row has more cells than there are headers
    #[error("row {row}: {actual} cells but only {expected} headers")]
    RowLength {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

impl SourceError {
    /// Returns true when reading cannot continue past this error
    pub fn is_fatal(&self) -> bool {
        match self {
            SourceError::Open { .. } | SourceError::Header(_) => true,
            SourceError::Csv { source, .. } => source.is_io_error(),
            SourceError::RowLength { .. } => false,
        }
    }

    /// 1-based data row the error belongs to, if any
    pub fn row(&self) -> Option<usize> {
        match self {
            SourceError::Csv { row, .. } | SourceError::RowLength { row, .. } => Some(*row),
            SourceError::Open { .. } | SourceError::Header(_) => None,
        }
    }
}
