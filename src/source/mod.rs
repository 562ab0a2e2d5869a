//! Fixture source
//!
//! Reads CSV fixture files whose header row carries the type tags the
//! decoder understands. The reader hands out raw text only; typing happens
//! in `decode`.

mod errors;
mod reader;

pub use errors::{SourceError, SourceResult};
pub use reader::{FixtureReader, RawRow};

