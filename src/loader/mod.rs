//! Fixture loader
//!
//! Ties the source, decoder, validator and submitter together for one
//! fixture batch at a time, and reports what happened to every row.

mod batch;
mod report;

pub use batch::Loader;
pub use report::{BatchReport, FailureReason, RowFailure};
