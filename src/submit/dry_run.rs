use serde_json::Value;

use super::errors::SubmitResult;
use super::{SubmitOutcome, Submitter};
use crate::schema::{EntityKind, ValidatedRecord};

/// Accepts every record without sending it anywhere.
///
/// Used by `shiftseed check` and by tests; the submitted bodies are kept in
/// order so callers can inspect what would have been sent.
#[derive(Debug, Default)]
pub struct DryRunSubmitter {
    submitted: Vec<(EntityKind, Value)>,
}

impl DryRunSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bodies submitted so far, in order
    pub fn submitted(&self) -> &[(EntityKind, Value)] {
        &self.submitted
    }
}

impl Submitter for DryRunSubmitter {
    fn submit(&mut self, record: &ValidatedRecord) -> SubmitResult<SubmitOutcome> {
        self.submitted.push((record.kind(), record.to_json()));
        Ok(SubmitOutcome::Created)
    }
}
