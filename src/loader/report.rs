//! Batch reports

use serde::Serialize;

use crate::decode::DecodeError;
use crate::schema::{EntityKind, Violation};
use crate::source::SourceError;
use crate::submit::SubmitError;

/// Why one row did not make it to the API
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum FailureReason {
    /// Row could not be read from the file
    Source { message: String },
    /// A cell could not be coerced
    Decode {
        code: &'static str,
        column: String,
        raw: String,
        message: String,
    },
    /// Record failed its schema
    Invalid { violations: Vec<Violation> },
    /// API refused the record
    Rejected { status: u16 },
    /// Record could not be delivered
    Submit { code: &'static str, message: String },
}

impl From<&SourceError> for FailureReason {
    fn from(err: &SourceError) -> Self {
        FailureReason::Source {
            message: err.to_string(),
        }
    }
}

impl From<&DecodeError> for FailureReason {
    fn from(err: &DecodeError) -> Self {
        FailureReason::Decode {
            code: err.code(),
            column: err.column().to_string(),
            raw: err.raw().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<&SubmitError> for FailureReason {
    fn from(err: &SubmitError) -> Self {
        FailureReason::Submit {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

/// A failed row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowFailure {
    /// 1-based data row number
    pub row: usize,
    #[serde(flatten)]
    pub reason: FailureReason,
}

/// Outcome of loading one fixture batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub kind: EntityKind,
    /// Rows seen, including failed ones
    pub rows: usize,
    pub submitted: usize,
    pub rejected: usize,
    pub source_failed: usize,
    pub decode_failed: usize,
    pub invalid: usize,
    pub submit_failed: usize,
    /// Set when the batch stopped before the end of its source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aborted: Option<String>,
    pub failures: Vec<RowFailure>,
}

impl BatchReport {
    /// Empty report for a batch of `kind`
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            rows: 0,
            submitted: 0,
            rejected: 0,
            source_failed: 0,
            decode_failed: 0,
            invalid: 0,
            submit_failed: 0,
            aborted: None,
            failures: Vec::new(),
        }
    }

    /// Records a failed row and bumps the matching counter
    pub fn fail(&mut self, row: usize, reason: FailureReason) {
        match reason {
            FailureReason::Source { .. } => self.source_failed += 1,
            FailureReason::Decode { .. } => self.decode_failed += 1,
            FailureReason::Invalid { .. } => self.invalid += 1,
            FailureReason::Rejected { .. } => self.rejected += 1,
            FailureReason::Submit { .. } => self.submit_failed += 1,
        }
        self.failures.push(RowFailure { row, reason });
    }

    /// Rows that failed for any reason
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// True when every row was submitted and the batch ran to the end
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.aborted.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fail_bumps_counters() {
        let mut report = BatchReport::new(EntityKind::Shift);
        report.fail(1, FailureReason::Rejected { status: 400 });
        report.fail(2, FailureReason::Invalid { violations: vec![Violation::required("id")] });
        assert_eq!(report.rejected, 1);
        assert_eq!(report.invalid, 1);
        assert_eq!(report.failed(), 2);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_decode_failure_keeps_column_and_value() {
        let err = DecodeError::InvalidInt {
            column: "type".into(),
            raw: "x".into(),
        };
        let reason = FailureReason::from(&err);
        let value = serde_json::to_value(RowFailure { row: 4, reason }).unwrap();
        assert_eq!(value["row"], json!(4));
        assert_eq!(value["stage"], json!("decode"));
        assert_eq!(value["column"], json!("type"));
        assert_eq!(value["raw"], json!("x"));
    }

    #[test]
    fn test_new_report_is_clean() {
        let report = BatchReport::new(EntityKind::Soldier);
        assert!(report.is_clean());
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["kind"], json!("soldier"));
        assert!(value.get("aborted").is_none());
    }
}
