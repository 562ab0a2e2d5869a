//! Submission collaborator
//!
//! The loader hands validated records to a `Submitter` and only looks at
//! the outcome. Transport, authentication and status interpretation live
//! behind the trait:
//! - `ApiClient`: blocking HTTP client for the scheduling API
//! - `DryRunSubmitter`: accepts everything, keeps the bodies in memory

mod client;
mod dry_run;
mod errors;

pub use client::ApiClient;
pub use dry_run::DryRunSubmitter;
pub use errors::{SubmitError, SubmitResult};

use serde::Serialize;

use crate::schema::{EntityKind, ValidatedRecord};

/// What the API said about one record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// Record created
    Created,
    /// Record refused with this HTTP status
    Rejected { status: u16 },
}

/// Sink for validated records.
///
/// Records are submitted one at a time; an implementation never sees two
/// calls in flight.
pub trait Submitter {
    /// Submits one record.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError` when the record could not be delivered at all.
    fn submit(&mut self, record: &ValidatedRecord) -> SubmitResult<SubmitOutcome>;
}

impl<S: Submitter + ?Sized> Submitter for &mut S {
    fn submit(&mut self, record: &ValidatedRecord) -> SubmitResult<SubmitOutcome> {
        (**self).submit(record)
    }
}

/// API collection path (under `/api/v1/`) for kinds that can be created
/// on their own.
pub fn endpoint(kind: EntityKind) -> Option<&'static str> {
    match kind {
        EntityKind::Soldier => Some("soldiers"),
        EntityKind::Shift => Some("shifts"),
        EntityKind::ShiftTemplate => Some("shift-templates"),
        EntityKind::DaySchedule => Some("day-schedules"),
        EntityKind::SoldierRole
        | EntityKind::TimeOfDay
        | EntityKind::ShiftTime
        | EntityKind::PersonnelRequirement => None,
    }
}

/// Returns true if records of `kind` can be submitted
pub fn is_submittable(kind: EntityKind) -> bool {
    endpoint(kind).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(endpoint(EntityKind::Soldier), Some("soldiers"));
        assert_eq!(endpoint(EntityKind::Shift), Some("shifts"));
        assert_eq!(endpoint(EntityKind::ShiftTemplate), Some("shift-templates"));
        assert_eq!(endpoint(EntityKind::DaySchedule), Some("day-schedules"));
        assert!(!is_submittable(EntityKind::TimeOfDay));
    }

    #[test]
    fn test_outcome_serializes_tagged() {
        assert_eq!(
            serde_json::to_value(SubmitOutcome::Rejected { status: 409 }).unwrap(),
            serde_json::json!({"outcome": "rejected", "status": 409})
        );
    }
}
