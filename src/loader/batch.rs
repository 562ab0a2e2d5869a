//! Sequential batch pipeline: read → decode → validate → submit
//!
//! Rows are handled strictly one after another in source order. A row that
//! fails at any stage is recorded in the report and the next row is
//! processed; only a fatal source error stops the batch early. Nothing that
//! was already submitted is undone.

use std::io;
use std::path::Path;

use crate::decode::{DecodedRecord, RowDecoder};
use crate::observability::{log_event_with_fields, Event};
use crate::schema::{EntityKind, SchemaValidator};
use crate::source::{FixtureReader, RawRow, SourceResult};
use crate::submit::{SubmitOutcome, Submitter};

use super::report::{BatchReport, FailureReason};

/// Drives fixture rows through the decoder, the validator and a submitter.
pub struct Loader<S> {
    submitter: S,
}

impl<S: Submitter> Loader<S> {
    /// Creates a loader that hands accepted records to `submitter`.
    pub fn new(submitter: S) -> Self {
        Self { submitter }
    }

    pub fn submitter(&self) -> &S {
        &self.submitter
    }

    pub fn into_submitter(self) -> S {
        self.submitter
    }

    /// Loads a fixture file as records of `kind`.
    ///
    /// A file that cannot be opened produces an aborted, empty report.
    pub fn load_file(&mut self, kind: EntityKind, path: &Path) -> BatchReport {
        let source = path.display().to_string();
        match FixtureReader::open(path) {
            Ok(reader) => self.load_reader(kind, reader, &source),
            Err(err) => {
                let mut report = BatchReport::new(kind);
                log_event_with_fields(
                    Event::BatchAborted,
                    &[("kind", kind.as_str()), ("source", &source), ("error", &err.to_string())],
                );
                report.aborted = Some(err.to_string());
                report
            }
        }
    }

    /// Loads every row of an open fixture reader.
    pub fn load_reader<R: io::Read>(
        &mut self,
        kind: EntityKind,
        reader: FixtureReader<R>,
        source: &str,
    ) -> BatchReport {
        let headers = reader.headers().to_vec();
        self.load(kind, &headers, reader, source)
    }

    /// Loads rows that share `headers`.
    pub fn load<I>(&mut self, kind: EntityKind, headers: &[String], rows: I, source: &str) -> BatchReport
    where
        I: IntoIterator<Item = SourceResult<RawRow>>,
    {
        let decoder = RowDecoder::new(headers);
        let validator = SchemaValidator::new(kind);
        let mut report = BatchReport::new(kind);

        log_event_with_fields(Event::BatchStart, &[("kind", kind.as_str()), ("source", source)]);
        for header in decoder.unrecognized() {
            log_event_with_fields(
                Event::UnrecognizedTypeTag,
                &[
                    ("column", header.name()),
                    ("tag", header.declared_tag().unwrap_or_default()),
                    ("source", source),
                ],
            );
        }

        for (idx, item) in rows.into_iter().enumerate() {
            report.rows += 1;
            let raw = match item {
                Ok(raw) => raw,
                Err(err) => {
                    let row = err.row().unwrap_or(idx + 1);
                    log_event_with_fields(
                        Event::RowSourceFailed,
                        &[("row", &row.to_string()), ("error", &err.to_string())],
                    );
                    report.fail(row, FailureReason::from(&err));
                    if err.is_fatal() {
                        report.aborted = Some(err.to_string());
                        log_event_with_fields(
                            Event::BatchAborted,
                            &[("kind", kind.as_str()), ("source", source), ("error", &err.to_string())],
                        );
                        break;
                    }
                    continue;
                }
            };

            if let Err(reason) = self.row(&decoder, &validator, &raw) {
                report.fail(raw.row, reason);
            } else {
                report.submitted += 1;
            }
        }

        log_event_with_fields(
            Event::BatchComplete,
            &[
                ("kind", kind.as_str()),
                ("source", source),
                ("rows", &report.rows.to_string()),
                ("submitted", &report.submitted.to_string()),
                ("failed", &report.failed().to_string()),
            ],
        );
        report
    }

    /// Validates and submits a record that was decoded elsewhere.
    pub fn submit_record(&mut self, kind: EntityKind, record: &DecodedRecord) -> Result<(), FailureReason> {
        self.accept(&SchemaValidator::new(kind), record, 0)
    }

    fn row(
        &mut self,
        decoder: &RowDecoder,
        validator: &SchemaValidator,
        raw: &RawRow,
    ) -> Result<(), FailureReason> {
        let record = decoder.decode(&raw.cells).map_err(|err| {
            log_event_with_fields(
                Event::RowDecodeFailed,
                &[("row", &raw.row.to_string()), ("error", &err.to_string())],
            );
            FailureReason::from(&err)
        })?;
        self.accept(validator, &record, raw.row)
    }

    fn accept(
        &mut self,
        validator: &SchemaValidator,
        record: &DecodedRecord,
        row: usize,
    ) -> Result<(), FailureReason> {
        let row_str = row.to_string();

        let accepted = validator.validate(record).map_err(|err| {
            log_event_with_fields(
                Event::RowInvalid,
                &[("row", &row_str), ("error", &err.to_string())],
            );
            FailureReason::Invalid {
                violations: err.into_violations(),
            }
        })?;

        match self.submitter.submit(&accepted) {
            Ok(SubmitOutcome::Created) => {
                log_event_with_fields(Event::RowSubmitted, &[("row", &row_str)]);
                Ok(())
            }
            Ok(SubmitOutcome::Rejected { status }) => {
                log_event_with_fields(
                    Event::RowRejected,
                    &[("row", &row_str), ("status", &status.to_string())],
                );
                Err(FailureReason::Rejected { status })
            }
            Err(err) => {
                log_event_with_fields(
                    Event::RowSubmitFailed,
                    &[("row", &row_str), ("error", &err.to_string())],
                );
                Err(FailureReason::from(&err))
            }
        }
    }
}
