//! CLI command implementations
//!
//! Every command writes exactly one JSON response to stdout. Logs go to
//! stderr.

use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::loader::{BatchReport, Loader};
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::schema::{schema_for, EntityKind};
use crate::submit::{ApiClient, DryRunSubmitter};

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliErrorCode, CliResult};
use super::io::{write_error, write_response};

/// Response body of `seed`
#[derive(Debug, Serialize)]
pub struct SeedSummary {
    /// One report per configured fixture, in config order
    pub batches: Vec<BatchReport>,
    /// Entities read back per kind, when `list_after_seed` is set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listed: Option<Map<String, Value>>,
    /// Kinds that could not be listed back, with the reason
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub list_errors: Map<String, Value>,
}

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    if let Some(level) = cli.log_level {
        Logger::set_min_severity(level);
    }

    let result = run_command(cli.command, cli.log_level.is_some());
    if let Err(e) = &result {
        // check has already written its report
        if e.code() != &CliErrorCode::CheckFailed {
            write_error(e.code_str(), e.message())?;
        }
    }
    result
}

/// Run the appropriate command based on CLI args
///
/// `log_level_fixed` is true when `--log-level` was given, in which case
/// the config file's `log_level` is ignored.
pub fn run_command(cmd: Command, log_level_fixed: bool) -> CliResult<()> {
    match cmd {
        Command::Check { kind, file } => check(kind, &file),
        Command::Seed { config } => seed(&config, log_level_fixed),
        Command::Schema { kind } => schema(kind),
    }
}

/// Decode and validate a fixture file without network access.
///
/// Writes the batch report; fails with `SEED_CLI_CHECK_FAILED` if any row
/// would not load or the file could not be read to the end.
pub fn check(kind: EntityKind, file: &Path) -> CliResult<()> {
    let report = check_report(kind, file);
    write_response(&report)?;
    check_outcome(&report)
}

/// Batch report for a dry run of `file`
pub fn check_report(kind: EntityKind, file: &Path) -> BatchReport {
    let mut loader = Loader::new(DryRunSubmitter::new());
    loader.load_file(kind, file)
}

fn check_outcome(report: &BatchReport) -> CliResult<()> {
    match &report.aborted {
        Some(reason) => Err(CliError::check_failed(format!(
            "batch aborted after {} row(s): {}",
            report.rows, reason
        ))),
        None if report.failures.is_empty() => Ok(()),
        None => Err(CliError::check_failed(format!(
            "{} row(s) would not load",
            report.failed()
        ))),
    }
}

/// Register (optionally), log in, load every configured fixture and
/// optionally list what the API now holds.
pub fn seed(config_path: &Path, log_level_fixed: bool) -> CliResult<()> {
    let summary = seed_summary(config_path, log_level_fixed)?;
    write_response(&summary)
}

/// Runs a seed and returns its summary without writing it.
///
/// Listing failures end up in `list_errors`; only setup failures are
/// errors.
pub fn seed_summary(config_path: &Path, log_level_fixed: bool) -> CliResult<SeedSummary> {
    let config = Config::load(config_path)?;
    if !log_level_fixed {
        Logger::set_min_severity(config.severity()?);
    }
    let fixtures = config.resolved_fixtures()?;

    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("path", &config_path.display().to_string()),
            ("base_url", &config.base_url),
            ("fixtures", &fixtures.len().to_string()),
        ],
    );

    let mut api = ApiClient::new(&config.base_url, config.timeout())?;

    if config.register {
        if api.register(&config.username, &config.password)? {
            log_event_with_fields(Event::UserRegistered, &[("username", &config.username)]);
        } else {
            log_event_with_fields(Event::UserRegisterFailed, &[("username", &config.username)]);
        }
    }

    if let Err(e) = api.login(&config.username, &config.password) {
        log_event_with_fields(
            Event::LoginFailed,
            &[("username", &config.username), ("error", &e.to_string())],
        );
        return Err(e.into());
    }
    log_event_with_fields(Event::LoginOk, &[("username", &config.username)]);

    let mut loader = Loader::new(api);
    let batches: Vec<BatchReport> = fixtures
        .iter()
        .map(|fixture| loader.load_file(fixture.kind, &fixture.path))
        .collect();

    let mut summary = SeedSummary {
        batches,
        listed: None,
        list_errors: Map::new(),
    };
    if !config.list_after_seed {
        return Ok(summary);
    }

    let mut kinds: Vec<EntityKind> = Vec::new();
    for fixture in &fixtures {
        if !kinds.contains(&fixture.kind) {
            kinds.push(fixture.kind);
        }
    }

    let mut listed = Map::new();
    for kind in kinds {
        match loader.submitter().list(kind) {
            Ok(items) => {
                log_event_with_fields(
                    Event::ListComplete,
                    &[("kind", kind.as_str()), ("count", &items.len().to_string())],
                );
                listed.insert(kind.as_str().to_string(), Value::Array(items));
            }
            Err(e) => {
                log_event_with_fields(
                    Event::ListFailed,
                    &[("kind", kind.as_str()), ("error", &e.to_string())],
                );
                summary
                    .list_errors
                    .insert(kind.as_str().to_string(), Value::String(e.to_string()));
            }
        }
    }
    summary.listed = Some(listed);
    Ok(summary)
}

/// Print the declared schema of `kind`
pub fn schema(kind: EntityKind) -> CliResult<()> {
    write_response(schema_for(kind))
}
