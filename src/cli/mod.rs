//! CLI module for shiftseed
//!
//! Provides command-line interface for:
//! - check: dry-run a fixture file through decode and validation
//! - seed: log in and submit every configured fixture
//! - schema: print an entity's declared schema

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, check_report, run, run_command, schema, seed, seed_summary, SeedSummary};
pub use config::{Config, ConfigError, ConfigResult, Fixture, FixtureConfig, PASSWORD_ENV};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};
