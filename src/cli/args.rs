//! CLI argument definitions using clap
//!
//! Commands:
//! - shiftseed check --kind <kind> <file>
//! - shiftseed seed --config <path>
//! - shiftseed schema --kind <kind>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::observability::Severity;
use crate::schema::EntityKind;

/// shiftseed - load typed CSV fixtures into the shift scheduling API
#[derive(Parser, Debug)]
#[command(name = "shiftseed")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Minimum log severity on stderr (TRACE, INFO, WARN, ERROR)
    #[arg(long, global = true, value_parser = parse_severity)]
    pub log_level: Option<Severity>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode and validate a fixture file without contacting the API
    Check {
        /// Entity kind of every row in the file
        #[arg(long, value_parser = parse_kind)]
        kind: EntityKind,

        /// Path to the CSV fixture file
        file: PathBuf,
    },

    /// Log in and submit every configured fixture file
    Seed {
        /// Path to configuration file
        #[arg(long, default_value = "./shiftseed.json")]
        config: PathBuf,
    },

    /// Print the declared schema of an entity kind
    Schema {
        /// Entity kind to describe
        #[arg(long, value_parser = parse_kind)]
        kind: EntityKind,
    },
}

fn parse_kind(s: &str) -> Result<EntityKind, String> {
    s.parse()
}

fn parse_severity(s: &str) -> Result<Severity, String> {
    s.parse()
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
