//! shiftseed CLI entry point
//!
//! Parses arguments and dispatches through `cli::run`. Errors are printed
//! to stderr and end the process with a non-zero exit code.

use shiftseed::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
