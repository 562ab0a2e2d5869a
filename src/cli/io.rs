//! JSON output for the CLI
//!
//! - One JSON object per command on stdout
//! - `{"status":"ok","data":...}` or `{"status":"error","code":...,"message":...}`

use std::io::{self, Write};

use serde::Serialize;
use serde_json::{json, Value};

use super::errors::CliResult;

fn ok_body<T: Serialize>(data: &T) -> CliResult<Value> {
    Ok(json!({
        "status": "ok",
        "data": serde_json::to_value(data)?
    }))
}

fn error_body(code: &str, message: &str) -> Value {
    json!({
        "status": "error",
        "code": code,
        "message": message
    })
}

fn write_line(value: &Value) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}

/// Write a success response to stdout
pub fn write_response<T: Serialize>(data: &T) -> CliResult<()> {
    write_line(&ok_body(data)?)
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_line(&error_body(code, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_body() {
        let body = ok_body(&json!({"rows": 3})).unwrap();
        assert_eq!(body, json!({"status": "ok", "data": {"rows": 3}}));
    }

    #[test]
    fn test_error_body() {
        assert_eq!(
            error_body("SEED_CLI_IO_ERROR", "broken pipe"),
            json!({"status": "error", "code": "SEED_CLI_IO_ERROR", "message": "broken pipe"})
        );
    }
}
