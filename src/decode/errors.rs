//! Decode error types
//!
//! A decode error always names the column it came from and the raw text
//! that could not be coerced, so callers can report the row without
//! re-reading the source.

use thiserror::Error;

/// Result type for decode operations
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Failure to coerce a raw cell to the type declared by its column header
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// `int` column whose text is not a base-10 integer literal
    #[error("column '{column}': '{raw}' is not a valid integer literal")]
    InvalidInt { column: String, raw: String },

    /// `float` column whose text is not a decimal/exponential literal
    #[error("column '{column}': '{raw}' is not a valid float literal")]
    InvalidFloat { column: String, raw: String },

    /// `float` column that parsed to NaN or infinity
    #[error("column '{column}': '{raw}' is not a finite number")]
    NonFiniteFloat { column: String, raw: String },

    /// `dict` column whose text is not a structured-data literal
    #[error("column '{column}': malformed structured literal '{raw}': {reason}")]
    InvalidDict {
        column: String,
        raw: String,
        reason: String,
    },
}

impl DecodeError {
    /// Name of the offending column (type tag already stripped)
    pub fn column(&self) -> &str {
        match self {
            DecodeError::InvalidInt { column, .. }
            | DecodeError::InvalidFloat { column, .. }
            | DecodeError::NonFiniteFloat { column, .. }
            | DecodeError::InvalidDict { column, .. } => column,
        }
    }

    /// The raw cell text that failed to decode
    pub fn raw(&self) -> &str {
        match self {
            DecodeError::InvalidInt { raw, .. }
            | DecodeError::InvalidFloat { raw, .. }
            | DecodeError::NonFiniteFloat { raw, .. }
            | DecodeError::InvalidDict { raw, .. } => raw,
        }
    }

    /// Stable error code for reports
    pub fn code(&self) -> &'static str {
        match self {
            DecodeError::InvalidInt { .. } => "DECODE_INVALID_INT",
            DecodeError::InvalidFloat { .. } => "DECODE_INVALID_FLOAT",
            DecodeError::NonFiniteFloat { .. } => "DECODE_NON_FINITE_FLOAT",
            DecodeError::InvalidDict { .. } => "DECODE_INVALID_DICT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let err = DecodeError::InvalidInt {
            column: "position".into(),
            raw: "abc".into(),
        };
        assert_eq!(err.column(), "position");
        assert_eq!(err.raw(), "abc");
        assert_eq!(err.code(), "DECODE_INVALID_INT");
    }

    #[test]
    fn test_display_names_column_and_value() {
        let err = DecodeError::InvalidDict {
            column: "roles".into(),
            raw: "[{".into(),
            reason: "EOF while parsing".into(),
        };
        let display = err.to_string();
        assert!(display.contains("roles"));
        assert!(display.contains("[{"));
        assert!(display.contains("EOF"));
    }
}
