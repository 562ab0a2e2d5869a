//! Validation error types
//!
//! Rule codes:
//! - REQUIRED: required field missing
//! - NULL: field present but null
//! - UNKNOWN: field not declared by the schema
//! - TYPE: value has the wrong JSON type
//! - MAX_LENGTH: string too long
//! - PATTERN: string does not match the pattern
//! - RANGE: integer outside its bounds
//! - MIN_ITEMS: list too short
//!
//! A `ValidationError` always carries every violation found in the record,
//! never just the first.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use super::types::EntityKind;

/// A single rule that a value broke
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Rule {
    Required,
    Null,
    Unknown,
    Type {
        expected: &'static str,
        actual: &'static str,
    },
    MaxLength {
        max: usize,
        actual: usize,
    },
    Pattern {
        pattern: String,
    },
    Range {
        min: Option<i64>,
        max: Option<i64>,
    },
    MinItems {
        min: usize,
        actual: usize,
    },
}

impl Rule {
    /// Returns the stable rule code
    pub fn code(&self) -> &'static str {
        match self {
            Rule::Required => "REQUIRED",
            Rule::Null => "NULL",
            Rule::Unknown => "UNKNOWN",
            Rule::Type { .. } => "TYPE",
            Rule::MaxLength { .. } => "MAX_LENGTH",
            Rule::Pattern { .. } => "PATTERN",
            Rule::Range { .. } => "RANGE",
            Rule::MinItems { .. } => "MIN_ITEMS",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required => write!(f, "required field missing"),
            Rule::Null => write!(f, "may not be null"),
            Rule::Unknown => write!(f, "unknown field"),
            Rule::Type { expected, actual } => write!(f, "expected {}, got {}", expected, actual),
            Rule::MaxLength { max, actual } => {
                write!(f, "length {} exceeds maximum {}", actual, max)
            }
            Rule::Pattern { pattern } => write!(f, "does not match {}", pattern),
            Rule::Range { min, max } => match (min, max) {
                (Some(lo), Some(hi)) => write!(f, "must be between {} and {}", lo, hi),
                (Some(lo), None) => write!(f, "must be at least {}", lo),
                (None, Some(hi)) => write!(f, "must be at most {}", hi),
                (None, None) => write!(f, "out of range"),
            },
            Rule::MinItems { min, actual } => {
                write!(f, "needs at least {} item(s), got {}", min, actual)
            }
        }
    }
}

/// One constraint failure at a field path
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// Field path (e.g. "roles[0].name", "days_of_occurrences.7")
    pub path: String,
    /// Rule that failed
    #[serde(flatten)]
    pub rule: Rule,
    /// Offending value, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed: Option<Value>,
}

impl Violation {
    /// Violation of `rule` at `path`
    pub fn new(path: impl Into<String>, rule: Rule, observed: Option<Value>) -> Self {
        Self {
            path: path.into(),
            rule,
            observed,
        }
    }

    /// Required field missing
    pub fn required(path: impl Into<String>) -> Self {
        Self::new(path, Rule::Required, None)
    }

    /// Explicit null where a value is expected
    pub fn null(path: impl Into<String>) -> Self {
        Self::new(path, Rule::Null, Some(Value::Null))
    }

    /// Field the schema does not declare
    pub fn unknown(path: impl Into<String>, observed: &Value) -> Self {
        Self::new(path, Rule::Unknown, Some(observed.clone()))
    }

    /// Value of the wrong JSON type; `expected` names the declared type
    pub fn type_mismatch(path: impl Into<String>, expected: &'static str, observed: &Value) -> Self {
        Self::new(
            path,
            Rule::Type {
                expected,
                actual: json_type_name(observed),
            },
            Some(observed.clone()),
        )
    }

    /// Rule code of this violation
    pub fn code(&self) -> &'static str {
        self.rule.code()
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.rule)?;
        if let Some(observed) = &self.observed {
            write!(f, " (observed {})", observed)?;
        }
        Ok(())
    }
}

/// A record that failed its entity schema
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    entity: EntityKind,
    violations: Vec<Violation>,
}

impl ValidationError {
    /// Create a validation error. `violations` should not be empty.
    pub fn new(entity: EntityKind, violations: Vec<Violation>) -> Self {
        Self { entity, violations }
    }

    /// Entity the record was validated against
    pub fn entity(&self) -> EntityKind {
        self.entity
    }

    /// Every violation found
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Violations at exactly this path
    pub fn at(&self, path: &str) -> impl Iterator<Item = &Violation> {
        let path = path.to_string();
        self.violations.iter().filter(move |v| v.path == path)
    }

    /// Returns true if a violation with `code` exists at `path`
    pub fn has(&self, path: &str, code: &str) -> bool {
        self.at(path).any(|v| v.code() == code)
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} record failed validation with {} violation(s)",
            self.entity,
            self.violations.len()
        )?;
        for (i, v) in self.violations.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{}{}", sep, v)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Result type for validation
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Returns the JSON type name for violation messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rule_codes() {
        assert_eq!(Rule::Required.code(), "REQUIRED");
        assert_eq!(Rule::Null.code(), "NULL");
        assert_eq!(Rule::Unknown.code(), "UNKNOWN");
        assert_eq!(
            Rule::Type {
                expected: "int",
                actual: "string"
            }
            .code(),
            "TYPE"
        );
        assert_eq!(Rule::MaxLength { max: 1, actual: 2 }.code(), "MAX_LENGTH");
        assert_eq!(Rule::Pattern { pattern: "x".into() }.code(), "PATTERN");
        assert_eq!(Rule::Range { min: None, max: None }.code(), "RANGE");
        assert_eq!(Rule::MinItems { min: 1, actual: 0 }.code(), "MIN_ITEMS");
    }

    #[test]
    fn test_violation_display() {
        let v = Violation::type_mismatch("position", "int", &json!("3"));
        let display = v.to_string();
        assert!(display.contains("position"));
        assert!(display.contains("expected int, got string"));
        assert!(display.contains("\"3\""));
    }

    #[test]
    fn test_violation_serializes_flat() {
        let v = Violation::new("hour", Rule::Range { min: Some(0), max: Some(23) }, Some(json!(24)));
        assert_eq!(
            serde_json::to_value(&v).unwrap(),
            json!({"path": "hour", "rule": "range", "min": 0, "max": 23, "observed": 24})
        );
    }

    #[test]
    fn test_error_lists_every_violation() {
        let err = ValidationError::new(
            EntityKind::Soldier,
            vec![Violation::required("id"), Violation::null("last_name")],
        );
        let display = err.to_string();
        assert!(display.starts_with("Soldier record failed validation with 2 violation(s)"));
        assert!(display.contains("id: required field missing"));
        assert!(display.contains("last_name: may not be null"));
        assert!(err.has("id", "REQUIRED"));
        assert!(!err.has("id", "NULL"));
    }
}
