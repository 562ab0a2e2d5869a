//! Schema Validator subsystem
//!
//! Every entity the API accepts has a fixed, declarative schema. A decoded
//! record is checked against the schema of the kind the caller names; the
//! kind is never guessed from the record's shape.
//!
//! # Design Principles
//!
//! - Schemas are static data, never mutated at runtime
//! - All violations are collected, not just the first
//! - No coercion: the decoder has already typed every value
//! - Deterministic, side-effect free validation

mod entities;
mod errors;
mod types;
mod validator;

pub use entities::{schema_for, DESCRIPTION_MAX_LEN, PERSONAL_NUMBER_PATTERN};
pub use errors::{Rule, ValidationError, ValidationResult, Violation};
pub use types::{Constraint, EntityKind, EntitySchema, FieldDef, FieldType, KeyType};
pub use validator::{validate, SchemaValidator, ValidatedRecord};
