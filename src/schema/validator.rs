//! Schema validator for decoded records
//!
//! Validation semantics:
//! - All required fields are present
//! - No undeclared fields exist
//! - Present fields are non-null and of the declared type
//! - Constraints run only on type-correct values
//! - Nested entities, list elements and map entries are checked recursively
//!
//! The validator collects every violation in one pass. It does not mutate
//! the record, does no I/O and gives the same answer every time.

use serde_json::{Map, Value};

use super::errors::{Violation, ValidationError, ValidationResult};
use super::types::{Constraint, EntityKind, EntitySchema, FieldType, KeyType};
use crate::decode::DecodedRecord;

/// A record that passed its entity schema.
///
/// Only the validator constructs these, so holding one is proof the record
/// was checked against `kind`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRecord {
    kind: EntityKind,
    record: DecodedRecord,
}

impl ValidatedRecord {
    /// Entity kind the record was validated as
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// The accepted record
    pub fn record(&self) -> &DecodedRecord {
        &self.record
    }

    /// JSON body for submission
    pub fn to_json(&self) -> Value {
        Value::Object(self.record.fields().clone())
    }
}

/// Validates records against one entity schema, chosen by the caller.
#[derive(Debug, Clone, Copy)]
pub struct SchemaValidator {
    kind: EntityKind,
}

impl SchemaValidator {
    /// Creates a validator for `kind`.
    pub fn new(kind: EntityKind) -> Self {
        Self { kind }
    }

    /// Entity kind this validator checks
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Validates a decoded record.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` holding every violation when the record
    /// does not fit the schema.
    pub fn validate(&self, record: &DecodedRecord) -> ValidationResult<ValidatedRecord> {
        let violations = self.violations(record.fields());
        if violations.is_empty() {
            Ok(ValidatedRecord {
                kind: self.kind,
                record: record.clone(),
            })
        } else {
            Err(ValidationError::new(self.kind, violations))
        }
    }

    /// Validates an arbitrary JSON value; non-objects are a root type error.
    pub fn validate_value(&self, value: &Value) -> ValidationResult<ValidatedRecord> {
        match value {
            Value::Object(map) => self.validate(&DecodedRecord::from_map(map.clone())),
            other => Err(ValidationError::new(
                self.kind,
                vec![Violation::type_mismatch("$root", "object", other)],
            )),
        }
    }

    /// Returns every violation of `fields` against the schema, in schema
    /// order (unknown fields first).
    pub fn violations(&self, fields: &Map<String, Value>) -> Vec<Violation> {
        let mut walk = Walk::default();
        walk.object(self.kind.schema(), fields, "");
        walk.violations
    }
}

/// Validates `record` as `kind`.
pub fn validate(kind: EntityKind, record: &DecodedRecord) -> ValidationResult<ValidatedRecord> {
    SchemaValidator::new(kind).validate(record)
}

#[derive(Default)]
struct Walk {
    violations: Vec<Violation>,
}

impl Walk {
    fn object(&mut self, schema: &EntitySchema, obj: &Map<String, Value>, prefix: &str) {
        for (key, value) in obj {
            if schema.field(key).is_none() {
                self.violations.push(Violation::unknown(make_path(prefix, key), value));
            }
        }

        for field in &schema.fields {
            let path = make_path(prefix, field.name);
            match obj.get(field.name) {
                None if field.required => self.violations.push(Violation::required(path)),
                None => {}
                Some(Value::Null) => self.violations.push(Violation::null(path)),
                Some(value) => self.value(&field.field_type, &field.constraints, value, &path),
            }
        }
    }

    fn value(&mut self, ty: &FieldType, constraints: &[Constraint], value: &Value, path: &str) {
        let type_ok = match ty {
            FieldType::String => value.is_string(),
            FieldType::Int => value.is_i64() || value.is_u64(),
            FieldType::List { element } => match value.as_array() {
                Some(items) => {
                    for (i, item) in items.iter().enumerate() {
                        let item_path = format!("{}[{}]", path, i);
                        self.element(element, item, &item_path);
                    }
                    true
                }
                None => false,
            },
            FieldType::Nested { entity } => match value.as_object() {
                Some(obj) => {
                    self.object(entity.schema(), obj, path);
                    true
                }
                None => false,
            },
            FieldType::Map {
                key,
                key_constraints,
                value: value_type,
            } => match value.as_object() {
                Some(obj) => {
                    for (k, v) in obj {
                        let entry_path = make_path(path, k);
                        self.key(*key, key_constraints, k, &entry_path);
                        self.element(value_type, v, &entry_path);
                    }
                    true
                }
                None => false,
            },
        };

        if !type_ok {
            self.violations
                .push(Violation::type_mismatch(path, ty.type_name(), value));
            return;
        }

        for constraint in constraints {
            if let Some(rule) = constraint.check(value) {
                self.violations
                    .push(Violation::new(path, rule, Some(value.clone())));
            }
        }
    }

    /// List items and map values: null is its own violation.
    fn element(&mut self, ty: &FieldType, value: &Value, path: &str) {
        if value.is_null() {
            self.violations.push(Violation::null(path));
        } else {
            self.value(ty, &[], value, path);
        }
    }

    fn key(&mut self, key_type: KeyType, constraints: &[Constraint], key: &str, path: &str) {
        let typed = match key_type {
            KeyType::String => Value::String(key.to_string()),
            KeyType::Int => match key.parse::<i64>() {
                Ok(n) => Value::from(n),
                Err(_) => {
                    self.violations.push(Violation::type_mismatch(
                        path,
                        "int key",
                        &Value::String(key.to_string()),
                    ));
                    return;
                }
            },
        };
        for constraint in constraints {
            if let Some(rule) = constraint.check(&typed) {
                self.violations.push(Violation::new(path, rule, Some(typed.clone())));
            }
        }
    }
}

/// Creates a field path from prefix and field name.
fn make_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::errors::Rule;
    use serde_json::json;

    fn record(value: Value) -> DecodedRecord {
        match value {
            Value::Object(map) => DecodedRecord::from_map(map),
            _ => panic!("test record must be an object"),
        }
    }

    fn role() -> Value {
        json!({"id": "r1", "name": "medic"})
    }

    #[test]
    fn test_valid_role_passes() {
        let accepted = validate(EntityKind::SoldierRole, &record(role())).unwrap();
        assert_eq!(accepted.kind(), EntityKind::SoldierRole);
        assert_eq!(accepted.to_json(), role());
    }

    #[test]
    fn test_optional_field_may_be_absent() {
        let mut value = role();
        value["description"] = json!("first aid");
        assert!(validate(EntityKind::SoldierRole, &record(value)).is_ok());
    }

    #[test]
    fn test_unknown_field_fails() {
        let mut value = role();
        value["rank"] = json!("sergeant");
        let err = validate(EntityKind::SoldierRole, &record(value)).unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert!(err.has("rank", "UNKNOWN"));
    }

    #[test]
    fn test_null_fails() {
        let err = validate(EntityKind::SoldierRole, &record(json!({"id": "r1", "name": null})))
            .unwrap_err();
        assert!(err.has("name", "NULL"));
    }

    #[test]
    fn test_type_mismatch_skips_constraints() {
        let err = validate(
            EntityKind::TimeOfDay,
            &record(json!({"hour": "25", "minute": 1.5})),
        )
        .unwrap_err();
        assert_eq!(err.violations().len(), 2);
        assert_eq!(
            err.at("hour").next().unwrap().rule,
            Rule::Type {
                expected: "int",
                actual: "string"
            }
        );
        assert_eq!(
            err.at("minute").next().unwrap().rule,
            Rule::Type {
                expected: "int",
                actual: "float"
            }
        );
    }

    #[test]
    fn test_range_violation_carries_observed_value() {
        let err = validate(EntityKind::TimeOfDay, &record(json!({"hour": 24, "minute": 60})))
            .unwrap_err();
        let hour = err.at("hour").next().unwrap();
        assert_eq!(hour.code(), "RANGE");
        assert_eq!(hour.observed, Some(json!(24)));
        assert!(err.has("minute", "RANGE"));
    }

    #[test]
    fn test_nested_paths() {
        let err = validate(
            EntityKind::ShiftTime,
            &record(json!({"start_time": {"hour": 8, "minute": 0}, "end_time": {"hour": 30}})),
        )
        .unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert!(err.has("end_time.hour", "RANGE"));
    }

    #[test]
    fn test_nested_wrong_type() {
        let err = validate(
            EntityKind::ShiftTime,
            &record(json!({"start_time": "08:00", "end_time": {}})),
        )
        .unwrap_err();
        assert!(err.has("start_time", "TYPE"));
    }

    #[test]
    fn test_list_element_paths() {
        let err = validate(
            EntityKind::Shift,
            &record(json!({
                "start_time_hour": 8, "start_time_minute": 0,
                "end_time_hour": 16, "end_time_minute": 0,
                "id": "sh1", "name": "Gate", "type": 0,
                "commander_soldier_id": "s1",
                "additional_soldiers_ids": ["s2", 3, null]
            })),
        )
        .unwrap_err();
        assert_eq!(err.violations().len(), 2);
        assert!(err.has("additional_soldiers_ids[1]", "TYPE"));
        assert!(err.has("additional_soldiers_ids[2]", "NULL"));
    }

    #[test]
    fn test_map_values_are_typed() {
        let err = validate(
            EntityKind::PersonnelRequirement,
            &record(json!({"soldier_role_to_count": {"r1": 2, "r2": "three"}})),
        )
        .unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert!(err.has("soldier_role_to_count.r2", "TYPE"));
    }

    #[test]
    fn test_map_role_keys_are_not_checked_for_existence() {
        let accepted = validate(
            EntityKind::PersonnelRequirement,
            &record(json!({"soldier_role_to_count": {"no-such-role": 1}})),
        );
        assert!(accepted.is_ok());
    }

    #[test]
    fn test_validate_value_rejects_non_objects() {
        let err = SchemaValidator::new(EntityKind::Soldier)
            .validate_value(&json!([1, 2]))
            .unwrap_err();
        assert!(err.has("$root", "TYPE"));
    }

    #[test]
    fn test_validation_is_idempotent() {
        let value = record(json!({"hour": 99}));
        let validator = SchemaValidator::new(EntityKind::TimeOfDay);
        let first = validator.validate(&value).unwrap_err();
        let second = validator.validate(&value).unwrap_err();
        assert_eq!(first, second);
    }
}
