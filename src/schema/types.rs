//! Entity schema descriptors
//!
//! Schemas are plain data: a table of fields, each with a type, a
//! required flag and a list of constraints. The validator walks this table;
//! nothing here knows how to validate by itself except the leaf
//! constraint checks.
//!
//! Supported field types:
//! - string: UTF-8 text
//! - int: 64-bit signed integer
//! - list: homogeneous list with an element type
//! - nested: object validated against another entity schema
//! - map: object whose keys and values are each typed

use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::entities;
use super::errors::Rule;

/// Kinds of records the loader knows how to validate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    SoldierRole,
    Soldier,
    Shift,
    TimeOfDay,
    ShiftTime,
    PersonnelRequirement,
    ShiftTemplate,
    DaySchedule,
}

impl EntityKind {
    /// Every entity kind
    pub const ALL: [EntityKind; 8] = [
        EntityKind::SoldierRole,
        EntityKind::Soldier,
        EntityKind::Shift,
        EntityKind::TimeOfDay,
        EntityKind::ShiftTime,
        EntityKind::PersonnelRequirement,
        EntityKind::ShiftTemplate,
        EntityKind::DaySchedule,
    ];

    /// snake_case identifier used in config files and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::SoldierRole => "soldier_role",
            EntityKind::Soldier => "soldier",
            EntityKind::Shift => "shift",
            EntityKind::TimeOfDay => "time_of_day",
            EntityKind::ShiftTime => "shift_time",
            EntityKind::PersonnelRequirement => "personnel_requirement",
            EntityKind::ShiftTemplate => "shift_template",
            EntityKind::DaySchedule => "day_schedule",
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::SoldierRole => "SoldierRole",
            EntityKind::Soldier => "Soldier",
            EntityKind::Shift => "Shift",
            EntityKind::TimeOfDay => "TimeOfDay",
            EntityKind::ShiftTime => "ShiftTime",
            EntityKind::PersonnelRequirement => "PersonnelRequirement",
            EntityKind::ShiftTemplate => "ShiftTemplate",
            EntityKind::DaySchedule => "DaySchedule",
        }
    }

    /// The static schema for this kind
    pub fn schema(&self) -> &'static EntitySchema {
        entities::schema_for(*self)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    /// Accepts the snake_case identifier, its kebab-case spelling or the
    /// display name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.replace('-', "_");
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized || kind.name() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = EntityKind::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown entity kind '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}

/// Type of a map key. JSON object keys are always text; `Int` keys must
/// read as base-10 integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    String,
    Int,
}

/// Declared type of a field, list element or map value
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Int,
    /// Homogeneous list
    List { element: Box<FieldType> },
    /// Object validated against another entity's schema
    Nested { entity: EntityKind },
    /// Object with typed keys and values
    Map {
        key: KeyType,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        key_constraints: Vec<Constraint>,
        value: Box<FieldType>,
    },
}

impl FieldType {
    /// List of `element`
    pub fn list(element: FieldType) -> Self {
        FieldType::List {
            element: Box::new(element),
        }
    }

    /// Object of another entity kind
    pub fn nested(entity: EntityKind) -> Self {
        FieldType::Nested { entity }
    }

    /// Map from `key` to `value`
    pub fn map(key: KeyType, value: FieldType) -> Self {
        FieldType::Map {
            key,
            key_constraints: Vec::new(),
            value: Box::new(value),
        }
    }

    /// Adds a constraint on map keys. No effect on other types.
    pub fn with_key_constraint(mut self, constraint: Constraint) -> Self {
        if let FieldType::Map {
            key_constraints, ..
        } = &mut self
        {
            key_constraints.push(constraint);
        }
        self
    }

    /// Returns the type name for violation messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Int => "int",
            FieldType::List { .. } => "list",
            FieldType::Nested { .. } | FieldType::Map { .. } => "object",
        }
    }
}

/// A constraint on a present, type-correct value
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Constraint {
    /// String length in characters, at most `max`
    MaxLength { max: usize },
    /// String must match the regex (anchors are part of the pattern)
    Pattern {
        #[serde(serialize_with = "serialize_regex")]
        regex: Regex,
    },
    /// Integer within `[min, max]`; an absent bound is open
    Range { min: Option<i64>, max: Option<i64> },
    /// List holds at least `min` items
    MinItems { min: usize },
}

impl Constraint {
    /// Maximum string length
    pub fn max_length(max: usize) -> Self {
        Constraint::MaxLength { max }
    }

    /// Regex match on strings.
    ///
    /// # Errors
    ///
    /// Returns the regex compile error for an invalid pattern.
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Constraint::Pattern {
            regex: Regex::new(pattern)?,
        })
    }

    /// Closed integer range
    pub fn range(min: i64, max: i64) -> Self {
        Constraint::Range {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Integer lower bound only
    pub fn at_least(min: i64) -> Self {
        Constraint::Range {
            min: Some(min),
            max: None,
        }
    }

    /// Minimum list length
    pub fn min_items(min: usize) -> Self {
        Constraint::MinItems { min }
    }

    /// Checks a value that already passed the type check.
    ///
    /// Returns the violated rule, or `None` when the value satisfies the
    /// constraint or the constraint does not apply to its JSON type.
    pub fn check(&self, value: &Value) -> Option<Rule> {
        match (self, value) {
            (Constraint::MaxLength { max }, Value::String(s)) => {
                let actual = s.chars().count();
                (actual > *max).then_some(Rule::MaxLength { max: *max, actual })
            }
            (Constraint::Pattern { regex }, Value::String(s)) => {
                (!regex.is_match(s)).then(|| Rule::Pattern {
                    pattern: regex.as_str().to_string(),
                })
            }
            (Constraint::Range { min, max }, Value::Number(n)) => {
                let in_range = match (n.as_i64(), n.as_u64()) {
                    (Some(v), _) => min.map_or(true, |lo| v >= lo) && max.map_or(true, |hi| v <= hi),
                    // only u64 values above i64::MAX land here
                    (None, Some(_)) => max.is_none(),
                    (None, None) => false,
                };
                (!in_range).then_some(Rule::Range {
                    min: *min,
                    max: *max,
                })
            }
            (Constraint::MinItems { min }, Value::Array(items)) => {
                (items.len() < *min).then_some(Rule::MinItems {
                    min: *min,
                    actual: items.len(),
                })
            }
            _ => None,
        }
    }
}

fn serialize_regex<S: Serializer>(regex: &Regex, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(regex.as_str())
}

/// Field definition within an entity schema
#[derive(Debug, Clone, Serialize)]
pub struct FieldDef {
    /// Field name as it appears in the record
    pub name: &'static str,
    /// Declared type
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether the field must be present
    pub required: bool,
    /// Checks applied once the type matches
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
}

impl FieldDef {
    fn new(name: &'static str, field_type: FieldType, required: bool) -> Self {
        Self {
            name,
            field_type,
            required,
            constraints: Vec::new(),
        }
    }

    /// Create a required string field
    pub fn required_string(name: &'static str) -> Self {
        Self::new(name, FieldType::String, true)
    }

    /// Create an optional string field
    pub fn optional_string(name: &'static str) -> Self {
        Self::new(name, FieldType::String, false)
    }

    /// Create a required int field
    pub fn required_int(name: &'static str) -> Self {
        Self::new(name, FieldType::Int, true)
    }

    /// Create an optional int field
    pub fn optional_int(name: &'static str) -> Self {
        Self::new(name, FieldType::Int, false)
    }

    /// Create an optional list field
    pub fn optional_list(name: &'static str, element: FieldType) -> Self {
        Self::new(name, FieldType::list(element), false)
    }

    /// Create a required nested-entity field
    pub fn required_nested(name: &'static str, entity: EntityKind) -> Self {
        Self::new(name, FieldType::nested(entity), true)
    }

    /// Create a field of any type
    pub fn of(name: &'static str, field_type: FieldType, required: bool) -> Self {
        Self::new(name, field_type, required)
    }

    /// Adds a constraint
    pub fn with(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }
}

/// Declarative shape of one entity
#[derive(Debug, Clone, Serialize)]
pub struct EntitySchema {
    /// Entity this schema describes
    pub kind: EntityKind,
    /// Field table, in declaration order
    pub fields: Vec<FieldDef>,
}

impl EntitySchema {
    /// Create a new schema
    pub fn new(kind: EntityKind, fields: Vec<FieldDef>) -> Self {
        Self { kind, fields }
    }

    /// Looks up a field definition by name
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of the required fields
    pub fn required_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().filter(|f| f.required).map(|f| f.name)
    }
}
