//! Static entity schemas
//!
//! One schema per `EntityKind`, built on first use and shared for the life
//! of the process. Nested fields refer to other entities by kind, so the
//! table has no ownership cycles.
//!
//! Cross-entity references (role ids, commander/soldier ids, template ids)
//! are plain strings here. Whether they point at existing records is for the
//! API to decide.

use std::sync::OnceLock;

use super::types::{Constraint, EntityKind, EntitySchema, FieldDef, FieldType, KeyType};

/// Maximum length of the optional SoldierRole and Shift descriptions
pub const DESCRIPTION_MAX_LEN: usize = 255;

/// Personal numbers are exactly seven ASCII digits
pub const PERSONAL_NUMBER_PATTERN: &str = r"^[0-9]{7}$";

/// Returns the schema for `kind`.
pub fn schema_for(kind: EntityKind) -> &'static EntitySchema {
    static SOLDIER_ROLE: OnceLock<EntitySchema> = OnceLock::new();
    static SOLDIER: OnceLock<EntitySchema> = OnceLock::new();
    static SHIFT: OnceLock<EntitySchema> = OnceLock::new();
    static TIME_OF_DAY: OnceLock<EntitySchema> = OnceLock::new();
    static SHIFT_TIME: OnceLock<EntitySchema> = OnceLock::new();
    static PERSONNEL_REQUIREMENT: OnceLock<EntitySchema> = OnceLock::new();
    static SHIFT_TEMPLATE: OnceLock<EntitySchema> = OnceLock::new();
    static DAY_SCHEDULE: OnceLock<EntitySchema> = OnceLock::new();

    match kind {
        EntityKind::SoldierRole => SOLDIER_ROLE.get_or_init(soldier_role),
        EntityKind::Soldier => SOLDIER.get_or_init(soldier),
        EntityKind::Shift => SHIFT.get_or_init(shift),
        EntityKind::TimeOfDay => TIME_OF_DAY.get_or_init(time_of_day),
        EntityKind::ShiftTime => SHIFT_TIME.get_or_init(shift_time),
        EntityKind::PersonnelRequirement => PERSONNEL_REQUIREMENT.get_or_init(personnel_requirement),
        EntityKind::ShiftTemplate => SHIFT_TEMPLATE.get_or_init(shift_template),
        EntityKind::DaySchedule => DAY_SCHEDULE.get_or_init(day_schedule),
    }
}

fn description() -> FieldDef {
    FieldDef::optional_string("description")
        .with(Constraint::max_length(DESCRIPTION_MAX_LEN))
}

fn hour(name: &'static str, required: bool) -> FieldDef {
    FieldDef::of(name, FieldType::Int, required).with(Constraint::range(0, 23))
}

fn minute(name: &'static str, required: bool) -> FieldDef {
    FieldDef::of(name, FieldType::Int, required).with(Constraint::range(0, 59))
}

fn soldier_role() -> EntitySchema {
    EntitySchema::new(
        EntityKind::SoldierRole,
        vec![
            FieldDef::required_string("id"),
            FieldDef::required_string("name"),
            description(),
        ],
    )
}

fn soldier() -> EntitySchema {
    let personal_number = Constraint::pattern(PERSONAL_NUMBER_PATTERN)
        .expect("personal number pattern is a valid regex");

    EntitySchema::new(
        EntityKind::Soldier,
        vec![
            FieldDef::required_string("id"),
            FieldDef::required_string("first_name"),
            FieldDef::optional_string("middle_name"),
            FieldDef::required_string("last_name"),
            FieldDef::required_string("personal_number").with(personal_number),
            FieldDef::required_int("position"),
            FieldDef::optional_list("roles", FieldType::nested(EntityKind::SoldierRole))
                .with(Constraint::min_items(1)),
        ],
    )
}

fn shift() -> EntitySchema {
    EntitySchema::new(
        EntityKind::Shift,
        vec![
            hour("start_time_hour", true),
            minute("start_time_minute", true),
            hour("end_time_hour", true),
            minute("end_time_minute", true),
            FieldDef::required_string("id"),
            FieldDef::required_string("name"),
            FieldDef::required_int("type").with(Constraint::at_least(0)),
            FieldDef::required_string("commander_soldier_id"),
            FieldDef::optional_list("additional_soldiers_ids", FieldType::String),
            description(),
            FieldDef::optional_string("shift_template_id"),
        ],
    )
}

fn time_of_day() -> EntitySchema {
    EntitySchema::new(
        EntityKind::TimeOfDay,
        vec![hour("hour", false), minute("minute", false)],
    )
}

fn shift_time() -> EntitySchema {
    EntitySchema::new(
        EntityKind::ShiftTime,
        vec![
            FieldDef::required_nested("start_time", EntityKind::TimeOfDay),
            FieldDef::required_nested("end_time", EntityKind::TimeOfDay),
        ],
    )
}

fn personnel_requirement() -> EntitySchema {
    EntitySchema::new(
        EntityKind::PersonnelRequirement,
        vec![FieldDef::of(
            "soldier_role_to_count",
            FieldType::map(KeyType::String, FieldType::Int),
            false,
        )],
    )
}

fn shift_template() -> EntitySchema {
    let days = FieldType::map(
        KeyType::Int,
        FieldType::list(FieldType::nested(EntityKind::ShiftTime)),
    )
    .with_key_constraint(Constraint::range(0, 6));

    EntitySchema::new(
        EntityKind::ShiftTemplate,
        vec![
            FieldDef::required_string("id"),
            FieldDef::required_string("name"),
            FieldDef::required_string("description"),
            FieldDef::required_nested("personnel_requirement", EntityKind::PersonnelRequirement),
            FieldDef::of("days_of_occurrences", days, true),
        ],
    )
}

fn day_schedule() -> EntitySchema {
    EntitySchema::new(
        EntityKind::DaySchedule,
        vec![
            FieldDef::required_string("date"),
            FieldDef::of("shifts", FieldType::list(FieldType::nested(EntityKind::Shift)), true)
                .with(Constraint::min_items(1)),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_names(kind: EntityKind) -> Vec<&'static str> {
        schema_for(kind).fields.iter().map(|f| f.name).collect()
    }

    #[test]
    fn test_schema_is_shared() {
        let a = schema_for(EntityKind::Soldier) as *const EntitySchema;
        let b = schema_for(EntityKind::Soldier) as *const EntitySchema;
        assert_eq!(a, b);
    }

    #[test]
    fn test_soldier_fields() {
        assert_eq!(
            field_names(EntityKind::Soldier),
            vec!["id", "first_name", "middle_name", "last_name", "personal_number", "position", "roles"]
        );
        let required: Vec<_> = schema_for(EntityKind::Soldier).required_fields().collect();
        assert_eq!(required, vec!["id", "first_name", "last_name", "personal_number", "position"]);
    }

    #[test]
    fn test_time_of_day_fields_are_optional() {
        assert_eq!(schema_for(EntityKind::TimeOfDay).required_fields().count(), 0);
    }

    #[test]
    fn test_shift_template_requires_everything() {
        let schema = schema_for(EntityKind::ShiftTemplate);
        assert!(schema.fields.iter().all(|f| f.required));
        let description = schema.field("description").unwrap();
        assert!(description.constraints.is_empty());
    }

    #[test]
    fn test_optional_descriptions_are_capped() {
        for kind in [EntityKind::SoldierRole, EntityKind::Shift] {
            let description = schema_for(kind).field("description").unwrap();
            assert!(!description.required);
            assert!(matches!(
                description.constraints.as_slice(),
                [Constraint::MaxLength { max: DESCRIPTION_MAX_LEN }]
            ));
        }
    }

    #[test]
    fn test_personal_number_pattern_compiles() {
        assert!(Constraint::pattern(PERSONAL_NUMBER_PATTERN).is_ok());
    }

    #[test]
    fn test_day_schedule_fields() {
        assert_eq!(field_names(EntityKind::DaySchedule), vec!["date", "shifts"]);
        let shifts = schema_for(EntityKind::DaySchedule).field("shifts").unwrap();
        assert!(shifts.required);
        assert!(matches!(shifts.constraints.as_slice(), [Constraint::MinItems { min: 1 }]));
    }

    #[test]
    fn test_every_nested_reference_resolves() {
        fn walk(ty: &FieldType) {
            match ty {
                FieldType::Nested { entity } => {
                    assert!(!schema_for(*entity).fields.is_empty());
                }
                FieldType::List { element } => walk(element),
                FieldType::Map { value, .. } => walk(value),
                FieldType::String | FieldType::Int => {}
            }
        }
        for kind in EntityKind::ALL {
            for field in &schema_for(kind).fields {
                walk(&field.field_type);
            }
        }
    }
}
