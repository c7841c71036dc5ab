use super::keywords::{
    ENTITY_NAME, FIELD_NAME, is_reserved_field_name, is_reserved_keyword, is_reserved_table_name,
};
use super::{Context, EntityDatabase, ValidationError};
use crate::model::{FieldType, JdlEntity, JdlField, JdlValidation};

pub(super) fn check(ctx: &mut Context) -> Result<(), ValidationError> {
    let object = ctx.object;
    for entity in object.entities.values() {
        check_entity(ctx, entity)?;
    }
    Ok(())
}

fn check_entity(ctx: &mut Context, entity: &JdlEntity) -> Result<(), ValidationError> {
    if !ENTITY_NAME.is_match(&entity.name) {
        return Err(ValidationError::Entity(format!(
            "The entity name '{}' is not valid, it must be alphanumeric and start with an upper case letter.",
            entity.name
        )));
    }
    if is_reserved_keyword(&entity.name) {
        return Err(ValidationError::Entity(format!(
            "The name '{}' is a reserved keyword and can not be used as an entity name.",
            entity.name
        )));
    }
    if entity.table_name.is_empty() {
        return Err(ValidationError::Entity(format!(
            "The entity '{}' has an empty table name.",
            entity.name
        )));
    }

    let database = ctx.database_of(&entity.name);
    if let EntityDatabase::Single(db) = database {
        if is_reserved_table_name(&entity.table_name, db) {
            ctx.warn(format!(
                "The table name '{}' of entity '{}' is a reserved keyword for {}, so it will be prefixed with the value of 'jhiPrefix'.",
                entity.table_name, entity.name, db
            ));
        }
    }

    for field in entity.fields.values() {
        check_field(ctx, entity, field, database)?;
    }
    Ok(())
}

fn check_field(
    ctx: &mut Context,
    entity: &JdlEntity,
    field: &JdlField,
    database: EntityDatabase,
) -> Result<(), ValidationError> {
    if !FIELD_NAME.is_match(&field.name) {
        return Err(ValidationError::Field(format!(
            "The field name '{}' of entity '{}' is not valid.",
            field.name, entity.name
        )));
    }
    if is_reserved_field_name(&field.name) {
        ctx.warn(format!(
            "The name '{}' is a reserved keyword, so it will be prefixed with the value of 'jhiPrefix' in entity '{}'.",
            field.name, entity.name
        ));
    }

    let is_enum = ctx.object.has_enum(&field.type_name);
    let builtin = field.builtin_type();
    if !is_enum {
        match (database, builtin) {
            (EntityDatabase::Mixed, _) => ctx.warn(format!(
                "The entity '{}' belongs to applications with different database types, the type '{}' of its field '{}' can't be checked.",
                entity.name, field.type_name, field.name
            )),
            (EntityDatabase::Single(_), None) => {
                return Err(ValidationError::Field(format!(
                    "The type '{}' is an unknown field type for field '{}' of entity '{}'.",
                    field.type_name, field.name, entity.name
                )));
            }
            (EntityDatabase::Single(db), Some(typ)) if !db.supports(typ) => {
                return Err(ValidationError::Field(format!(
                    "The type '{}' isn't supported by {} for field '{}' of entity '{}'.",
                    typ, db, field.name, entity.name
                )));
            }
            _ => {}
        }
    }

    for validation in &field.validations {
        check_validation(entity, field, validation, builtin, is_enum)?;
    }
    Ok(())
}

fn check_validation(
    entity: &JdlEntity,
    field: &JdlField,
    validation: &JdlValidation,
    builtin: Option<FieldType>,
    is_enum: bool,
) -> Result<(), ValidationError> {
    let kind = validation.kind().ok_or_else(|| {
        ValidationError::Validation(format!(
            "The validation '{}' of field '{}' in entity '{}' doesn't exist.",
            validation.name, field.name, entity.name
        ))
    })?;

    if kind.needs_value() {
        let Some(value) = validation.value.as_deref().filter(|v| !v.is_empty()) else {
            return Err(ValidationError::Validation(format!(
                "The validation '{}' of field '{}' in entity '{}' requires a value.",
                kind.as_str(),
                field.name,
                entity.name
            )));
        };
        if kind.needs_numeric_value() && value.parse::<f64>().is_err() {
            return Err(ValidationError::Validation(format!(
                "The value '{}' of the validation '{}' of field '{}' in entity '{}' is not a number.",
                value,
                kind.as_str(),
                field.name,
                entity.name
            )));
        }
    }

    let supported = match builtin {
        Some(typ) => typ.supports(kind),
        // enums, and types a mixed-database entity couldn't check
        None => !is_enum || !kind.needs_value(),
    };
    if !supported {
        return Err(ValidationError::Validation(format!(
            "The validation '{}' isn't supported for the type '{}'.",
            kind.as_str(),
            field.type_name
        )));
    }
    Ok(())
}
