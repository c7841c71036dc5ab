use indexmap::IndexSet;

use super::keywords::{ENTITY_NAME, ENUM_VALUE, is_java_keyword};
use super::{Context, ValidationError};
use crate::model::JdlEnum;

pub(super) fn check(ctx: &Context) -> Result<(), ValidationError> {
    for jdl_enum in ctx.object.enums.values() {
        check_enum(jdl_enum)?;
    }
    Ok(())
}

fn check_enum(jdl_enum: &JdlEnum) -> Result<(), ValidationError> {
    if !ENTITY_NAME.is_match(&jdl_enum.name) {
        return Err(ValidationError::Enum(format!(
            "The enum name '{}' is not valid, it must be alphanumeric and start with an upper case letter.",
            jdl_enum.name
        )));
    }
    if is_java_keyword(&jdl_enum.name) {
        return Err(ValidationError::Enum(format!(
            "The name '{}' is a reserved keyword and can not be used as an enum name.",
            jdl_enum.name
        )));
    }
    if jdl_enum.values.is_empty() {
        return Err(ValidationError::Enum(format!(
            "The enum '{}' must have at least one value.",
            jdl_enum.name
        )));
    }

    let mut seen = IndexSet::new();
    for value in &jdl_enum.values {
        if !ENUM_VALUE.is_match(&value.name) {
            return Err(ValidationError::Enum(format!(
                "The value '{}' of enum '{}' is not valid, it must be upper case.",
                value.name, jdl_enum.name
            )));
        }
        if !seen.insert(value.name.as_str()) {
            return Err(ValidationError::Enum(format!(
                "The value '{}' is declared twice in enum '{}'.",
                value.name, jdl_enum.name
            )));
        }
    }
    Ok(())
}
