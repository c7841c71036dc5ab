use super::{Context, ValidationError};
use crate::database::DatabaseType;
use crate::model::entity::is_built_in_entity;
use crate::model::option::{OptionValues, binary_option_values, is_unary_option};
use crate::model::{JdlApplication, JdlOption};

const PAGINATION: &str = "pagination";

pub(super) fn check(ctx: &Context) -> Result<(), ValidationError> {
    for option in &ctx.object.options {
        check_option(ctx, option)?;
    }
    for app in ctx.object.applications.values() {
        for option in &app.options {
            check_option(ctx, option)?;
        }
    }

    if ctx.settings.database_type == DatabaseType::Cassandra
        && ctx.object.options.named(PAGINATION).next().is_some()
    {
        return Err(ValidationError::Pagination(
            "Pagination isn't allowed when the app uses Cassandra.".to_string(),
        ));
    }
    for app in ctx.object.applications.values() {
        check_cassandra_pagination(ctx, app)?;
    }
    Ok(())
}

fn check_option(ctx: &Context, option: &JdlOption) -> Result<(), ValidationError> {
    match &option.value {
        None => {
            if !is_unary_option(&option.name) {
                return Err(ValidationError::Option(format!(
                    "The unary option '{}' is not valid.",
                    option.name
                )));
            }
        }
        Some(value) => match binary_option_values(&option.name) {
            None => {
                return Err(ValidationError::Option(format!(
                    "The binary option '{}' is not valid.",
                    option.name
                )));
            }
            Some(OptionValues::Fixed(legal)) if !legal.contains(&value.as_str()) => {
                return Err(ValidationError::Option(format!(
                    "The value '{}' is not valid for the binary option '{}'.",
                    value, option.name
                )));
            }
            Some(OptionValues::Custom) if value.trim().is_empty() => {
                return Err(ValidationError::Option(format!(
                    "The binary option '{}' needs a value.",
                    option.name
                )));
            }
            _ => {}
        },
    }

    if let Some(missing) = option
        .referenced_names()
        .find(|name| !ctx.object.has_entity(name) && !is_built_in_entity(name))
    {
        return Err(ValidationError::Option(format!(
            "The entity '{}' of the option '{}' is not declared.",
            missing, option
        )));
    }
    Ok(())
}

/// An application storing its entities in Cassandra can't paginate any of them.
fn check_cassandra_pagination(ctx: &Context, app: &JdlApplication) -> Result<(), ValidationError> {
    if app.database_type() != Some(DatabaseType::Cassandra) {
        return Ok(());
    }
    let paginations = ctx
        .object
        .options
        .named(PAGINATION)
        .chain(app.options.named(PAGINATION));
    for option in paginations {
        if let Some(entity) = app
            .entity_names
            .iter()
            .find(|entity| option.applies_to(entity))
        {
            return Err(ValidationError::Pagination(format!(
                "Pagination isn't allowed when the app uses Cassandra, for entity: '{}' and application: '{}'.",
                entity,
                app.display_name()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::{ValidationSettings, check_for_errors};
    use super::*;
    use crate::logger::RecordingLogger;
    use crate::model::{JdlEntity, JdlObject};
    use serde_json::{Map, json};

    fn object(options: Vec<JdlOption>) -> JdlObject {
        let mut object = JdlObject::new();
        object.add_entity(JdlEntity::new("A"));
        object.add_entity(JdlEntity::new("B"));
        for option in options {
            object.add_option(option);
        }
        object
    }

    fn check(object: &JdlObject, database: DatabaseType) -> Result<(), ValidationError> {
        let settings = ValidationSettings {
            database_type: database,
            ..Default::default()
        };
        check_for_errors(object, settings, &RecordingLogger::new()).map(|_| ())
    }

    #[test]
    fn test_valid_options() {
        let object = object(vec![
            JdlOption::binary("dto", "mapstruct", ["*"]).excluding(["B"]),
            JdlOption::binary("pagination", "infinite-scroll", ["A"]),
            JdlOption::binary("microservice", "store", ["A", "B"]),
            JdlOption::unary("filter", ["A"]),
        ]);
        assert_eq!(check(&object, DatabaseType::Sql), Ok(()));
    }

    #[test]
    fn test_bad_unary_option() {
        let object = object(vec![JdlOption::unary("skipEverything", ["A"])]);
        let err = check(&object, DatabaseType::Sql).unwrap_err();
        assert_eq!(err.to_string(), "The unary option 'skipEverything' is not valid.");
    }

    #[test]
    fn test_bad_binary_value() {
        let object = object(vec![JdlOption::binary("service", "serviceFoo", ["A"])]);
        let err = check(&object, DatabaseType::Sql).unwrap_err();
        assert_eq!(
            err.to_string(),
            "The value 'serviceFoo' is not valid for the binary option 'service'."
        );
    }

    #[test]
    fn test_undeclared_entity() {
        let object = object(vec![JdlOption::binary("dto", "mapstruct", ["*"]).excluding(["C"])]);
        let err = check(&object, DatabaseType::Sql).unwrap_err();
        assert!(err.to_string().contains("'C'"));
    }

    #[test]
    fn test_cassandra_pagination() {
        let object = object(vec![JdlOption::binary("pagination", "pagination", ["*"])]);
        let err = check(&object, DatabaseType::Cassandra).unwrap_err();
        assert!(matches!(err, ValidationError::Pagination(_)));
        assert!(err
            .to_string()
            .contains("Pagination isn't allowed when the app uses Cassandra"));
    }

    #[test]
    fn test_cassandra_pagination_per_application() {
        let mut object = object(vec![JdlOption::binary("pagination", "pager", ["B"])]);
        let mut config = Map::new();
        config.insert("baseName".into(), json!("events"));
        config.insert("databaseType".into(), json!("cassandra"));
        object.add_application(JdlApplication::new(config).with_entities(["A", "B"]));
        let err = check(&object, DatabaseType::Sql).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Pagination isn't allowed when the app uses Cassandra, for entity: 'B' and application: 'events'."
        );
    }

    #[test]
    fn test_cassandra_pagination_out_of_scope() {
        let mut object = object(vec![JdlOption::binary("pagination", "pager", ["*"]).excluding(["A"])]);
        let mut config = Map::new();
        config.insert("baseName".into(), json!("events"));
        config.insert("databaseType".into(), json!("cassandra"));
        object.add_application(JdlApplication::new(config).with_entities(["A"]));
        assert_eq!(check(&object, DatabaseType::Sql), Ok(()));
    }
}
