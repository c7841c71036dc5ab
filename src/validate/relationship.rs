use indexmap::IndexSet;

use super::{Context, EntityDatabase, ValidationError};
use crate::model::entity::is_built_in_entity;
use crate::model::{JdlRelationship, RelationshipKind};

/// NoSQL databases can't store relationships; checked before anything else.
pub(super) fn check_nosql(ctx: &Context) -> Result<(), ValidationError> {
    if ctx.object.relationship_count() == 0 {
        return Ok(());
    }

    if ctx.standalone() {
        if !ctx.settings.database_type.is_sql() {
            return Err(ValidationError::NoSqlRelationship(
                "NoSQL entities don't have relationships.".to_string(),
            ));
        }
        return Ok(());
    }

    for relationship in ctx.object.relationships() {
        for end in [&relationship.from.entity, &relationship.to.entity] {
            let owner = ctx
                .object
                .applications_of(end)
                .into_iter()
                .find(|app| !app.database_type().unwrap_or_default().is_sql());
            if let Some(app) = owner {
                return Err(ValidationError::NoSqlRelationship(format!(
                    "NoSQL entities don't have relationships, the entity '{}' of the {} belongs to the {} application '{}'.",
                    end,
                    relationship,
                    app.database_type().unwrap_or_default(),
                    app.display_name()
                )));
            }
            // entities no application declares use the global database
            if let EntityDatabase::Single(db) = ctx.database_of(end) {
                if !db.is_sql() {
                    return Err(ValidationError::NoSqlRelationship(format!(
                        "NoSQL entities don't have relationships, the entity '{}' of the {} uses {}.",
                        end, relationship, db
                    )));
                }
            }
        }
    }
    Ok(())
}

pub(super) fn check(ctx: &Context) -> Result<(), ValidationError> {
    for relationship in ctx.object.relationships() {
        check_relationship(ctx, relationship)?;
    }
    Ok(())
}

fn check_relationship(ctx: &Context, relationship: &JdlRelationship) -> Result<(), ValidationError> {
    let from = relationship.from.entity.as_str();
    let to = relationship.to.entity.as_str();

    if from.is_empty() || to.is_empty() {
        return Err(ValidationError::Relationship(format!(
            "The {} must have a source and a destination entity.",
            relationship
        )));
    }
    if relationship.jpa_derived_identifier && relationship.kind != RelationshipKind::OneToOne {
        return Err(ValidationError::Relationship(format!(
            "Only a OneToOne relationship can use jpaDerivedIdentifier, found in the {}.",
            relationship
        )));
    }

    let user_managed = !ctx.skips_user_management(from);
    let built_in_target = is_built_in_entity(to) && user_managed;

    for end in [from, to] {
        let declared = ctx.object.has_entity(end) || (end == to && built_in_target);
        if !declared {
            return Err(ValidationError::Relationship(format!(
                "In the relationship between {} and {}, {} is not declared.",
                from, to, end
            )));
        }
    }

    if built_in_target {
        if relationship.kind == RelationshipKind::OneToMany {
            return Err(ValidationError::Relationship(format!(
                "The {} is not allowed: the {} entity can't be the destination of a OneToMany relationship.",
                relationship, to
            )));
        }
        if relationship.to.injected_field.is_some() {
            return Err(ValidationError::Relationship(format!(
                "The {} can't inject a field in the {} entity, relationships toward it must be unidirectional.",
                relationship, to
            )));
        }
        return Ok(());
    }

    if !ctx.standalone() {
        let from_apps = owners(ctx, from);
        let to_apps = owners(ctx, to);
        if from_apps.symmetric_difference(&to_apps).next().is_some() {
            return Err(ValidationError::Relationship(format!(
                "Entities for the {} do not belong to the same application.",
                relationship
            )));
        }
    }
    Ok(())
}

/// Keys of the applications declaring `entity`.
fn owners<'a>(ctx: &Context<'a>, entity: &str) -> IndexSet<&'a str> {
    ctx.object
        .applications
        .iter()
        .filter(|(_, app)| app.has_entity(entity))
        .map(|(key, _)| key.as_str())
        .collect()
}
