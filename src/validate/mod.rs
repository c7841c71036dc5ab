//! Business rules of a [`JdlObject`].
//!
//! Checks run category by category: applications, entities (with their
//! fields and validations), relationships, enums, options and deployments.
//! A broken rule is returned as a [`ValidationError`] and stops the run.
//! Findings that don't prevent generation, such as reserved keywords, are
//! collected as [`Warnings`] and sent to the logger as they are found.

mod application;
mod deployment;
mod entity;
mod enums;
pub mod keywords;
mod option;
mod relationship;

use indexmap::IndexSet;
use tracing::debug;

use crate::config::ImportConfig;
use crate::database::DatabaseType;
use crate::logger::Logger;
use crate::model::{ApplicationType, JdlObject};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0}")]
    Application(String),
    #[error("{0}")]
    Entity(String),
    #[error("{0}")]
    Field(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Relationship(String),
    #[error("{0}")]
    NoSqlRelationship(String),
    #[error("{0}")]
    Enum(String),
    #[error("{0}")]
    Option(String),
    #[error("{0}")]
    Pagination(String),
    #[error("{0}")]
    Deployment(String),
}

/// Settings the object is checked against when it declares no application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidationSettings {
    pub application_type: ApplicationType,
    pub database_type: DatabaseType,
    pub skip_user_management: bool,
}

impl From<&ImportConfig> for ValidationSettings {
    fn from(config: &ImportConfig) -> Self {
        Self {
            application_type: config.application_type,
            database_type: config.database_type,
            skip_user_management: config.skip_user_management,
        }
    }
}

/// Non-fatal findings, in the order they were made.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Warnings(Vec<String>);

impl Warnings {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether some warning contains `fragment`.
    pub fn mentions(&self, fragment: &str) -> bool {
        self.0.iter().any(|w| w.contains(fragment))
    }
}

/// Database the fields of an entity are checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntityDatabase {
    Single(DatabaseType),
    /// Owning applications disagree.
    Mixed,
}

pub(crate) struct Context<'a> {
    pub object: &'a JdlObject,
    pub settings: ValidationSettings,
    logger: &'a dyn Logger,
    warnings: Vec<String>,
}

impl<'a> Context<'a> {
    fn new(object: &'a JdlObject, settings: ValidationSettings, logger: &'a dyn Logger) -> Self {
        Self {
            object,
            settings,
            logger,
            warnings: Vec::new(),
        }
    }

    pub fn warn(&mut self, message: String) {
        self.logger.warn(&message);
        self.warnings.push(message);
    }

    /// Without applications everything is checked against the global settings.
    pub fn standalone(&self) -> bool {
        !self.object.has_applications()
    }

    pub fn database_of(&self, entity: &str) -> EntityDatabase {
        let databases: IndexSet<DatabaseType> = self
            .object
            .applications_of(entity)
            .iter()
            .map(|app| app.database_type().unwrap_or_default())
            .collect();
        match databases.len() {
            0 => EntityDatabase::Single(self.settings.database_type),
            1 => EntityDatabase::Single(databases[0]),
            _ => EntityDatabase::Mixed,
        }
    }

    pub fn skips_user_management(&self, entity: &str) -> bool {
        self.object
            .skips_user_management(entity, self.settings.skip_user_management)
    }
}

/// Checks `object`, returning the warnings found along the way.
pub fn check_for_errors(
    object: &JdlObject,
    settings: ValidationSettings,
    logger: &dyn Logger,
) -> Result<Warnings, ValidationError> {
    let mut ctx = Context::new(object, settings, logger);

    relationship::check_nosql(&ctx)?;
    application::check(&ctx)?;
    entity::check(&mut ctx)?;
    relationship::check(&ctx)?;
    enums::check(&ctx)?;
    option::check(&ctx)?;
    deployment::check(&ctx)?;

    debug!(warnings = ctx.warnings.len(), "validation passed");
    Ok(Warnings(ctx.warnings))
}
