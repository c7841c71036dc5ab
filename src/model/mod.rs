//! In-memory JDL object model.
//!
//! Everything is keyed by name: relationships, options and applications
//! refer to entities through their names, never through references, so the
//! model stays trivially comparable with the JSON found on disk.

pub mod application;
pub mod deployment;
pub mod entity;
pub mod enums;
pub mod field;
pub mod option;
pub mod relationship;

use indexmap::IndexMap;

pub use application::{ApplicationType, JdlApplication};
pub use deployment::JdlDeployment;
pub use entity::JdlEntity;
pub use enums::JdlEnum;
pub use field::{FieldType, JdlField, JdlValidation, ValidationKind};
pub use option::{JdlOption, JdlOptions};
pub use relationship::{JdlRelationship, RelationshipEnd, RelationshipKind};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct JdlObject {
    pub applications: IndexMap<String, JdlApplication>,
    /// Keyed by deployment type.
    pub deployments: IndexMap<String, JdlDeployment>,
    pub entities: IndexMap<String, JdlEntity>,
    pub enums: IndexMap<String, JdlEnum>,
    /// Keyed by [`JdlRelationship::id`].
    pub relationships: IndexMap<String, JdlRelationship>,
    pub options: JdlOptions,
}

impl JdlObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applications are keyed by base name; an unnamed one gets a positional key.
    pub fn add_application(&mut self, application: JdlApplication) {
        let key = match application.base_name() {
            Some(name) => name.to_string(),
            None => format!("#{}", self.applications.len()),
        };
        self.applications.insert(key, application);
    }

    pub fn add_deployment(&mut self, deployment: JdlDeployment) {
        let key = deployment.deployment_type().unwrap_or_default().to_string();
        self.deployments.insert(key, deployment);
    }

    pub fn add_entity(&mut self, entity: JdlEntity) {
        self.entities.insert(entity.name.clone(), entity);
    }

    pub fn add_enum(&mut self, jdl_enum: JdlEnum) {
        self.enums.insert(jdl_enum.name.clone(), jdl_enum);
    }

    /// Identical relationships are only kept once.
    pub fn add_relationship(&mut self, relationship: JdlRelationship) {
        self.relationships.insert(relationship.id(), relationship);
    }

    pub fn add_option(&mut self, option: JdlOption) {
        self.options.add(option);
    }

    pub fn entity(&self, name: &str) -> Option<&JdlEntity> {
        self.entities.get(name)
    }

    pub fn has_entity(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    pub fn has_enum(&self, name: &str) -> bool {
        self.enums.contains_key(name)
    }

    pub fn entity_names(&self) -> Vec<&str> {
        self.entities.keys().map(String::as_str).collect()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    pub fn relationships(&self) -> impl Iterator<Item = &JdlRelationship> {
        self.relationships.values()
    }

    pub fn has_applications(&self) -> bool {
        !self.applications.is_empty()
    }

    /// Applications whose entity list includes `entity`.
    pub fn applications_of(&self, entity: &str) -> Vec<&JdlApplication> {
        self.applications
            .values()
            .filter(|app| app.has_entity(entity))
            .collect()
    }

    /// Whether `entity` is generated without user management: every
    /// application owning it must skip it, `default` applies when none does.
    pub fn skips_user_management(&self, entity: &str, default: bool) -> bool {
        let apps = self.applications_of(entity);
        if apps.is_empty() {
            default
        } else {
            apps.iter().all(|app| app.skip_user_management())
        }
    }
}
