//! JSON projections of the object model: one file per entity and one
//! `.yo-rc.json` per application or deployment.

pub mod application;
pub mod changelog;
pub mod entity;
pub mod options;
pub mod relationship;

pub use application::{convert_applications, convert_deployments};
pub use changelog::{CHANGELOG_DATE_FORMAT, ChangelogDates};
pub use entity::{EntityJson, FieldJson, convert_entities, filter_unchanged};
pub use options::EntityOptions;
pub use relationship::RelationshipJson;
