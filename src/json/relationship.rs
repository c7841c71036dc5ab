//! Relationship entries of the entity JSON files.
//!
//! Each relationship yields an entry on its source entity and, unless it is
//! unidirectional, a mirrored entry on its destination.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::ImportConfig;
use crate::model::entity::lower_first;
use crate::model::{JdlObject, JdlRelationship, RelationshipEnd, RelationshipKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipJson {
    pub relationship_type: String,
    pub relationship_name: String,
    pub other_entity_name: String,
    pub other_entity_field: String,
    pub other_entity_relationship_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_validate_rules: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub javadoc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_side: Option<bool>,
    #[serde(
        rename = "useJPADerivedIdentifier",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub use_jpa_derived_identifier: Option<bool>,
}

/// `one-to-many` and friends.
pub fn relationship_type(kind: RelationshipKind) -> &'static str {
    match kind {
        RelationshipKind::OneToOne => "one-to-one",
        RelationshipKind::OneToMany => "one-to-many",
        RelationshipKind::ManyToOne => "many-to-one",
        RelationshipKind::ManyToMany => "many-to-many",
    }
}

fn reversed(kind: RelationshipKind) -> RelationshipKind {
    match kind {
        RelationshipKind::OneToMany => RelationshipKind::ManyToOne,
        RelationshipKind::ManyToOne => RelationshipKind::OneToMany,
        other => other,
    }
}

fn has_owner(kind: RelationshipKind) -> bool {
    matches!(
        kind,
        RelationshipKind::OneToOne | RelationshipKind::ManyToMany
    )
}

/// Entry seen from `this` end, pointing at `other`.
fn entry(
    kind: RelationshipKind,
    this: &RelationshipEnd,
    other: &RelationshipEnd,
    owner: bool,
) -> RelationshipJson {
    RelationshipJson {
        relationship_type: relationship_type(kind).to_string(),
        relationship_name: this
            .injected_field
            .clone()
            .unwrap_or_else(|| lower_first(&other.entity)),
        other_entity_name: lower_first(&other.entity),
        other_entity_field: this
            .display_field
            .clone()
            .unwrap_or_else(|| "id".to_string()),
        other_entity_relationship_name: other
            .injected_field
            .clone()
            .unwrap_or_else(|| lower_first(&this.entity)),
        relationship_validate_rules: this.required.then(|| "required".to_string()),
        javadoc: this.comment.clone(),
        owner_side: has_owner(kind).then_some(owner),
        use_jpa_derived_identifier: None,
    }
}

fn needs_mirror(relationship: &JdlRelationship, config: &ImportConfig) -> bool {
    relationship.to.injected_field.is_some()
        || relationship.kind == RelationshipKind::OneToMany
        || !config.unidirectional_relationships
}

/// Relationship entries of every entity, in declaration order. Entries whose
/// entity isn't part of the object (a generated `User`) are not produced.
pub fn materialize(
    object: &JdlObject,
    config: &ImportConfig,
) -> IndexMap<String, Vec<RelationshipJson>> {
    let mut entries: IndexMap<String, Vec<RelationshipJson>> = object
        .entities
        .keys()
        .map(|name| (name.clone(), Vec::new()))
        .collect();

    for relationship in object.relationships() {
        let kind = relationship.kind;
        if let Some(list) = entries.get_mut(&relationship.from.entity) {
            let mut json = entry(kind, &relationship.from, &relationship.to, true);
            if relationship.jpa_derived_identifier {
                json.use_jpa_derived_identifier = Some(true);
            }
            list.push(json);
        }
        if !needs_mirror(relationship, config) {
            continue;
        }
        if let Some(list) = entries.get_mut(&relationship.to.entity) {
            list.push(entry(
                reversed(kind),
                &relationship.to,
                &relationship.from,
                false,
            ));
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::JdlEntity;
    use serde_json::json;

    fn object(relationships: Vec<JdlRelationship>) -> JdlObject {
        let mut object = JdlObject::new();
        object.add_entity(JdlEntity::new("A"));
        object.add_entity(JdlEntity::new("B"));
        for relationship in relationships {
            object.add_relationship(relationship);
        }
        object
    }

    #[test]
    fn test_one_to_many_has_many_to_one_mirror() {
        let object = object(vec![JdlRelationship::new(
            RelationshipKind::OneToMany,
            RelationshipEnd::new("A").with_injected_field("bs"),
            RelationshipEnd::new("B").with_injected_field("a"),
        )]);
        let entries = materialize(&object, &ImportConfig::default());
        assert_eq!(
            serde_json::to_value(&entries["A"]).unwrap(),
            json!([{
                "relationshipType": "one-to-many",
                "relationshipName": "bs",
                "otherEntityName": "b",
                "otherEntityField": "id",
                "otherEntityRelationshipName": "a"
            }])
        );
        assert_eq!(entries["B"].len(), 1);
        assert_eq!(entries["B"][0].relationship_type, "many-to-one");
        assert_eq!(entries["B"][0].other_entity_name, "a");
        assert_eq!(entries["B"][0].other_entity_relationship_name, "bs");
    }

    #[test]
    fn test_owner_side_and_display_field() {
        let object = object(vec![JdlRelationship::new(
            RelationshipKind::ManyToMany,
            RelationshipEnd::new("A")
                .with_injected_field("b")
                .with_display_field("name")
                .required(),
            RelationshipEnd::new("B").with_injected_field("a"),
        )]);
        let entries = materialize(&object, &ImportConfig::default());
        let from = &entries["A"][0];
        assert_eq!(from.owner_side, Some(true));
        assert_eq!(from.other_entity_field, "name");
        assert_eq!(from.relationship_validate_rules.as_deref(), Some("required"));
        assert_eq!(entries["B"][0].owner_side, Some(false));
        assert_eq!(entries["B"][0].relationship_type, "many-to-many");
    }

    #[test]
    fn test_unidirectional_many_to_one() {
        let object = object(vec![JdlRelationship::new(
            RelationshipKind::ManyToOne,
            RelationshipEnd::new("A").with_injected_field("b"),
            RelationshipEnd::new("B"),
        )]);
        let config = ImportConfig::default().with_unidirectional_relationships(true);
        let entries = materialize(&object, &config);
        assert_eq!(entries["A"].len(), 1);
        assert!(entries["B"].is_empty());

        let entries = materialize(&object, &ImportConfig::default());
        assert_eq!(entries["B"][0].relationship_type, "one-to-many");
        assert_eq!(entries["B"][0].relationship_name, "a");
    }

    #[test]
    fn test_relationship_to_generated_user() {
        let mut relationship = JdlRelationship::new(
            RelationshipKind::OneToOne,
            RelationshipEnd::new("A").with_injected_field("user"),
            RelationshipEnd::new("User"),
        );
        relationship.jpa_derived_identifier = true;
        let object = object(vec![relationship]);
        let entries = materialize(&object, &ImportConfig::default());
        assert_eq!(entries["A"][0].other_entity_name, "user");
        assert_eq!(entries["A"][0].use_jpa_derived_identifier, Some(true));
        assert!(!entries.contains_key("User"));
    }
}
