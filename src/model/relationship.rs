pub use crate::ast::RelationshipKind;

/// One side of a relationship. Entities are referenced by name only.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RelationshipEnd {
    pub entity: String,
    pub injected_field: Option<String>,
    pub display_field: Option<String>,
    pub required: bool,
    pub comment: Option<String>,
}

impl RelationshipEnd {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            ..Default::default()
        }
    }

    pub fn with_injected_field(mut self, field: impl Into<String>) -> Self {
        self.injected_field = Some(field.into());
        self
    }

    pub fn with_display_field(mut self, field: impl Into<String>) -> Self {
        self.display_field = Some(field.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JdlRelationship {
    pub kind: RelationshipKind,
    pub from: RelationshipEnd,
    pub to: RelationshipEnd,
    pub jpa_derived_identifier: bool,
}

impl JdlRelationship {
    pub fn new(kind: RelationshipKind, from: RelationshipEnd, to: RelationshipEnd) -> Self {
        Self {
            kind,
            from,
            to,
            jpa_derived_identifier: false,
        }
    }

    /// Identity used to de-duplicate identical declarations.
    pub fn id(&self) -> String {
        format!(
            "{}_{}{{{}}}_{}{{{}}}",
            self.kind.as_str(),
            self.from.entity,
            self.from.injected_field.as_deref().unwrap_or_default(),
            self.to.entity,
            self.to.injected_field.as_deref().unwrap_or_default(),
        )
    }

    pub fn involves(&self, entity: &str) -> bool {
        self.from.entity == entity || self.to.entity == entity
    }
}

impl std::fmt::Display for JdlRelationship {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} relationship from '{}' to '{}'",
            self.kind.as_str(),
            self.from.entity,
            self.to.entity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_id() {
        let rel = JdlRelationship::new(
            RelationshipKind::OneToMany,
            RelationshipEnd::new("A").with_injected_field("bs"),
            RelationshipEnd::new("B"),
        );
        assert_eq!(rel.id(), "OneToMany_A{bs}_B{}");
        assert!(rel.involves("B"));
        assert!(!rel.involves("C"));
    }
}
