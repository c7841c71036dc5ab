//! Advisory checks over the syntax tree.
//!
//! Linters never fail and never change anything: they point at declarations
//! that are redundant or could be written more concisely.

pub mod entities;
pub mod enums;
pub mod fields;
pub mod relationships;

use std::fmt;

use crate::ast::Document;
use crate::lexer::Pos;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    EntityDuplicated,
    EntityShorterDeclaration,
    EntityOptionalTableName,
    FieldDuplicated,
    EnumDuplicated,
    EnumUnused,
    RelationshipIndividualDeclaration,
}

impl Rule {
    pub fn code(&self) -> &'static str {
        match self {
            Self::EntityDuplicated => "ENT_DUPLICATED",
            Self::EntityShorterDeclaration => "ENT_SHORTER_DECL",
            Self::EntityOptionalTableName => "ENT_OPTIONAL_TABLE_NAME",
            Self::FieldDuplicated => "FLD_DUPLICATED",
            Self::EnumDuplicated => "ENUM_DUPLICATED",
            Self::EnumUnused => "ENUM_UNUSED",
            Self::RelationshipIndividualDeclaration => "REL_INDIVIDUAL_DECL",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::EntityDuplicated => "Entity declared more than once",
            Self::EntityShorterDeclaration => "Entity declaration could be shorter without braces",
            Self::EntityOptionalTableName => "Table name is the one generated anyway",
            Self::FieldDuplicated => "Field declared more than once in the same entity",
            Self::EnumDuplicated => "Enum declared more than once",
            Self::EnumUnused => "Enum not used by any field",
            Self::RelationshipIndividualDeclaration => {
                "Relationships of the same type could be declared together"
            }
        }
    }
}

/// One finding. `subject` names what it is about (`Book`, `Book.title`,
/// `OneToMany`).
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub rule: Rule,
    pub subject: String,
    pub positions: Vec<Pos>,
}

impl Issue {
    pub fn new(rule: Rule, subject: impl Into<String>, positions: Vec<Pos>) -> Self {
        Self {
            rule,
            subject: subject.into(),
            positions,
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.rule.code(), self.subject, self.rule.description())?;
        if !self.positions.is_empty() {
            let lines: Vec<String> = self.positions.iter().map(|p| p.line.to_string()).collect();
            write!(f, ", line {}", lines.join(", "))?;
        }
        Ok(())
    }
}

/// Issues by category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Issues {
    pub entities: Vec<Issue>,
    pub fields: Vec<Issue>,
    pub enums: Vec<Issue>,
    pub relationships: Vec<Issue>,
}

impl Issues {
    pub fn len(&self) -> usize {
        self.entities.len() + self.fields.len() + self.enums.len() + self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        self.entities
            .iter()
            .chain(&self.fields)
            .chain(&self.enums)
            .chain(&self.relationships)
    }

    pub fn count(&self, rule: Rule) -> usize {
        self.iter().filter(|issue| issue.rule == rule).count()
    }
}

pub fn check(document: &Document) -> Issues {
    Issues {
        entities: entities::check_entities(document),
        fields: fields::check_fields(document),
        enums: enums::check_enums(document),
        relationships: relationships::check_relationships(document),
    }
}

/// Positions of every name seen more than once, in order of first
/// appearance.
pub(crate) fn duplicates<'a>(
    named: impl IntoIterator<Item = (&'a str, Pos)>,
) -> Vec<(&'a str, Vec<Pos>)> {
    let mut seen: indexmap::IndexMap<&str, Vec<Pos>> = indexmap::IndexMap::new();
    for (name, pos) in named {
        seen.entry(name).or_default().push(pos);
    }
    seen.into_iter()
        .filter(|(_, positions)| positions.len() > 1)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_clean_document() {
        let document = parse(
            "enum Lang { FR, EN }\nentity A { lang Lang }\nentity B\nrelationship OneToMany { A to B, B to A }",
        )
        .unwrap();
        assert!(check(&document).is_empty());
    }

    #[test]
    fn test_report() {
        let document = parse(
            "entity A {}\nentity A\nenum Lang { FR }\nrelationship OneToOne { A to A }\nrelationship OneToOne { A{b} to A }",
        )
        .unwrap();
        let issues = check(&document);
        assert_eq!(issues.count(Rule::EntityDuplicated), 1);
        assert_eq!(issues.count(Rule::EntityShorterDeclaration), 1);
        assert_eq!(issues.count(Rule::EnumUnused), 1);
        assert_eq!(issues.count(Rule::RelationshipIndividualDeclaration), 1);
        assert_eq!(issues.len(), 4);
        assert_eq!(
            issues.entities[0].to_string(),
            "ENT_DUPLICATED (A): Entity declared more than once, line 1, 2"
        );
    }
}
