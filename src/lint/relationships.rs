use indexmap::IndexMap;

use super::{Issue, Rule};
use crate::ast::{Document, RelationshipBlock, RelationshipKind};

/// Flags every two consecutive `relationship` statements of the same type.
pub fn check_relationships(document: &Document) -> Vec<Issue> {
    let mut by_kind: IndexMap<RelationshipKind, Vec<&RelationshipBlock>> = IndexMap::new();
    for block in &document.relationships {
        by_kind.entry(block.kind).or_default().push(block);
    }

    let mut issues = Vec::new();
    for (kind, blocks) in by_kind {
        for pair in blocks.windows(2) {
            issues.push(Issue::new(
                Rule::RelationshipIndividualDeclaration,
                kind.as_str(),
                vec![pair[0].pos, pair[1].pos],
            ));
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_separate_statements() {
        let document = parse(
            "entity A\nentity B\n\
             relationship OneToMany { A to B }\n\
             relationship ManyToOne { B{x} to A }\n\
             relationship OneToMany { A{y} to B }\n\
             relationship OneToMany { A{z} to B }",
        )
        .unwrap();
        let issues = check_relationships(&document);
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|issue| issue.subject == "OneToMany"));
        assert_eq!(issues[0].positions[0].line, 3);
    }

    #[test]
    fn test_grouped_statement() {
        let document =
            parse("entity A\nentity B\nrelationship OneToMany { A{x} to B, A{y} to B }").unwrap();
        assert!(check_relationships(&document).is_empty());
    }
}
