use super::{Issue, Rule, duplicates};
use crate::ast::Document;
use crate::model::entity::table_name_for;

pub fn check_entities(document: &Document) -> Vec<Issue> {
    let mut issues: Vec<Issue> = duplicates(
        document
            .entities
            .iter()
            .map(|entity| (entity.name.as_str(), entity.pos)),
    )
    .into_iter()
    .map(|(name, positions)| Issue::new(Rule::EntityDuplicated, name, positions))
    .collect();

    for entity in &document.entities {
        if entity.body.as_ref().is_some_and(Vec::is_empty) {
            issues.push(Issue::new(
                Rule::EntityShorterDeclaration,
                &entity.name,
                vec![entity.pos],
            ));
        }
        if entity
            .table_name
            .as_ref()
            .is_some_and(|table| *table == table_name_for(&entity.name))
        {
            issues.push(Issue::new(
                Rule::EntityOptionalTableName,
                &entity.name,
                vec![entity.pos],
            ));
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn rules(input: &str) -> Vec<Rule> {
        check_entities(&parse(input).unwrap())
            .into_iter()
            .map(|issue| issue.rule)
            .collect()
    }

    #[test]
    fn test_duplicates_reported_once() {
        assert_eq!(rules("entity A\nentity A\nentity A"), [Rule::EntityDuplicated]);
    }

    #[test]
    fn test_empty_braces() {
        assert_eq!(rules("entity A {}"), [Rule::EntityShorterDeclaration]);
        assert!(rules("entity A").is_empty());
    }

    #[test]
    fn test_optional_table_name() {
        assert_eq!(rules("entity JobHistory (job_history)"), [Rule::EntityOptionalTableName]);
        assert!(rules("entity JobHistory (history)").is_empty());
    }
}
