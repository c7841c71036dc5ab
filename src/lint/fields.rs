use super::{Issue, Rule, duplicates};
use crate::ast::Document;

pub fn check_fields(document: &Document) -> Vec<Issue> {
    document
        .entities
        .iter()
        .flat_map(|entity| {
            duplicates(
                entity
                    .fields()
                    .iter()
                    .map(|field| (field.name.as_str(), field.pos)),
            )
            .into_iter()
            .map(|(name, positions)| {
                Issue::new(
                    Rule::FieldDuplicated,
                    format!("{}.{}", entity.name, name),
                    positions,
                )
            })
        })
        .collect()
}
