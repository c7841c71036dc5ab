use std::collections::HashSet;

use super::{Issue, Rule, duplicates};
use crate::ast::Document;

pub fn check_enums(document: &Document) -> Vec<Issue> {
    let mut issues: Vec<Issue> = duplicates(
        document
            .enums
            .iter()
            .map(|jdl_enum| (jdl_enum.name.as_str(), jdl_enum.pos)),
    )
    .into_iter()
    .map(|(name, positions)| Issue::new(Rule::EnumDuplicated, name, positions))
    .collect();

    let used: HashSet<&str> = document
        .entities
        .iter()
        .flat_map(|entity| entity.fields())
        .map(|field| field.typ.as_str())
        .collect();
    let mut reported = HashSet::new();
    for jdl_enum in &document.enums {
        if !used.contains(jdl_enum.name.as_str()) && reported.insert(jdl_enum.name.as_str()) {
            issues.push(Issue::new(Rule::EnumUnused, &jdl_enum.name, vec![jdl_enum.pos]));
        }
    }
    issues
}
