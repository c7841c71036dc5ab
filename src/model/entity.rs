use indexmap::IndexMap;

use super::field::JdlField;

/// Entities whose declaration is ignored unless user management is skipped.
pub const BUILT_IN_ENTITIES: &[&str] = &["User", "Authority"];

pub fn is_built_in_entity(name: &str) -> bool {
    BUILT_IN_ENTITIES.contains(&name)
}

#[derive(Debug, Clone, PartialEq)]
pub struct JdlEntity {
    pub name: String,
    pub table_name: String,
    pub comment: Option<String>,
    pub fields: IndexMap<String, JdlField>,
}

impl JdlEntity {
    /// Creates an entity whose table name is derived from its name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let table_name = table_name_for(&name);
        Self {
            name,
            table_name,
            comment: None,
            fields: IndexMap::new(),
        }
    }

    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }

    pub fn add_field(&mut self, field: JdlField) {
        self.fields.insert(field.name.clone(), field);
    }

    pub fn with_field(mut self, field: JdlField) -> Self {
        self.add_field(field);
        self
    }
}

/// Table name generated when none is given: snake_case of the entity name.
pub fn table_name_for(entity_name: &str) -> String {
    let mut result = String::new();
    let chars: Vec<char> = entity_name.chars().collect();

    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() {
            let prev_lower = i > 0 && (chars[i - 1].is_lowercase() || chars[i - 1].is_ascii_digit());
            let next_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
            let prev_upper = i > 0 && chars[i - 1].is_uppercase();
            if !result.is_empty() && (prev_lower || (prev_upper && next_lower)) {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else if ch == '-' || ch == ' ' {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
        } else {
            result.push(ch);
        }
    }

    result
}

/// `MyEntity` -> `myEntity`, used for relationship names and `otherEntityName`.
pub fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
