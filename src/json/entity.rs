use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::changelog::ChangelogDates;
use super::options::{self, EntityOptions};
use super::relationship::{self, RelationshipJson};
use crate::config::ImportConfig;
use crate::convert::number;
use crate::export::{DiskState, ExportError};
use crate::logger::Logger;
use crate::model::{ApplicationType, JdlEntity, JdlField, JdlObject, ValidationKind};

/// Content of `.jhipster/<Name>.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityJson {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub javadoc: Option<String>,
    pub fields: Vec<FieldJson>,
    pub relationships: Vec<RelationshipJson>,
    pub changelog_date: String,
    pub entity_table_name: String,
    #[serde(flatten)]
    pub options: EntityOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldJson {
    pub field_name: String,
    pub field_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub javadoc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_values: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_type_blob_content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub field_validate_rules: Vec<String>,
    /// `fieldValidateRulesMaxlength` and the other rule values.
    #[serde(flatten)]
    pub rule_values: Map<String, Value>,
}

impl EntityJson {
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

fn field_json(field: &JdlField, object: &JdlObject) -> FieldJson {
    let mut json = FieldJson {
        field_name: field.name.clone(),
        field_type: field.type_name.clone(),
        javadoc: field.comment.clone(),
        field_values: None,
        field_type_blob_content: None,
        field_validate_rules: Vec::new(),
        rule_values: Map::new(),
    };

    if let Some(jdl_enum) = object.enums.get(&field.type_name) {
        json.field_values = Some(jdl_enum.field_values());
    } else if let Some(content) = field.builtin_type().and_then(|t| t.blob_content()) {
        json.field_type = "byte[]".to_string();
        json.field_type_blob_content = Some(content.to_string());
    }

    for validation in &field.validations {
        json.field_validate_rules.push(validation.name.clone());
        let (Some(kind), Some(value)) = (validation.kind(), &validation.value) else {
            continue;
        };
        let value = match kind {
            ValidationKind::Pattern => Value::String(value.clone()),
            _ => number(value),
        };
        json.rule_values
            .insert(format!("fieldValidateRules{}", kind.json_suffix()), value);
    }
    json
}

/// Entity JSON of every entity of `object`, in declaration order.
///
/// Changelog dates already on disk are carried over; new entities get fresh
/// dates one second apart.
pub fn convert_entities(
    object: &JdlObject,
    config: &ImportConfig,
    state: &dyn DiskState,
    logger: &dyn Logger,
) -> Result<IndexMap<String, EntityJson>, ExportError> {
    let dates = ChangelogDates::new(config.creation_timestamp);
    let mut relationships = relationship::materialize(object, config);
    let mut converted = IndexMap::new();

    for (index, entity) in object.entities.values().enumerate() {
        let on_disk = state.entity_json(&entity.name)?;
        let json = EntityJson {
            name: entity.name.clone(),
            javadoc: entity.comment.clone(),
            fields: entity
                .fields
                .values()
                .map(|field| field_json(field, object))
                .collect(),
            relationships: relationships.swap_remove(&entity.name).unwrap_or_default(),
            changelog_date: dates.resolve(index, on_disk.as_ref()),
            entity_table_name: entity.table_name.clone(),
            options: entity_options(entity, object, config, logger),
        };
        converted.insert(entity.name.clone(), json);
    }
    debug!(entities = converted.len(), "converted entities to JSON");
    Ok(converted)
}

fn entity_options(
    entity: &JdlEntity,
    object: &JdlObject,
    config: &ImportConfig,
    logger: &dyn Logger,
) -> EntityOptions {
    let owners = object.applications_of(&entity.name);
    let scoped = owners.iter().flat_map(|app| app.options.iter());
    let mut folded = options::fold(&entity.name, object.options.iter().chain(scoped), logger);

    if !owners.is_empty() {
        folded.applications = owners
            .iter()
            .filter_map(|app| app.base_name())
            .map(|name| Value::String(name.to_string()))
            .collect();
    }
    if folded.microservice_name.is_none() {
        folded.microservice_name = owners
            .iter()
            .find(|app| app.application_type() == Some(ApplicationType::Microservice))
            .and_then(|app| app.base_name())
            .map(str::to_string)
            .or_else(|| {
                let standalone_microservice = owners.is_empty()
                    && config.application_type == ApplicationType::Microservice;
                standalone_microservice
                    .then(|| config.application_name.clone())
                    .flatten()
            });
    }
    folded
}

/// Drops the entities whose JSON is identical to the one on disk, ignoring
/// `changelogDate`.
pub fn filter_unchanged(
    entities: IndexMap<String, EntityJson>,
    state: &dyn DiskState,
) -> Result<IndexMap<String, EntityJson>, ExportError> {
    let mut changed = IndexMap::new();
    for (name, json) in entities {
        let unchanged = match state.entity_json(&name)? {
            Some(on_disk) => without_date(on_disk) == without_date(json.to_value()?),
            None => false,
        };
        if unchanged {
            debug!(entity = %name, "entity unchanged, skipped");
        } else {
            changed.insert(name, json);
        }
    }
    Ok(changed)
}

fn without_date(mut value: Value) -> Value {
    if let Some(object) = value.as_object_mut() {
        object.remove("changelogDate");
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::convert;
    use crate::export::NoDiskState;
    use crate::logger::RecordingLogger;
    use crate::parser::parse;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn config() -> ImportConfig {
        ImportConfig::default()
            .with_creation_timestamp(Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap())
    }

    fn entities(input: &str, config: &ImportConfig, state: &dyn DiskState) -> IndexMap<String, EntityJson> {
        let logger = RecordingLogger::new();
        let object = convert(&parse(input).unwrap(), config, &logger);
        convert_entities(&object, config, state, &logger).unwrap()
    }

    #[test]
    fn test_entity_json() {
        let converted = entities(
            r#"
            enum Language { FRENCH (french), ENGLISH }
            /** A book */
            entity Book {
                title String required maxlength(100) pattern(/^[A-Z].*$/)
                price BigDecimal min(0)
                cover ImageBlob
                language Language
            }
            dto Book with mapstruct
            "#,
            &config(),
            &NoDiskState,
        );
        assert_eq!(
            converted["Book"].to_value().unwrap(),
            json!({
                "name": "Book",
                "javadoc": "A book",
                "fields": [
                    {
                        "fieldName": "title",
                        "fieldType": "String",
                        "fieldValidateRules": ["required", "maxlength", "pattern"],
                        "fieldValidateRulesMaxlength": 100,
                        "fieldValidateRulesPattern": "^[A-Z].*$"
                    },
                    {
                        "fieldName": "price",
                        "fieldType": "BigDecimal",
                        "fieldValidateRules": ["min"],
                        "fieldValidateRulesMin": 0
                    },
                    {
                        "fieldName": "cover",
                        "fieldType": "byte[]",
                        "fieldTypeBlobContent": "image"
                    },
                    {
                        "fieldName": "language",
                        "fieldType": "Language",
                        "fieldValues": "FRENCH (french),ENGLISH"
                    }
                ],
                "relationships": [],
                "changelogDate": "20220101000000",
                "entityTableName": "book",
                "dto": "mapstruct",
                "pagination": "no",
                "service": "serviceClass",
                "jpaMetamodelFiltering": false,
                "fluentMethods": true,
                "readOnly": false,
                "clientRootFolder": "",
                "applications": "*"
            })
        );
    }

    #[test]
    fn test_changelog_dates_follow_declaration_order() {
        let converted = entities("entity C\nentity A\nentity B", &config(), &NoDiskState);
        let dates: Vec<&str> = converted.values().map(|e| e.changelog_date.as_str()).collect();
        assert_eq!(dates, ["20220101000000", "20220101000001", "20220101000002"]);
    }

    #[test]
    fn test_changelog_date_from_disk() {
        let mut state: IndexMap<String, Value> = IndexMap::new();
        state.insert("B".into(), json!({ "changelogDate": "20200101000000" }));
        let converted = entities("entity A\nentity B", &config(), &state);
        assert_eq!(converted["A"].changelog_date, "20220101000000");
        assert_eq!(converted["B"].changelog_date, "20200101000000");
    }

    #[test]
    fn test_applications_and_microservice_name() {
        let converted = entities(
            r#"
            application {
                config { baseName store applicationType microservice }
                entities A
            }
            application {
                config { baseName shop applicationType gateway }
                entities A, B
            }
            entity A
            entity B
            "#,
            &config(),
            &NoDiskState,
        );
        assert_eq!(converted["A"].options.applications, json!(["store", "shop"]));
        assert_eq!(converted["A"].options.microservice_name.as_deref(), Some("store"));
        assert_eq!(converted["B"].options.applications, json!(["shop"]));
        assert_eq!(converted["B"].options.microservice_name, None);
    }

    #[test]
    fn test_standalone_microservice() {
        let config = config()
            .with_application_type(ApplicationType::Microservice)
            .with_application_name("invoice");
        let converted = entities("entity A", &config, &NoDiskState);
        assert_eq!(converted["A"].options.microservice_name.as_deref(), Some("invoice"));
    }

    #[test]
    fn test_filter_unchanged() {
        let converted = entities("entity A { name String }\nentity B", &config(), &NoDiskState);
        let mut state: IndexMap<String, Value> = IndexMap::new();
        let mut a = converted["A"].to_value().unwrap();
        a["changelogDate"] = json!("19990101000000");
        state.insert("A".into(), a);
        let mut b = converted["B"].to_value().unwrap();
        b["dto"] = json!("mapstruct");
        state.insert("B".into(), b);

        let changed = filter_unchanged(converted, &state).unwrap();
        assert_eq!(changed.keys().collect::<Vec<_>>(), ["B"]);
    }
}
