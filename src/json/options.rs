//! Folding of unary and binary options into flat entity settings.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::logger::Logger;
use crate::model::JdlOption;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityOptions {
    pub dto: String,
    pub pagination: String,
    pub service: String,
    pub jpa_metamodel_filtering: bool,
    pub fluent_methods: bool,
    pub read_only: bool,
    pub client_root_folder: String,
    /// `"*"` or the base names of the owning applications.
    pub applications: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub microservice_name: Option<String>,
    /// Engine name, or `false` for an entity excluded from a wildcard search.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_engine: Option<Value>,
    #[serde(
        rename = "angularJSSuffix",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub angular_js_suffix: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub skip_client: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub skip_server: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub embedded: bool,
}

fn is_false(b: &bool) -> bool {
    !b
}

impl Default for EntityOptions {
    fn default() -> Self {
        Self {
            dto: "no".to_string(),
            pagination: "no".to_string(),
            service: "no".to_string(),
            jpa_metamodel_filtering: false,
            fluent_methods: true,
            read_only: false,
            client_root_folder: String::new(),
            applications: Value::String("*".to_string()),
            microservice_name: None,
            search_engine: None,
            angular_js_suffix: None,
            skip_client: false,
            skip_server: false,
            embedded: false,
        }
    }
}

impl EntityOptions {
    fn apply(&mut self, option: &JdlOption) {
        let value = option.value.clone().unwrap_or_default();
        match option.name.as_str() {
            "dto" => self.dto = value,
            "service" => self.service = value,
            "pagination" => self.pagination = value,
            "search" => self.search_engine = Some(Value::String(value)),
            "microservice" => self.microservice_name = Some(value),
            "angularSuffix" => self.angular_js_suffix = Some(value),
            "clientRootFolder" => self.client_root_folder = value,
            "skipClient" => self.skip_client = true,
            "skipServer" => self.skip_server = true,
            "noFluentMethod" => self.fluent_methods = false,
            "filter" => self.jpa_metamodel_filtering = true,
            "readOnly" => self.read_only = true,
            "embedded" => self.embedded = true,
            _ => {}
        }
    }
}

/// A default implied by another setting, applied when the user didn't set
/// the option explicitly.
struct InferenceRule {
    cause: &'static str,
    applies: fn(&EntityOptions) -> bool,
    option: &'static str,
    value: &'static str,
    set: fn(&mut EntityOptions, &str),
}

fn uses_mapstruct(options: &EntityOptions) -> bool {
    options.dto == "mapstruct"
}

fn uses_filtering(options: &EntityOptions) -> bool {
    options.jpa_metamodel_filtering
}

fn set_service(options: &mut EntityOptions, value: &str) {
    options.service = value.to_string();
}

/// Applied in order.
const INFERENCE_RULES: &[InferenceRule] = &[
    InferenceRule {
        cause: "dto",
        applies: uses_mapstruct,
        option: "service",
        value: "serviceClass",
        set: set_service,
    },
    InferenceRule {
        cause: "filter",
        applies: uses_filtering,
        option: "service",
        value: "serviceClass",
        set: set_service,
    },
];

/// Folds every option applying to `entity` into its settings, then applies
/// the inference rules.
pub fn fold<'o>(
    entity: &str,
    options: impl IntoIterator<Item = &'o JdlOption>,
    logger: &dyn Logger,
) -> EntityOptions {
    let mut folded = EntityOptions::default();
    let mut explicit: IndexSet<&str> = IndexSet::new();

    for option in options {
        if option.applies_to(entity) {
            folded.apply(option);
            explicit.insert(option.name.as_str());
        } else if option.name == "search" && option.is_wildcard() && option.is_excluded(entity) {
            folded.search_engine = Some(Value::Bool(false));
        }
    }

    for rule in INFERENCE_RULES {
        if explicit.contains(rule.option) || !(rule.applies)(&folded) {
            continue;
        }
        (rule.set)(&mut folded, rule.value);
        explicit.insert(rule.option);
        logger.info(&format!(
            "The {} option is set for '{}', so its '{}' option is set to '{}'.",
            rule.cause, entity, rule.option, rule.value
        ));
    }

    folded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::RecordingLogger;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let folded = fold("A", [], &RecordingLogger::new());
        assert_eq!(
            serde_json::to_value(&folded).unwrap(),
            json!({
                "dto": "no",
                "pagination": "no",
                "service": "no",
                "jpaMetamodelFiltering": false,
                "fluentMethods": true,
                "readOnly": false,
                "clientRootFolder": "",
                "applications": "*"
            })
        );
    }

    #[test]
    fn test_dto_implies_service() {
        let options = [JdlOption::binary("dto", "mapstruct", ["*"])];
        let logger = RecordingLogger::new();
        let folded = fold("A", &options, &logger);
        assert_eq!(folded.service, "serviceClass");
        assert_eq!(logger.infos().len(), 1);
    }

    #[test]
    fn test_explicit_service_is_kept() {
        let options = [
            JdlOption::binary("dto", "mapstruct", ["*"]),
            JdlOption::binary("service", "serviceImpl", ["A"]),
            JdlOption::unary("filter", ["A"]),
        ];
        let logger = RecordingLogger::new();
        let folded = fold("A", &options, &logger);
        assert_eq!(folded.service, "serviceImpl");
        assert!(folded.jpa_metamodel_filtering);
        assert!(logger.infos().is_empty());
    }

    #[test]
    fn test_filter_implies_service() {
        let options = [JdlOption::unary("filter", ["A"])];
        let folded = fold("A", &options, &RecordingLogger::new());
        assert_eq!(folded.service, "serviceClass");
        let folded = fold("B", &options, &RecordingLogger::new());
        assert_eq!(folded.service, "no");
    }

    #[test]
    fn test_search_exclusion_writes_false() {
        let options = [JdlOption::binary("search", "elasticsearch", ["*"]).excluding(["B"])];
        let logger = RecordingLogger::new();
        assert_eq!(
            fold("A", &options, &logger).search_engine,
            Some(json!("elasticsearch"))
        );
        assert_eq!(fold("B", &options, &logger).search_engine, Some(json!(false)));
    }

    #[test]
    fn test_unary_options() {
        let options = [
            JdlOption::unary("skipClient", ["A"]),
            JdlOption::unary("noFluentMethod", ["*"]),
            JdlOption::binary("angularSuffix", "mySuffix", ["A"]),
        ];
        let folded = fold("A", &options, &RecordingLogger::new());
        assert!(folded.skip_client);
        assert!(!folded.fluent_methods);
        assert_eq!(folded.angular_js_suffix.as_deref(), Some("mySuffix"));
        let value = serde_json::to_value(&folded).unwrap();
        assert_eq!(value["skipClient"], json!(true));
        assert_eq!(value["angularJSSuffix"], json!("mySuffix"));
        assert!(value.get("skipServer").is_none());
    }
}
