use serde_json::Value;

use super::keywords::{BASE_NAME, PACKAGE_NAME};
use super::{Context, ValidationError};
use crate::database::DatabaseType;
use crate::model::{ApplicationType, JdlApplication};

/// (option, legal values); booleans are compared by their text.
const LEGAL_VALUES: &[(&str, &[&str])] = &[
    ("authenticationType", &["jwt", "session", "oauth2", "uaa"]),
    ("buildTool", &["maven", "gradle"]),
    (
        "cacheProvider",
        &["ehcache", "caffeine", "hazelcast", "infinispan", "memcached", "redis", "no"],
    ),
    ("clientFramework", &["angularX", "react", "vue", "no"]),
    ("clientPackageManager", &["npm", "yarn"]),
    ("searchEngine", &["false", "elasticsearch", "couchbase"]),
    ("messageBroker", &["false", "kafka"]),
    ("serviceDiscoveryType", &["false", "eureka", "consul", "no"]),
];

pub(super) fn check(ctx: &Context) -> Result<(), ValidationError> {
    for app in ctx.object.applications.values() {
        check_application(app)?;
    }
    Ok(())
}

fn check_application(app: &JdlApplication) -> Result<(), ValidationError> {
    let base_name = app.base_name().ok_or_else(|| {
        ValidationError::Application("The application must have a baseName.".to_string())
    })?;
    if !BASE_NAME.is_match(base_name) {
        return Err(ValidationError::Application(format!(
            "The baseName '{}' is not valid, it must be alphanumeric and start with a letter.",
            base_name
        )));
    }

    let illegal = |option: &str, value: &str| {
        ValidationError::Application(format!(
            "The value '{}' is not valid for the option '{}' of application '{}'.",
            value, option, base_name
        ))
    };

    let app_type = app.config_str("applicationType").unwrap_or_default();
    if ApplicationType::from_str(app_type).is_none() {
        return Err(illegal("applicationType", app_type));
    }

    let db_text = app.config_str("databaseType").unwrap_or_default();
    let database = DatabaseType::from_str(db_text).ok_or_else(|| illegal("databaseType", db_text))?;

    for (option, legal) in LEGAL_VALUES {
        if let Some(value) = app.config.get(*option).map(value_text) {
            if !legal.contains(&value.as_str()) {
                return Err(illegal(*option, &value));
            }
        }
    }

    if let Some(prod) = app.config.get("prodDatabaseType").map(value_text) {
        if !database.prod_database_types().contains(&prod.as_str()) {
            return Err(ValidationError::Application(format!(
                "The prodDatabaseType '{}' can't be used with the databaseType '{}' in application '{}'.",
                prod, database, base_name
            )));
        }
    }
    if let Some(dev) = app.config.get("devDatabaseType").map(value_text) {
        if !database.dev_database_types().contains(&dev.as_str()) {
            return Err(ValidationError::Application(format!(
                "The devDatabaseType '{}' can't be used with the databaseType '{}' in application '{}'.",
                dev, database, base_name
            )));
        }
    }

    match app.config.get("serverPort") {
        None => {}
        Some(Value::Number(n)) if n.as_u64().is_some_and(|p| p <= u16::MAX as u64) => {}
        Some(Value::String(s)) if s.parse::<u16>().is_ok() => {}
        Some(other) => return Err(illegal("serverPort", &value_text(other))),
    }

    if let Some(package) = app.config_str("packageName") {
        if !PACKAGE_NAME.is_match(package) {
            return Err(illegal("packageName", package));
        }
    }

    if app.config_str("authenticationType") == Some("uaa")
        && app.application_type() != Some(ApplicationType::Uaa)
        && app.config_str("uaaBaseName").is_none_or(str::is_empty)
    {
        return Err(ValidationError::Application(format!(
            "The application '{}' uses UAA authentication and must set uaaBaseName.",
            base_name
        )));
    }

    Ok(())
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, json};

    fn app(pairs: &[(&str, Value)]) -> JdlApplication {
        let config: Map<String, Value> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        JdlApplication::new(config)
    }

    #[test]
    fn test_valid_application() {
        let app = app(&[
            ("baseName", json!("shop")),
            ("prodDatabaseType", json!("postgresql")),
            ("searchEngine", json!("elasticsearch")),
            ("messageBroker", json!(false)),
        ]);
        assert_eq!(check_application(&app), Ok(()));
    }

    #[test]
    fn test_missing_base_name() {
        let err = check_application(&app(&[])).unwrap_err();
        assert!(matches!(err, ValidationError::Application(_)));
        assert!(err.to_string().contains("baseName"));
    }

    #[test]
    fn test_illegal_value() {
        let err = check_application(&app(&[
            ("baseName", json!("shop")),
            ("buildTool", json!("ant")),
        ]))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "The value 'ant' is not valid for the option 'buildTool' of application 'shop'."
        );
    }

    #[test]
    fn test_prod_database_must_match() {
        let err = check_application(&app(&[
            ("baseName", json!("shop")),
            ("databaseType", json!("mongodb")),
            ("prodDatabaseType", json!("mysql")),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("prodDatabaseType 'mysql'"));
    }

    #[test]
    fn test_uaa_requires_base_name() {
        let err = check_application(&app(&[
            ("baseName", json!("gw")),
            ("applicationType", json!("gateway")),
            ("authenticationType", json!("uaa")),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("uaaBaseName"));
    }

    #[test]
    fn test_bad_package_name() {
        let err = check_application(&app(&[
            ("baseName", json!("shop")),
            ("packageName", json!("Com.Shop")),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("packageName"));
    }
}
