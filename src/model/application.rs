use indexmap::IndexSet;
use serde_json::{Map, Value, json};

use super::option::JdlOptions;
use crate::database::DatabaseType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ApplicationType {
    #[default]
    Monolith,
    Microservice,
    Gateway,
    Uaa,
}

impl ApplicationType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "monolith" => Some(Self::Monolith),
            "microservice" => Some(Self::Microservice),
            "gateway" => Some(Self::Gateway),
            "uaa" => Some(Self::Uaa),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monolith => "monolith",
            Self::Microservice => "microservice",
            Self::Gateway => "gateway",
            Self::Uaa => "uaa",
        }
    }

    fn default_port(&self) -> u16 {
        match self {
            Self::Monolith | Self::Gateway => 8080,
            Self::Microservice => 8081,
            Self::Uaa => 9999,
        }
    }
}

impl std::fmt::Display for ApplicationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named configuration bundle and the entities it includes.
#[derive(Debug, Clone, PartialEq)]
pub struct JdlApplication {
    /// Generator options, defaults included, in `.yo-rc.json` key order.
    pub config: Map<String, Value>,
    pub entity_names: IndexSet<String>,
    /// Options declared inside the application block.
    pub options: JdlOptions,
}

impl JdlApplication {
    /// Builds an application, filling every absent option with the default
    /// for its application type.
    pub fn new(config: Map<String, Value>) -> Self {
        let mut app = Self {
            config,
            entity_names: IndexSet::new(),
            options: JdlOptions::new(),
        };
        app.fill_defaults();
        app
    }

    pub fn with_entities<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entity_names.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn config_str(&self, key: &str) -> Option<&str> {
        self.config.get(key).and_then(Value::as_str)
    }

    pub fn config_bool(&self, key: &str) -> Option<bool> {
        match self.config.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn base_name(&self) -> Option<&str> {
        self.config_str("baseName")
    }

    /// Base name for messages, even when it's missing.
    pub fn display_name(&self) -> &str {
        self.base_name().unwrap_or("<unnamed>")
    }

    pub fn application_type(&self) -> Option<ApplicationType> {
        self.config_str("applicationType")
            .and_then(ApplicationType::from_str)
    }

    pub fn database_type(&self) -> Option<DatabaseType> {
        self.config_str("databaseType").and_then(DatabaseType::from_str)
    }

    pub fn skip_user_management(&self) -> bool {
        self.config_bool("skipUserManagement").unwrap_or(false)
    }

    pub fn has_entity(&self, name: &str) -> bool {
        self.entity_names.contains(name)
    }

    fn fill_defaults(&mut self) {
        let app_type = self.application_type().unwrap_or_default();
        let database = self.database_type().unwrap_or_default();
        let service_oriented = app_type != ApplicationType::Monolith;

        let package_name = self
            .config_str("packageName")
            .unwrap_or("com.mycompany.myapp")
            .to_string();

        let defaults = [
            ("applicationType", json!(app_type.as_str())),
            (
                "authenticationType",
                json!(if app_type == ApplicationType::Uaa { "uaa" } else { "jwt" }),
            ),
            ("buildTool", json!("maven")),
            (
                "cacheProvider",
                json!(if service_oriented { "hazelcast" } else { "ehcache" }),
            ),
            ("clientFramework", json!("angularX")),
            ("clientPackageManager", json!("npm")),
            ("databaseType", json!(database.as_str())),
            ("devDatabaseType", json!(database.default_dev_database())),
            ("prodDatabaseType", json!(database.default_prod_database())),
            ("enableHibernateCache", json!(database.is_sql())),
            ("enableSwaggerCodegen", json!(false)),
            ("enableTranslation", json!(true)),
            ("entitySuffix", json!("")),
            ("dtoSuffix", json!("DTO")),
            ("jhiPrefix", json!("jhi")),
            ("languages", json!(["en"])),
            ("messageBroker", json!(false)),
            ("nativeLanguage", json!("en")),
            ("packageName", json!(package_name)),
            ("packageFolder", json!(package_name.replace('.', "/"))),
            ("searchEngine", json!(false)),
            ("serverPort", json!(app_type.default_port())),
            (
                "serviceDiscoveryType",
                if service_oriented { json!("eureka") } else { json!(false) },
            ),
            (
                "skipClient",
                json!(matches!(
                    app_type,
                    ApplicationType::Microservice | ApplicationType::Uaa
                )),
            ),
            ("skipServer", json!(false)),
            (
                "skipUserManagement",
                json!(app_type == ApplicationType::Microservice),
            ),
            ("testFrameworks", json!([])),
            ("useSass", json!(true)),
            ("websocket", json!(false)),
        ];

        for (key, value) in defaults {
            self.config.entry(key).or_insert(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_monolith_defaults() {
        let app = JdlApplication::new(config(&[("baseName", json!("shop"))]));
        assert_eq!(app.base_name(), Some("shop"));
        assert_eq!(app.application_type(), Some(ApplicationType::Monolith));
        assert_eq!(app.database_type(), Some(DatabaseType::Sql));
        assert_eq!(app.config_str("cacheProvider"), Some("ehcache"));
        assert_eq!(app.config["serverPort"], json!(8080));
        assert_eq!(app.config["packageFolder"], json!("com/mycompany/myapp"));
        assert!(!app.skip_user_management());
    }

    #[test]
    fn test_microservice_defaults() {
        let app = JdlApplication::new(config(&[
            ("baseName", json!("invoice")),
            ("applicationType", json!("microservice")),
            ("databaseType", json!("mongodb")),
            ("packageName", json!("com.acme.invoice")),
        ]));
        assert_eq!(app.config["serverPort"], json!(8081));
        assert_eq!(app.config["skipClient"], json!(true));
        assert_eq!(app.config_str("prodDatabaseType"), Some("mongodb"));
        assert_eq!(app.config_str("packageFolder"), Some("com/acme/invoice"));
        assert_eq!(app.config_str("serviceDiscoveryType"), Some("eureka"));
        assert!(app.skip_user_management());
    }

    #[test]
    fn test_explicit_values_win() {
        let app = JdlApplication::new(config(&[
            ("baseName", json!("gw")),
            ("applicationType", json!("gateway")),
            ("serverPort", json!(9000)),
            ("skipUserManagement", json!("true")),
        ]));
        assert_eq!(app.config["serverPort"], json!(9000));
        assert!(app.skip_user_management());
    }
}
