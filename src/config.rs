//! Settings of one import.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::database::DatabaseType;
use crate::model::ApplicationType;

pub const YO_RC_FILE: &str = ".yo-rc.json";
pub const GENERATOR_KEY: &str = "generator-jhipster";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not valid JSON: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unknown database type '{0}'")]
    UnknownDatabase(String),
    #[error("Unknown application type '{0}'")]
    UnknownApplicationType(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportConfig {
    /// Base name of the application entities are imported into.
    pub application_name: Option<String>,
    pub application_type: ApplicationType,
    /// Database used when the JDL declares no application.
    pub database_type: DatabaseType,
    pub generator_version: Option<String>,
    pub skip_user_management: bool,
    /// Skip the mirrored entry of relationships without an injected field on
    /// their destination side.
    pub unidirectional_relationships: bool,
    /// Export entities even when identical to what is on disk.
    pub force_no_filtering: bool,
    /// Base of new changelog dates; "now" when unset.
    pub creation_timestamp: Option<DateTime<Utc>>,
    pub output_dir: PathBuf,
    /// Convert without writing anything.
    pub json_only: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            application_name: None,
            application_type: ApplicationType::Monolith,
            database_type: DatabaseType::Sql,
            generator_version: None,
            skip_user_management: false,
            unidirectional_relationships: false,
            force_no_filtering: false,
            creation_timestamp: None,
            output_dir: PathBuf::from("."),
            json_only: false,
        }
    }
}

impl ImportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = Some(name.into());
        self
    }

    pub fn with_application_type(mut self, application_type: ApplicationType) -> Self {
        self.application_type = application_type;
        self
    }

    pub fn with_database_type(mut self, database_type: DatabaseType) -> Self {
        self.database_type = database_type;
        self
    }

    pub fn with_generator_version(mut self, version: impl Into<String>) -> Self {
        self.generator_version = Some(version.into());
        self
    }

    pub fn with_skip_user_management(mut self, skip: bool) -> Self {
        self.skip_user_management = skip;
        self
    }

    pub fn with_unidirectional_relationships(mut self, unidirectional: bool) -> Self {
        self.unidirectional_relationships = unidirectional;
        self
    }

    pub fn with_force_no_filtering(mut self, force: bool) -> Self {
        self.force_no_filtering = force;
        self
    }

    pub fn with_creation_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.creation_timestamp = Some(timestamp);
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_json_only(mut self, json_only: bool) -> Self {
        self.json_only = json_only;
        self
    }

    /// Settings of the application generated in `dir`, read from its
    /// `.yo-rc.json`. Defaults are used when there is no such file.
    pub fn from_yo_rc(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        let config = Self::default().with_output_dir(dir);
        let path = dir.join(YO_RC_FILE);
        if !path.is_file() {
            return Ok(config);
        }

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let value: Value =
            serde_json::from_str(&content).map_err(|source| ConfigError::Json { path, source })?;
        config.merge_generator_block(value.get(GENERATOR_KEY))
    }

    fn merge_generator_block(mut self, block: Option<&Value>) -> Result<Self, ConfigError> {
        let Some(block) = block else {
            return Ok(self);
        };
        let text = |key: &str| block.get(key).and_then(Value::as_str);

        if let Some(name) = text("baseName") {
            self.application_name = Some(name.to_string());
        }
        if let Some(app_type) = text("applicationType") {
            self.application_type = ApplicationType::from_str(app_type)
                .ok_or_else(|| ConfigError::UnknownApplicationType(app_type.to_string()))?;
        }
        if let Some(db) = text("databaseType") {
            self.database_type = DatabaseType::from_str(db)
                .ok_or_else(|| ConfigError::UnknownDatabase(db.to_string()))?;
        }
        if let Some(version) = text("jhipsterVersion") {
            self.generator_version = Some(version.to_string());
        }
        if let Some(skip) = block.get("skipUserManagement").and_then(Value::as_bool) {
            self.skip_user_management = skip;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_yo_rc_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = ImportConfig::from_yo_rc(dir.path()).unwrap();
        assert_eq!(config.output_dir, dir.path());
        assert_eq!(config.database_type, DatabaseType::Sql);
    }

    #[test]
    fn test_from_yo_rc() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(YO_RC_FILE),
            r#"{
              "generator-jhipster": {
                "baseName": "store",
                "applicationType": "microservice",
                "databaseType": "mongodb",
                "skipUserManagement": true,
                "jhipsterVersion": "6.10.5"
              }
            }"#,
        )
        .unwrap();

        let config = ImportConfig::from_yo_rc(dir.path()).unwrap();
        assert_eq!(config.application_name.as_deref(), Some("store"));
        assert_eq!(config.application_type, ApplicationType::Microservice);
        assert_eq!(config.database_type, DatabaseType::MongoDb);
        assert_eq!(config.generator_version.as_deref(), Some("6.10.5"));
        assert!(config.skip_user_management);
    }

    #[test]
    fn test_from_yo_rc_rejects_unknown_database() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(YO_RC_FILE),
            r#"{ "generator-jhipster": { "databaseType": "oracle" } }"#,
        )
        .unwrap();
        let err = ImportConfig::from_yo_rc(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownDatabase(db) if db == "oracle"));
    }
}
