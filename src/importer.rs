//! End-to-end import: read, convert, validate, project to JSON and export.
//!
//! Every call builds its own state; nothing survives between two imports
//! made with the same [`JdlImporter`].

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::ast::Document;
use crate::config::ImportConfig;
use crate::convert::convert;
use crate::error::JdlError;
use crate::export::applications::application_dir;
use crate::export::{
    DiskState, FsState, export_applications, export_deployments, export_entities,
};
use crate::json::{
    EntityJson, convert_applications, convert_deployments, convert_entities, filter_unchanged,
};
use crate::logger::Logger;
use crate::model::JdlObject;
use crate::reader;
use crate::validate::{ValidationSettings, Warnings, check_for_errors};

/// Outcome of an import.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportState {
    /// Entities exported by this import, unchanged ones excluded.
    pub entities: IndexMap<String, EntityJson>,
    pub applications: IndexMap<String, Value>,
    pub deployments: IndexMap<String, Value>,
    pub warnings: Warnings,
    /// Files written, empty for a JSON-only import.
    pub written: Vec<PathBuf>,
}

pub struct JdlImporter<'a> {
    config: ImportConfig,
    logger: &'a dyn Logger,
}

impl<'a> JdlImporter<'a> {
    pub fn new(config: ImportConfig, logger: &'a dyn Logger) -> Self {
        Self { config, logger }
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    pub fn import_files<P: AsRef<Path>>(&self, paths: &[P]) -> Result<ImportState, JdlError> {
        let document = reader::parse_files(paths)?;
        self.import_document(&document)
    }

    pub fn import_content(&self, content: &str) -> Result<ImportState, JdlError> {
        let document = reader::parse_content(content)?;
        self.import_document(&document)
    }

    /// Imports against what previous imports left in the output folder.
    pub fn import_document(&self, document: &Document) -> Result<ImportState, JdlError> {
        let object = convert(document, &self.config, self.logger);
        let state = self.disk_state(&object);
        self.import_object(&object, &state)
    }

    /// Imports against an explicit on-disk state.
    pub fn import_object(
        &self,
        object: &JdlObject,
        state: &dyn DiskState,
    ) -> Result<ImportState, JdlError> {
        let warnings =
            check_for_errors(object, ValidationSettings::from(&self.config), self.logger)?;

        let mut entities = convert_entities(object, &self.config, state, self.logger)?;
        if !self.config.force_no_filtering {
            entities = filter_unchanged(entities, state)?;
        }

        let mut import = ImportState {
            entities,
            applications: convert_applications(object),
            deployments: convert_deployments(object),
            warnings,
            written: Vec::new(),
        };
        if !self.config.json_only {
            import.written = self.export(object, &import)?;
        }
        debug!(
            entities = import.entities.len(),
            applications = import.applications.len(),
            deployments = import.deployments.len(),
            written = import.written.len(),
            "import done"
        );
        Ok(import)
    }

    fn disk_state(&self, object: &JdlObject) -> FsState {
        let root = &self.config.output_dir;
        let mut state = FsState::new(root);
        if object.applications.len() > 1 {
            for name in object.applications.keys() {
                state = state.with_dir(application_dir(root, name, false));
            }
        }
        state
    }

    fn export(&self, object: &JdlObject, import: &ImportState) -> Result<Vec<PathBuf>, JdlError> {
        let root = &self.config.output_dir;
        let mut written = export_applications(root, &import.applications)?;

        if object.applications.len() > 1 {
            for (name, app) in &object.applications {
                let dir = application_dir(root, name, false);
                let owned = import
                    .entities
                    .values()
                    .filter(|entity| app.has_entity(&entity.name));
                written.extend(export_entities(&dir, owned)?);
            }
            let unowned = import
                .entities
                .values()
                .filter(|entity| object.applications_of(&entity.name).is_empty());
            written.extend(export_entities(root, unowned)?);
        } else {
            written.extend(export_entities(root, import.entities.values())?);
        }

        written.extend(export_deployments(root, &import.deployments)?);
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::NoDiskState;
    use crate::logger::RecordingLogger;
    use crate::validate::ValidationError;

    #[test]
    fn test_json_only_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let logger = RecordingLogger::new();
        let config = ImportConfig::default()
            .with_output_dir(dir.path())
            .with_json_only(true);
        let import = JdlImporter::new(config, &logger)
            .import_content("entity A { name String }")
            .unwrap();
        assert_eq!(import.entities.len(), 1);
        assert!(import.written.is_empty());
        assert!(!dir.path().join(".jhipster").exists());
    }

    #[test]
    fn test_validation_failure_exports_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let logger = RecordingLogger::new();
        let config = ImportConfig::default().with_output_dir(dir.path());
        let err = JdlImporter::new(config, &logger)
            .import_content("entity A { count Long pattern(/a/) }")
            .unwrap_err();
        assert!(matches!(err, JdlError::Validation(ValidationError::Validation(_))));
        assert!(!dir.path().join(".jhipster").exists());
    }

    #[test]
    fn test_import_object_with_explicit_state() {
        let logger = RecordingLogger::new();
        let config = ImportConfig::default().with_json_only(true);
        let importer = JdlImporter::new(config, &logger);
        let document = reader::parse_content("entity A\nentity B").unwrap();
        let object = convert(&document, importer.config(), &logger);
        let import = importer.import_object(&object, &NoDiskState).unwrap();
        assert_eq!(import.entities.keys().collect::<Vec<_>>(), ["A", "B"]);
    }

    #[test]
    fn test_reserved_field_name_is_a_warning() {
        let logger = RecordingLogger::new();
        let config = ImportConfig::default().with_json_only(true);
        let import = JdlImporter::new(config, &logger)
            .import_content("entity A { class String }")
            .unwrap();
        assert!(import.warnings.mentions("jhiPrefix"));
        assert!(!logger.warnings().is_empty());
    }
}
