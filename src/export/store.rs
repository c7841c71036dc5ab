//! Reading and writing JSON artifacts.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use super::ExportError;

/// Folder holding the entity JSON files of an application.
pub const ENTITY_FOLDER: &str = ".jhipster";

/// What previous imports left on disk.
pub trait DiskState {
    /// The JSON previously exported for `entity`, if any.
    fn entity_json(&self, entity: &str) -> Result<Option<Value>, ExportError>;
}

/// Nothing on disk; every entity is new.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDiskState;

impl DiskState for NoDiskState {
    fn entity_json(&self, _entity: &str) -> Result<Option<Value>, ExportError> {
        Ok(None)
    }
}

/// Entity files found under a list of application folders, searched in order.
#[derive(Debug, Clone)]
pub struct FsState {
    dirs: Vec<PathBuf>,
}

impl FsState {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            dirs: vec![root.into()],
        }
    }

    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dirs.push(dir.into());
        self
    }
}

impl DiskState for FsState {
    fn entity_json(&self, entity: &str) -> Result<Option<Value>, ExportError> {
        for dir in &self.dirs {
            let path = entity_path(dir, entity);
            if path.is_file() {
                return read_json(&path).map(Some);
            }
        }
        Ok(None)
    }
}

/// In-memory state keyed by entity name.
impl DiskState for IndexMap<String, Value> {
    fn entity_json(&self, entity: &str) -> Result<Option<Value>, ExportError> {
        Ok(self.get(entity).cloned())
    }
}

pub fn entity_path(dir: &Path, entity: &str) -> PathBuf {
    dir.join(ENTITY_FOLDER).join(format!("{entity}.json"))
}

pub fn read_json(path: &Path) -> Result<Value, ExportError> {
    let content = fs::read_to_string(path).map_err(|source| ExportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ExportError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Pretty-printed with a trailing newline; parent folders are created.
pub fn write_json(path: &Path, value: &Value) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ExportError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');
    fs::write(path, content).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "wrote JSON file");
    Ok(())
}

/// Makes sure `dir` can hold the files of `name`: a plain file in its place
/// is fatal.
pub fn ensure_folder(dir: &Path, name: &str) -> Result<(), ExportError> {
    if dir.exists() && !dir.is_dir() {
        return Err(ExportError::FolderCollision {
            path: dir.to_path_buf(),
            name: name.to_string(),
        });
    }
    fs::create_dir_all(dir).map_err(|source| ExportError::Write {
        path: dir.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = entity_path(dir.path(), "Foo");
        write_json(&path, &json!({ "name": "Foo" })).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "{\n  \"name\": \"Foo\"\n}\n");
        let state = FsState::new(dir.path());
        assert_eq!(state.entity_json("Foo").unwrap(), Some(json!({ "name": "Foo" })));
        assert_eq!(state.entity_json("Bar").unwrap(), None);
    }

    #[test]
    fn test_state_searches_every_folder() {
        let dir = tempfile::tempdir().unwrap();
        let app = dir.path().join("store");
        write_json(&entity_path(&app, "Foo"), &json!({ "name": "Foo" })).unwrap();
        let state = FsState::new(dir.path()).with_dir(&app);
        assert!(state.entity_json("Foo").unwrap().is_some());
    }

    #[test]
    fn test_invalid_json_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = entity_path(dir.path(), "Foo");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ nope").unwrap();
        let err = FsState::new(dir.path()).entity_json("Foo").unwrap_err();
        assert!(matches!(err, ExportError::Parse { .. }));
        assert!(err.to_string().contains("Foo.json"));
    }

    #[test]
    fn test_folder_collision() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("store");
        fs::write(&blocker, "").unwrap();
        let err = ensure_folder(&blocker, "store").unwrap_err();
        assert!(matches!(err, ExportError::FolderCollision { .. }));
        assert!(ensure_folder(&dir.path().join("invoice"), "invoice").is_ok());
    }
}
