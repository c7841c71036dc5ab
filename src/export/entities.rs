use std::path::{Path, PathBuf};

use super::ExportError;
use super::store::{entity_path, write_json};
use crate::json::EntityJson;

/// Writes `<dir>/.jhipster/<Name>.json` for each entity and returns the
/// written paths.
pub fn export_entities<'a>(
    dir: &Path,
    entities: impl IntoIterator<Item = &'a EntityJson>,
) -> Result<Vec<PathBuf>, ExportError> {
    let mut written = Vec::new();
    for entity in entities {
        let path = entity_path(dir, &entity.name);
        write_json(&path, &entity.to_value()?)?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::EntityOptions;
    use crate::export::{DiskState, FsState};

    #[test]
    fn test_export_entities() {
        let dir = tempfile::tempdir().unwrap();
        let entity = EntityJson {
            name: "Foo".to_string(),
            javadoc: None,
            fields: Vec::new(),
            relationships: Vec::new(),
            changelog_date: "20220101000100".to_string(),
            entity_table_name: "foo".to_string(),
            options: EntityOptions::default(),
        };
        let written = export_entities(dir.path(), [&entity]).unwrap();
        assert_eq!(written, vec![dir.path().join(".jhipster").join("Foo.json")]);

        let on_disk = FsState::new(dir.path()).entity_json("Foo").unwrap().unwrap();
        assert_eq!(on_disk, entity.to_value().unwrap());
        let back: EntityJson = serde_json::from_value(on_disk).unwrap();
        assert_eq!(back, entity);
    }
}
