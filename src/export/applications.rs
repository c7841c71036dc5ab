use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::Value;

use super::ExportError;
use super::store::{ensure_folder, read_json, write_json};
use crate::config::{GENERATOR_KEY, YO_RC_FILE};

/// Folder of an application: the root itself when it is alone, a sub-folder
/// named after its base name otherwise.
pub fn application_dir(root: &Path, base_name: &str, alone: bool) -> PathBuf {
    if alone {
        root.to_path_buf()
    } else {
        root.join(base_name)
    }
}

/// Writes one `.yo-rc.json` per application, merged into the existing file.
pub fn export_applications(
    root: &Path,
    configs: &IndexMap<String, Value>,
) -> Result<Vec<PathBuf>, ExportError> {
    let alone = configs.len() == 1;
    let mut written = Vec::new();
    for (base_name, config) in configs {
        let dir = application_dir(root, base_name, alone);
        ensure_folder(&dir, base_name)?;
        written.push(write_yo_rc(&dir, config)?);
    }
    Ok(written)
}

/// Writes `<dir>/.yo-rc.json`, keeping what the existing file holds.
pub(super) fn write_yo_rc(dir: &Path, config: &Value) -> Result<PathBuf, ExportError> {
    let path = dir.join(YO_RC_FILE);
    let content = if path.is_file() {
        merge_yo_rc(read_json(&path)?, config)
    } else {
        config.clone()
    };
    write_json(&path, &content)?;
    Ok(path)
}

/// New keys win over existing ones, except inside the generator block which
/// is merged key by key.
pub fn merge_yo_rc(existing: Value, update: &Value) -> Value {
    let (Value::Object(mut merged), Value::Object(update)) = (existing, update) else {
        return update.clone();
    };
    for (key, value) in update {
        match (merged.get_mut(key), value) {
            (Some(Value::Object(block)), Value::Object(new_block)) if key == GENERATOR_KEY => {
                for (k, v) in new_block {
                    block.insert(k.clone(), v.clone());
                }
            }
            _ => {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    Value::Object(merged)
}
