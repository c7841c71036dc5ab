use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::Value;

use super::ExportError;
use super::applications::write_yo_rc;
use super::store::ensure_folder;

/// Writes `<root>/<deploymentType>/.yo-rc.json` for each deployment.
pub fn export_deployments(
    root: &Path,
    configs: &IndexMap<String, Value>,
) -> Result<Vec<PathBuf>, ExportError> {
    let mut written = Vec::new();
    for (deployment_type, config) in configs {
        let dir = root.join(deployment_type);
        ensure_folder(&dir, deployment_type)?;
        written.push(write_yo_rc(&dir, config)?);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::YO_RC_FILE;
    use serde_json::json;

    #[test]
    fn test_export_deployments() {
        let dir = tempfile::tempdir().unwrap();
        let mut configs = IndexMap::new();
        configs.insert(
            "kubernetes".to_string(),
            json!({ "generator-jhipster": { "deploymentType": "kubernetes" } }),
        );
        let written = export_deployments(dir.path(), &configs).unwrap();
        assert_eq!(written, vec![dir.path().join("kubernetes").join(YO_RC_FILE)]);
    }
}
