use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::config::GENERATOR_KEY;
use crate::model::{JdlApplication, JdlDeployment, JdlObject};

/// `.yo-rc.json` content of an application: its generator options and the
/// names of its entities.
pub fn application_config(app: &JdlApplication) -> Value {
    let mut content = Map::new();
    content.insert(GENERATOR_KEY.to_string(), Value::Object(app.config.clone()));
    content.insert(
        "entities".to_string(),
        app.entity_names.iter().cloned().map(Value::String).collect(),
    );
    Value::Object(content)
}

/// Keyed by base name.
pub fn convert_applications(object: &JdlObject) -> IndexMap<String, Value> {
    object
        .applications
        .iter()
        .map(|(name, app)| (name.clone(), application_config(app)))
        .collect()
}

pub fn deployment_config(deployment: &JdlDeployment) -> Value {
    let mut content = Map::new();
    content.insert(
        GENERATOR_KEY.to_string(),
        Value::Object(deployment.config.clone()),
    );
    Value::Object(content)
}

/// Keyed by deployment type.
pub fn convert_deployments(object: &JdlObject) -> IndexMap<String, Value> {
    object
        .deployments
        .iter()
        .map(|(kind, deployment)| (kind.clone(), deployment_config(deployment)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_application_config() {
        let mut config = Map::new();
        config.insert("baseName".into(), json!("store"));
        let app = JdlApplication::new(config).with_entities(["A", "B"]);
        let value = application_config(&app);
        assert_eq!(value[GENERATOR_KEY]["baseName"], json!("store"));
        assert_eq!(value[GENERATOR_KEY]["applicationType"], json!("monolith"));
        assert_eq!(value["entities"], json!(["A", "B"]));
    }

    #[test]
    fn test_deployment_config() {
        let mut config = Map::new();
        config.insert("deploymentType".into(), json!("docker-compose"));
        config.insert("appsFolders".into(), json!(["store"]));
        let mut object = JdlObject::new();
        object.add_deployment(JdlDeployment::new(config));
        let deployments = convert_deployments(&object);
        let block = &deployments["docker-compose"][GENERATOR_KEY];
        assert_eq!(block["deploymentType"], json!("docker-compose"));
        assert_eq!(block["appsFolders"], json!(["store"]));
        assert_eq!(block["gatewayType"], json!("zuul"));
    }
}
