use serde_json::{Map, Value, json};

pub const DEPLOYMENT_TYPES: &[&str] = &["docker-compose", "kubernetes", "openshift"];

#[derive(Debug, Clone, PartialEq)]
pub struct JdlDeployment {
    pub config: Map<String, Value>,
}

impl JdlDeployment {
    pub fn new(config: Map<String, Value>) -> Self {
        let mut deployment = Self { config };
        deployment.fill_defaults();
        deployment
    }

    pub fn deployment_type(&self) -> Option<&str> {
        self.config_str("deploymentType")
    }

    pub fn config_str(&self, key: &str) -> Option<&str> {
        self.config.get(key).and_then(Value::as_str)
    }

    /// `appsFolders` as a list, whatever the way it was written.
    pub fn apps_folders(&self) -> Vec<String> {
        match self.config.get("appsFolders") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            Some(Value::String(s)) => s
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    fn fill_defaults(&mut self) {
        let mut defaults = vec![
            ("directoryPath", json!("../")),
            ("dockerPushCommand", json!("docker push")),
            ("monitoring", json!("no")),
            ("serviceDiscoveryType", json!("eureka")),
            ("clusteredDbApps", json!([])),
        ];
        match self.deployment_type() {
            Some("docker-compose") => defaults.push(("gatewayType", json!("zuul"))),
            Some("kubernetes") => defaults.extend([
                ("kubernetesNamespace", json!("default")),
                ("kubernetesServiceType", json!("LoadBalancer")),
                ("istio", json!(false)),
            ]),
            Some("openshift") => defaults.extend([
                ("openshiftNamespace", json!("default")),
                ("storageType", json!("ephemeral")),
            ]),
            _ => {}
        }
        for (key, value) in defaults {
            self.config.entry(key).or_insert(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kubernetes_defaults() {
        let mut config = Map::new();
        config.insert("deploymentType".into(), json!("kubernetes"));
        config.insert("appsFolders".into(), json!(["store", "invoice"]));
        let deployment = JdlDeployment::new(config);
        assert_eq!(deployment.config_str("kubernetesServiceType"), Some("LoadBalancer"));
        assert_eq!(deployment.config_str("directoryPath"), Some("../"));
        assert_eq!(deployment.apps_folders(), vec!["store", "invoice"]);
        assert!(deployment.config.get("gatewayType").is_none());
    }
}
