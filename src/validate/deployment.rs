use super::{Context, ValidationError};
use crate::model::JdlDeployment;
use crate::model::deployment::DEPLOYMENT_TYPES;

const MONITORING: &[&str] = &["no", "elk", "prometheus"];
const SERVICE_DISCOVERY: &[&str] = &["eureka", "consul", "no"];
const GATEWAY_TYPES: &[&str] = &["zuul", "traefik"];
const KUBERNETES_SERVICE_TYPES: &[&str] = &["LoadBalancer", "NodePort", "Ingress"];
const STORAGE_TYPES: &[&str] = &["ephemeral", "persistent"];

pub(super) fn check(ctx: &Context) -> Result<(), ValidationError> {
    for deployment in ctx.object.deployments.values() {
        check_deployment(deployment)?;
    }
    Ok(())
}

fn check_deployment(deployment: &JdlDeployment) -> Result<(), ValidationError> {
    let deployment_type = deployment.deployment_type().unwrap_or_default();
    if !DEPLOYMENT_TYPES.contains(&deployment_type) {
        return Err(ValidationError::Deployment(format!(
            "The deployment type '{}' is not valid, it must be one of {}.",
            deployment_type,
            DEPLOYMENT_TYPES.join(", ")
        )));
    }

    if deployment.apps_folders().is_empty() {
        return Err(ValidationError::Deployment(format!(
            "The {} deployment must list the folders of its applications in appsFolders.",
            deployment_type
        )));
    }

    let checks: [(&str, &[&str]); 5] = [
        ("monitoring", MONITORING),
        ("serviceDiscoveryType", SERVICE_DISCOVERY),
        ("gatewayType", GATEWAY_TYPES),
        ("kubernetesServiceType", KUBERNETES_SERVICE_TYPES),
        ("storageType", STORAGE_TYPES),
    ];
    for (option, legal) in checks {
        if let Some(value) = deployment.config_str(option) {
            if !legal.contains(&value) {
                return Err(ValidationError::Deployment(format!(
                    "The value '{}' is not valid for the option '{}' of the {} deployment.",
                    value, option, deployment_type
                )));
            }
        }
    }

    let needs_registry = deployment_type == "kubernetes" || deployment_type == "openshift";
    if needs_registry
        && deployment
            .config_str("dockerRepositoryName")
            .is_none_or(str::is_empty)
    {
        return Err(ValidationError::Deployment(format!(
            "The {} deployment requires a dockerRepositoryName.",
            deployment_type
        )));
    }

    if deployment.config_str("kubernetesServiceType") == Some("Ingress")
        && deployment.config_str("ingressDomain").is_none_or(str::is_empty)
    {
        return Err(ValidationError::Deployment(
            "An Ingress kubernetesServiceType requires an ingressDomain.".to_string(),
        ));
    }
    Ok(())
}
