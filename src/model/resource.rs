use std::fmt;

/// Kinds of cluster objects the operator creates and may have to delete.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Ingress,
    ExternalSecret,
    Deployment,
    Service,
    HorizontalPodAutoscaler,
    PersistentVolumeClaim,
    /// CRD-backed external resource, carrying the service type (e.g. `mongo`).
    CustomResource(String),
    ConfigMap,
    Job,
    CronJob,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Ingress => f.write_str("ingress"),
            ResourceKind::ExternalSecret => f.write_str("externalsecret"),
            ResourceKind::Deployment => f.write_str("deployment"),
            ResourceKind::Service => f.write_str("service"),
            ResourceKind::HorizontalPodAutoscaler => f.write_str("hpa"),
            ResourceKind::PersistentVolumeClaim => f.write_str("pvc"),
            ResourceKind::CustomResource(type_name) => write!(f, "custom resource ({})", type_name),
            ResourceKind::ConfigMap => f.write_str("configmap"),
            ResourceKind::Job => f.write_str("job"),
            ResourceKind::CronJob => f.write_str("cronjob"),
        }
    }
}

/// API group/version serving the CRD for a given service type.
pub fn custom_resource_api_version(type_name: &str) -> &'static str {
    match type_name.to_lowercase().as_str() {
        "helmchart" => "helm.kubedex.com/v1",
        "serviceentry" => "networking.istio.io/v1alpha3",
        _ => "prsn.io/v1",
    }
}
