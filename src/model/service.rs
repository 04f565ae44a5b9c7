use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::deployment::{DeploymentMethod, DeploymentSettings};
use crate::model::resource::ResourceKind;

/// Represents a single service and its configuration, either as declared
/// in the environment config or as scraped from the cluster.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Service {
    pub name: String,
    pub external_url: Vec<String>,
    pub backend: String,
    pub backend_port: u16,
    pub ports: Vec<u16>,
    pub ssl: bool,
    pub version: String,
    pub application: String,
    pub replicas: i32,
    pub deployment: Option<DeploymentSettings>,
    pub hpa: HorizontalPodAutoscaler,
    pub requests: ContainerResources,
    pub limits: ContainerResources,
    pub health_check: Option<HealthCheck>,
    pub liveness_probe: Option<Probe>,
    pub readiness_probe: Option<Probe>,
    #[serde(rename = "env")]
    pub env_vars: Vec<EnvVar>,
    pub commands: Vec<String>,
    pub annotations: BTreeMap<String, String>,
    pub volumes: Vec<Volume>,
    #[serde(rename = "type")]
    pub kind: ServiceKind,
    /// Cluster-observed only; meaningless on a desired service.
    pub status: ServiceStatus,
}

/// Plain workload, or a service backed by a custom resource (database,
/// helm chart, queue ...) named by its `type`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum ServiceKind {
    Workload,
    ExternalResource(String),
}

impl Default for ServiceKind {
    fn default() -> Self {
        ServiceKind::Workload
    }
}

impl From<Option<String>> for ServiceKind {
    fn from(type_name: Option<String>) -> Self {
        match type_name {
            Some(type_name) if !type_name.is_empty() => ServiceKind::ExternalResource(type_name),
            _ => ServiceKind::Workload,
        }
    }
}

impl From<ServiceKind> for Option<String> {
    fn from(kind: ServiceKind) -> Self {
        match kind {
            ServiceKind::Workload => None,
            ServiceKind::ExternalResource(type_name) => Some(type_name),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct ServiceStatus {
    pub deployed_at: Option<DateTime<Utc>>,
    pub available_replicas: i32,
    pub desired_replicas: i32,
    pub current_replicas: i32,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct HorizontalPodAutoscaler {
    pub min_replicas: i32,
    pub max_replicas: i32,
    pub metric: Metric,
}

impl HorizontalPodAutoscaler {
    pub fn is_active(&self) -> bool {
        self.min_replicas != 0
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Metric {
    pub name: String,
    pub target_average_value: String,
    pub target_average_utilization: i32,
}

/// CPU and memory quantities, kept in their textual form.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct ContainerResources {
    pub cpu: String,
    pub memory: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct HealthCheck {
    pub command: Vec<String>,
    pub initial_delay: i32,
    pub timeout: i32,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Probe {
    pub exec: Option<ExecAction>,
    pub http_get: Option<HttpGetAction>,
    pub tcp_socket: Option<TcpSocketAction>,
    pub initial_delay_seconds: i32,
    pub timeout_seconds: i32,
    pub period_seconds: i32,
    pub success_threshold: i32,
    pub failure_threshold: i32,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct ExecAction {
    pub command: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct HttpGetAction {
    pub path: String,
    pub port: i32,
    pub host: String,
    pub scheme: String,
    pub http_headers: Vec<HttpHeader>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct HttpHeader {
    pub name: String,
    pub value: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct TcpSocketAction {
    pub port: i32,
    pub host: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
    pub secret: String,
    pub pod_field: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Volume {
    pub name: String,
    pub path: String,
    pub modes: String,
    pub size: String,
    #[serde(rename = "type")]
    pub volume_type: String,
}

impl Volume {
    pub fn is_secret_volume(&self) -> bool {
        self.volume_type.eq_ignore_ascii_case("secret")
    }

    pub fn is_config_map_volume(&self) -> bool {
        self.volume_type.eq_ignore_ascii_case("configmap")
    }

    /// Backed by a persistent volume claim owned by the service.
    pub fn is_claim(&self) -> bool {
        !self.is_secret_volume() && !self.is_config_map_volume()
    }
}

impl Service {
    pub fn new(name: &str) -> Self {
        Service {
            name: name.to_owned(),
            ..Service::default()
        }
    }

    pub fn has_external_url(&self) -> bool {
        !self.external_url.is_empty()
    }

    pub fn is_tls_enabled(&self) -> bool {
        self.ssl
    }

    pub fn deployment_method(&self) -> DeploymentMethod {
        self.deployment
            .as_ref()
            .map(|deployment| deployment.method)
            .unwrap_or_default()
    }
}

/// Shared view over anything the operator deploys into the cluster.
pub trait Deployable {
    fn name(&self) -> &str;

    /// Only versioned services are ever deployed.
    fn is_deployable(&self) -> bool;

    /// Cluster objects created on behalf of this service, as (kind, name).
    fn owned_resources(&self) -> Vec<(ResourceKind, String)>;
}

impl Deployable for Service {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_deployable(&self) -> bool {
        !self.version.is_empty()
    }

    fn owned_resources(&self) -> Vec<(ResourceKind, String)> {
        // a deployment may survive a workload being converted to a typed service
        let mut owned = vec![
            (ResourceKind::Ingress, self.name.clone()),
            (ResourceKind::Deployment, self.name.clone()),
            (ResourceKind::Service, self.name.clone()),
            (ResourceKind::HorizontalPodAutoscaler, self.name.clone()),
        ];
        owned.extend(
            self.volumes
                .iter()
                .filter(|volume| volume.is_claim())
                .map(|volume| (ResourceKind::PersistentVolumeClaim, volume.name.clone())),
        );
        if let ServiceKind::ExternalResource(type_name) = &self.kind {
            owned.push((ResourceKind::CustomResource(type_name.clone()), self.name.clone()));
        }
        owned
    }
}

/// Services of an environment, looked up by name.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct Services(Vec<Service>);

impl Services {
    pub fn new(services: Vec<Service>) -> Self {
        Services(services)
    }

    /// Reference into the backing store, not a copy.
    pub fn find_by_name(&self, name: &str) -> Option<&Service> {
        self.0.iter().find(|service| service.name == name)
    }

    pub fn find_by_name_mut(&mut self, name: &str) -> Option<&mut Service> {
        self.0.iter_mut().find(|service| service.name == name)
    }

    pub fn push(&mut self, service: Service) {
        self.0.push(service)
    }

    pub fn sort_by_name(&mut self) {
        self.0.sort_by(|a, b| a.name.cmp(&b.name))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Service> {
        self.0.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|service| service.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Services {
    type Item = &'a Service;
    type IntoIter = std::slice::Iter<'a, Service>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Service> for Services {
    fn from_iter<I: IntoIterator<Item = Service>>(iter: I) -> Self {
        Services(iter.into_iter().collect())
    }
}
