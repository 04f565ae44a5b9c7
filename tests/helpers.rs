#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use environment_operator::model::{Environment, ResourceKind, Service};
use environment_operator::{ConfigLoader, EnvironmentLoader, Error, ResourceClient, ServiceApplier};

pub const NAMESPACE: &str = "sample-app-dev";

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// Parse an environment from a YAML string
pub fn environment(yaml: &str) -> Environment {
    serde_yaml::from_str(yaml).expect("Unable to parse environment yaml")
}

// Get one of the repo's fixture environments from `tests/fixtures`
pub fn example_environment(name: &str) -> Environment {
    let config_str = std::fs::read_to_string(format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name))
        .expect("Failed to read fixture file");
    environment(&config_str)
}

pub fn api_error(code: u16, reason: &str) -> Error {
    Error::KubeError(kube::Error::Api(kube::error::ErrorResponse {
        status: "Failure".to_string(),
        message: format!("simulated {}", reason),
        reason: reason.to_string(),
        code,
    }))
}

#[derive(Default)]
struct State {
    desired: Environment,
    observed: Environment,
    existing: HashSet<(ResourceKind, String)>,
    failing_kinds: HashSet<ResourceKind>,
    failing_applies: HashSet<String>,
    fail_desired_load: bool,
    fail_observed_load: bool,
    deleted: Vec<(ResourceKind, String)>,
    applied: Vec<String>,
}

/// In-memory stand-in for the cluster and the config repository.
///
/// Deletions always succeed unless their kind was marked failing, and are
/// recorded in order. `exists` only answers for objects registered with
/// `with_existing` and not deleted since.
#[derive(Default)]
pub struct FakeCluster {
    state: Mutex<State>,
}

impl FakeCluster {
    pub fn new(desired: Environment, observed: Environment) -> Self {
        let cluster = FakeCluster::default();
        {
            let mut state = cluster.state.lock().unwrap();
            state.desired = desired;
            state.observed = observed;
        }
        cluster
    }

    pub fn observing(observed: Environment) -> Self {
        FakeCluster::new(Environment::default(), observed)
    }

    pub fn with_existing(self, kind: ResourceKind, name: &str) -> Self {
        self.state.lock().unwrap().existing.insert((kind, name.to_string()));
        self
    }

    pub fn failing_deletes_of(self, kind: ResourceKind) -> Self {
        self.state.lock().unwrap().failing_kinds.insert(kind);
        self
    }

    pub fn failing_apply_of(self, name: &str) -> Self {
        self.state.lock().unwrap().failing_applies.insert(name.to_string());
        self
    }

    pub fn failing_desired_load(self) -> Self {
        self.state.lock().unwrap().fail_desired_load = true;
        self
    }

    pub fn failing_observed_load(self) -> Self {
        self.state.lock().unwrap().fail_observed_load = true;
        self
    }

    pub fn deleted(&self) -> Vec<(ResourceKind, String)> {
        self.state.lock().unwrap().deleted.clone()
    }

    pub fn deleted_names(&self) -> HashSet<String> {
        self.deleted().into_iter().map(|(_, name)| name).collect()
    }

    pub fn was_deleted(&self, kind: ResourceKind, name: &str) -> bool {
        self.deleted().contains(&(kind, name.to_string()))
    }

    pub fn applied(&self) -> Vec<String> {
        self.state.lock().unwrap().applied.clone()
    }
}

#[async_trait]
impl EnvironmentLoader for FakeCluster {
    async fn load_environment(&self, namespace: &str) -> Result<Environment, Error> {
        let state = self.state.lock().unwrap();
        if state.fail_observed_load {
            return Err(api_error(500, "InternalError"));
        }
        let mut observed = state.observed.clone();
        observed.namespace = namespace.to_string();
        Ok(observed)
    }
}

#[async_trait]
impl ConfigLoader for FakeCluster {
    async fn load_desired(&self) -> Result<Environment, Error> {
        let state = self.state.lock().unwrap();
        if state.fail_desired_load {
            return Err(Error::Configuration("environment config is not valid yaml".to_string()));
        }
        Ok(state.desired.clone())
    }
}

#[async_trait]
impl ResourceClient for FakeCluster {
    async fn exists(&self, kind: &ResourceKind, name: &str, _namespace: &str) -> Result<bool, Error> {
        let state = self.state.lock().unwrap();
        Ok(state.existing.contains(&(kind.clone(), name.to_string())))
    }

    async fn delete(&self, kind: &ResourceKind, name: &str, _namespace: &str) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap();
        if state.failing_kinds.contains(kind) {
            return Err(api_error(403, "Forbidden"));
        }
        state.existing.remove(&(kind.clone(), name.to_string()));
        state.deleted.push((kind.clone(), name.to_string()));
        Ok(())
    }
}

#[async_trait]
impl ServiceApplier for FakeCluster {
    async fn apply_service(&self, _environment: &Environment, service: &Service) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap();
        if state.failing_applies.contains(&service.name) {
            return Err(Error::Apply {
                name: service.name.clone(),
                reason: "admission webhook denied the request".to_string(),
            });
        }
        state.applied.push(service.name.clone());
        Ok(())
    }
}
