//! Seams to the cluster and to the environment config.
//!
//! The reconciliation core never talks to the API server directly; it
//! goes through these traits so it can run against the real cluster
//! (`KubeResourceClient`) or in-memory fakes.

use async_trait::async_trait;

use crate::errors::Error;
use crate::model::{Environment, ResourceKind, Service};

pub mod kube_client;
pub use kube_client::KubeResourceClient;

/// Supplies the observed environment, scraped from live cluster objects.
#[async_trait]
pub trait EnvironmentLoader: Send + Sync {
    async fn load_environment(&self, namespace: &str) -> Result<Environment, Error>;
}

/// Supplies the desired environment from the environment config.
#[async_trait]
pub trait ConfigLoader: Send + Sync {
    async fn load_desired(&self) -> Result<Environment, Error>;
}

/// Existence checks and deletions keyed by (kind, name, namespace).
#[async_trait]
pub trait ResourceClient: Send + Sync {
    async fn exists(&self, kind: &ResourceKind, name: &str, namespace: &str) -> Result<bool, Error>;

    /// Deleting something already gone is not an error.
    async fn delete(&self, kind: &ResourceKind, name: &str, namespace: &str) -> Result<(), Error>;
}

/// Translates a service into cluster manifests and applies them.
#[async_trait]
pub trait ServiceApplier: Send + Sync {
    async fn apply_service(&self, environment: &Environment, service: &Service) -> Result<(), Error>;
}
