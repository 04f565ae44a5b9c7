use serde::Deserialize;

pub mod bluegreen;
pub mod cluster;
pub mod diff;
pub mod errors;
pub mod model;
pub mod reaper;
pub mod reconcile;
pub mod utils;

pub use crate::cluster::{ConfigLoader, EnvironmentLoader, KubeResourceClient, ResourceClient, ServiceApplier};
pub use crate::diff::{compare, ChangeSet, CompareOptions};
pub use crate::errors::Error;
pub use crate::model::{Environment, Service};
pub use crate::reaper::{CleanupReport, DeletionFailure, Reaper};
pub use crate::reconcile::{reconcile_once, TickReport};

/// Operator settings read from the process environment.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct OperatorConfig {
    /// Namespace holding the managed environment.
    pub namespace: String,
    /// Manage an `ExternalSecret` alongside the ingress of every TLS service.
    #[serde(default)]
    pub external_secrets_enabled: bool,
}

impl OperatorConfig {
    pub fn from_env() -> Result<Self, Error> {
        let config: OperatorConfig = envy::from_env()?;
        config.validated()
    }

    pub fn from_iter<I: IntoIterator<Item = (String, String)>>(vars: I) -> Result<Self, Error> {
        let config: OperatorConfig = envy::from_iter(vars)?;
        config.validated()
    }

    fn validated(self) -> Result<Self, Error> {
        if self.namespace.trim().is_empty() {
            return Err(Error::Configuration("NAMESPACE must not be empty".to_owned()));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_config_from_env_vars() {
        let config = OperatorConfig::from_iter(vars(&[("NAMESPACE", "sample-app-dev")])).unwrap();
        assert_eq!(config.namespace, "sample-app-dev");
        assert!(!config.external_secrets_enabled);

        let config = OperatorConfig::from_iter(vars(&[
            ("NAMESPACE", "sample-app-dev"),
            ("EXTERNAL_SECRETS_ENABLED", "true"),
        ]))
        .unwrap();
        assert!(config.external_secrets_enabled);
    }

    #[test]
    fn test_config_requires_namespace() {
        assert!(matches!(OperatorConfig::from_iter(vars(&[])), Err(Error::EnvyError(_))));
        assert!(matches!(
            OperatorConfig::from_iter(vars(&[("NAMESPACE", " ")])),
            Err(Error::Configuration(_))
        ));
    }
}
