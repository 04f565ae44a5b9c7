use serde::{Deserialize, Serialize};

use crate::model::deployment::DeploymentSettings;
use crate::model::gist::Gists;
use crate::model::service::Services;

/// A full managed environment: its services and imported resources.
///
/// Built afresh on every reconciliation tick, either from the environment
/// config (desired) or from the cluster (observed).
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Environment {
    pub name: String,
    pub namespace: String,
    pub deployment: Option<DeploymentSettings>,
    pub services: Services,
    pub tests: Vec<Test>,
    pub gists: Gists,
}

/// Test suite definition; carried along but never reconciled.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Test {
    pub name: String,
    pub repository: String,
    pub branch: String,
    pub commands: Vec<String>,
}
