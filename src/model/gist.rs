use serde::{Deserialize, Serialize};

use crate::model::resource::ResourceKind;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GistType {
    ConfigMap,
    Job,
    CronJob,
    Secret,
}

impl GistType {
    /// Cluster kind the reaper deletes for this import. Imported secrets
    /// are left to whatever manages them.
    pub fn resource_kind(&self) -> Option<ResourceKind> {
        match self {
            GistType::ConfigMap => Some(ResourceKind::ConfigMap),
            GistType::Job => Some(ResourceKind::Job),
            GistType::CronJob => Some(ResourceKind::CronJob),
            GistType::Secret => None,
        }
    }
}

/// A resource imported into the environment from files in the config
/// repository. Identified by (name, type).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Gist {
    pub name: String,
    #[serde(rename = "type")]
    pub gist_type: GistType,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
}

impl Gist {
    pub fn new(name: &str, gist_type: GistType) -> Self {
        Gist {
            name: name.to_owned(),
            gist_type,
            path: String::new(),
            files: Vec::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct Gists(Vec<Gist>);

impl Gists {
    pub fn new(gists: Vec<Gist>) -> Self {
        Gists(gists)
    }

    /// Matches on name alone, whatever the type.
    pub fn contains_name(&self, name: &str) -> bool {
        self.0.iter().any(|gist| gist.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Gist> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Gists {
    type Item = &'a Gist;
    type IntoIter = std::slice::Iter<'a, Gist>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Gist> for Gists {
    fn from_iter<I: IntoIterator<Item = Gist>>(iter: I) -> Self {
        Gists(iter.into_iter().collect())
    }
}
