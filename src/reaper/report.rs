use std::fmt;

use crate::errors::Error;
use crate::model::ResourceKind;

/// A deletion the reaper attempted and the cluster refused.
#[derive(Debug)]
pub struct DeletionFailure {
    pub kind: ResourceKind,
    pub name: String,
    pub error: Error,
}

impl fmt::Display for DeletionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.kind, self.name, self.error)
    }
}

/// Outcome of one cleanup pass: what was deleted and what could not be.
#[derive(Debug, Default)]
pub struct CleanupReport {
    pub deleted: Vec<(ResourceKind, String)>,
    pub failures: Vec<DeletionFailure>,
}

impl CleanupReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// No deletion failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn was_deleted(&self, kind: &ResourceKind, name: &str) -> bool {
        self.deleted.iter().any(|(k, n)| k == kind && n == name)
    }

    pub fn failed(&self, kind: &ResourceKind, name: &str) -> bool {
        self.failures.iter().any(|f| &f.kind == kind && f.name == name)
    }

    pub(crate) fn record(&mut self, kind: ResourceKind, name: &str, result: Result<(), Error>) {
        match result {
            Ok(()) => self.deleted.push((kind, name.to_owned())),
            Err(error) => self.failures.push(DeletionFailure {
                kind,
                name: name.to_owned(),
                error,
            }),
        }
    }

    pub fn merge(&mut self, other: CleanupReport) {
        self.deleted.extend(other.deleted);
        self.failures.extend(other.failures);
    }
}
