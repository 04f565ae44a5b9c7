use std::collections::BTreeMap;

/// Services needing a deploy, each with a readable reason (usually a diff).
///
/// A fresh value is produced by every `compare` call; nothing is shared
/// between calls.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChangeSet(BTreeMap<String, String>);

impl ChangeSet {
    pub fn new() -> Self {
        ChangeSet::default()
    }

    /// Record a change; a second record for the same service is appended.
    pub fn add(&mut self, service_name: &str, description: String) {
        self.0
            .entry(service_name.to_owned())
            .and_modify(|existing| {
                existing.push('\n');
                existing.push_str(&description);
            })
            .or_insert(description);
    }

    pub fn get(&self, service_name: &str) -> Option<&str> {
        self.0.get(service_name).map(String::as_str)
    }

    pub fn contains(&self, service_name: &str) -> bool {
        self.0.contains_key(service_name)
    }

    pub fn service_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, diff)| (name.as_str(), diff.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
