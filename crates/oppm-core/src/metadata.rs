//! The application metadata document (schema version 1).
//!
//! The wire format is a single JSON object, `{"apps": [{"name": ...,
//! "relative_path": ...}]}`. `relative_path` is relative to the root
//! directory and always uses `/` separators so the document survives
//! relocation and platform changes untouched. Unknown fields are rejected
//! on load rather than carried along silently.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppEntry {
    pub name: String,
    pub relative_path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Metadata {
    pub apps: Vec<AppEntry>,
}

impl Metadata {
    pub fn empty() -> Self {
        Self { apps: Vec::new() }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.apps.iter().any(|app| app.name == name)
    }

    pub fn entry(&self, name: &str) -> Option<&AppEntry> {
        self.apps.iter().find(|app| app.name == name)
    }

    /// Replaces any entry of the same name, then appends; names stay unique.
    pub fn upsert(&mut self, name: &str, relative_path: &str) {
        self.apps.retain(|app| app.name != name);
        self.apps.push(AppEntry {
            name: name.to_string(),
            relative_path: relative_path.to_string(),
        });
    }

    /// Removes the named entry, reporting whether anything changed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.apps.len();
        self.apps.retain(|app| app.name != name);
        self.apps.len() != before
    }

    pub fn names(&self) -> BTreeSet<String> {
        self.apps.iter().map(|app| app.name.clone()).collect()
    }

    /// Entries ordered by name for display; storage order is preserved.
    pub fn sorted_entries(&self) -> Vec<&AppEntry> {
        let mut entries: Vec<&AppEntry> = self.apps.iter().collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }
}
