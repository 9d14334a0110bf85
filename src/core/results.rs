use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Annotated keys of one run, grouped by source name in collection order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncResults {
    pub generated_at: DateTime<Utc>,
    pub sources: IndexMap<String, Vec<String>>,
}

impl SyncResults {
    pub fn new() -> Self {
        Self {
            generated_at: Utc::now(),
            sources: IndexMap::new(),
        }
    }

    pub fn insert(&mut self, source: impl Into<String>, keys: Vec<String>) {
        self.sources.insert(source.into(), keys);
    }

    pub fn keys_for(&self, source: &str) -> Option<&[String]> {
        self.sources.get(source).map(Vec::as_slice)
    }

    pub fn total_keys(&self) -> usize {
        self.sources.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_keys() == 0
    }
}

impl Default for SyncResults {
    fn default() -> Self {
        Self::new()
    }
}

/// Append the owner tag `<username>@<provider>` to raw key material
pub fn annotate_key(key: &str, username: &str, provider: &str) -> String {
    format!("{} {}@{}", key, username, provider)
}
