//! Scoped style records, tagged by owning container.
//!
//! Each record holds a `#container-id { rules }` block so a later clear can
//! find and drop it. At most one record exists per container at a time; the
//! keyed map enforces that structurally, and the controller clears before
//! re-applying on a forced reload so records never accumulate.

use dashmap::DashMap;

/// Style rules applied to a freshly loaded container when the caller does
/// not override them: fill the host and stack children vertically.
pub const DEFAULT_STYLE_RULES: &str =
    "display: flex; flex-direction: column; width: 100%; min-height: 100%;";

/// A scoped style block owned by one container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRecord {
    pub container_id: String,
    pub block: String,
}

/// Thread-safe registry of style records keyed by container id.
#[derive(Debug, Default)]
pub struct StyleRegistry {
    records: DashMap<String, StyleRecord>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a scoped style block for `container_id`, replacing any
    /// previous record for the same container.
    pub fn apply(&self, container_id: &str, rules: &str) -> StyleRecord {
        let record = StyleRecord {
            container_id: container_id.to_string(),
            block: format!("#{} {{ {} }}", container_id, rules),
        };
        self.records
            .insert(container_id.to_string(), record.clone());
        record
    }

    /// Remove the record tagged with `container_id`, if present.
    pub fn remove(&self, container_id: &str) -> Option<StyleRecord> {
        self.records.remove(container_id).map(|(_, record)| record)
    }

    pub fn get(&self, container_id: &str) -> Option<StyleRecord> {
        self.records.get(container_id).map(|r| r.value().clone())
    }

    pub fn contains(&self, container_id: &str) -> bool {
        self.records.contains_key(container_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
