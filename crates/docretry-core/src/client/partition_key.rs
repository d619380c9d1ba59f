//! Partition-key definitions and the per-collection cache the create path refreshes.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PartitionKind {
    #[default]
    Hash,
    Range,
}

/// Partition-key schema of a collection, as found under `partitionKey` in its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionKeyDefinition {
    pub paths: Vec<String>,
    #[serde(default)]
    pub kind: PartitionKind,
}

impl PartitionKeyDefinition {
    pub fn hash(path: impl Into<String>) -> Self {
        Self {
            paths: vec![path.into()],
            kind: PartitionKind::Hash,
        }
    }

    /// Parse the `partitionKey` object out of a collection's JSON document.
    pub fn from_collection_json(body: &[u8]) -> Result<Option<Self>> {
        #[derive(Deserialize)]
        struct Collection {
            #[serde(rename = "partitionKey")]
            partition_key: Option<PartitionKeyDefinition>,
        }
        let collection: Collection =
            serde_json::from_slice(body).context("parse collection metadata")?;
        Ok(collection.partition_key)
    }
}

/// Process-wide lookup from collection resource path to partition-key schema.
///
/// Must be safe for concurrent reads and refreshes.
pub trait PartitionKeyDefinitionMap: Send + Sync {
    fn get(&self, resource_path: &str) -> Option<PartitionKeyDefinition>;

    /// Drop or reload the cached schema for `resource_path`.
    fn refresh(&self, resource_path: &str);
}

/// `RwLock<HashMap>` backed [`PartitionKeyDefinitionMap`].
///
/// `refresh` evicts the entry; the client re-reads the collection on the next
/// create and calls [`insert`](Self::insert) with the fresh schema.
#[derive(Default)]
pub struct PartitionKeyDefinitionCache {
    entries: RwLock<HashMap<String, PartitionKeyDefinition>>,
    refreshes: AtomicU64,
}

impl PartitionKeyDefinitionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, resource_path: impl Into<String>, definition: PartitionKeyDefinition) {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(resource_path.into(), definition);
    }

    /// Number of refreshes issued so far, across all paths.
    pub fn refresh_count(&self) -> u64 {
        self.refreshes.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for PartitionKeyDefinitionCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartitionKeyDefinitionCache")
            .field("entries", &self.len())
            .field("refreshes", &self.refresh_count())
            .finish()
    }
}

impl PartitionKeyDefinitionMap for PartitionKeyDefinitionCache {
    fn get(&self, resource_path: &str) -> Option<PartitionKeyDefinition> {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(resource_path)
            .cloned()
    }

    fn refresh(&self, resource_path: &str) {
        self.refreshes.fetch_add(1, Ordering::Relaxed);
        let evicted = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(resource_path);
        tracing::info!(
            resource_path,
            evicted = evicted.is_some(),
            "partition key definition refreshed"
        );
    }
}
