//! In-memory cache of fetched record snapshots.
//!
//! Keys are (resource type, id). List results are cached under a reserved
//! `LIST` id per resource type; invalidating any individual resource also
//! drops that type's list, since the list may embed the stale snapshot.
//! Entries are JSON snapshots: read-only, replaced wholesale on refetch.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::ResourceType;

/// Reserved id under which a resource type's list result is cached.
const LIST_ID: &str = "LIST";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    resource_type: ResourceType,
    id: String,
}

impl CacheKey {
    fn new(resource_type: ResourceType, id: &str) -> Self {
        Self {
            resource_type,
            id: id.to_string(),
        }
    }

    fn list(resource_type: ResourceType) -> Self {
        Self::new(resource_type, LIST_ID)
    }
}

/// Snapshot cache with an explicit invalidation contract.
#[derive(Default)]
pub struct ResourceCache {
    entries: HashMap<CacheKey, serde_json::Value>,
}

impl ResourceCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache a single resource snapshot.
    pub fn insert<T: Serialize>(&mut self, resource_type: ResourceType, id: &str, value: &T) {
        if let Ok(json) = serde_json::to_value(value) {
            self.entries.insert(CacheKey::new(resource_type, id), json);
        }
    }

    /// Cache a resource type's list result.
    pub fn insert_list<T: Serialize>(&mut self, resource_type: ResourceType, value: &T) {
        self.insert(resource_type, LIST_ID, value);
    }

    /// Get a cached snapshot, if present.
    pub fn get<T: DeserializeOwned>(&self, resource_type: ResourceType, id: &str) -> Option<T> {
        let json = self.entries.get(&CacheKey::new(resource_type, id))?;
        serde_json::from_value(json.clone()).ok()
    }

    /// Get a cached list result, if present.
    pub fn get_list<T: DeserializeOwned>(&self, resource_type: ResourceType) -> Option<T> {
        self.get(resource_type, LIST_ID)
    }

    /// Whether a snapshot is cached.
    pub fn contains(&self, resource_type: ResourceType, id: &str) -> bool {
        self.entries.contains_key(&CacheKey::new(resource_type, id))
    }

    /// Drop one resource snapshot and its type's list entry.
    pub fn invalidate(&mut self, resource_type: ResourceType, id: &str) {
        self.entries.remove(&CacheKey::new(resource_type, id));
        self.entries.remove(&CacheKey::list(resource_type));
    }

    /// Drop every snapshot of one resource type, list included.
    pub fn invalidate_type(&mut self, resource_type: ResourceType) {
        self.entries.retain(|key, _| key.resource_type != resource_type);
    }

    /// Drop everything. The next render cycle refetches from scratch.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached snapshots (list entries included).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
