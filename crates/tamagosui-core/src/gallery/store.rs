//! ============================================================================
//! Image Store - Key/value persistence for gallery lists
//! ============================================================================
//! One slot per pet, keyed `petGallery:<petId>`, holding a JSON array of
//! image references. Backends implement the two-call `KeyValueStore`
//! capability so the gallery never depends on a concrete storage area.
//! ============================================================================

use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::{debug, warn};

/// Prefix of every gallery slot key
pub const GALLERY_KEY_PREFIX: &str = "petGallery";

/// Storage slot key for a pet's gallery
pub fn gallery_key(pet_id: &str) -> String {
    format!("{}:{}", GALLERY_KEY_PREFIX, pet_id)
}

/// Minimal string key/value capability
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Read a pet's persisted list.
/// Missing slots, unreadable slots, and non-array values all yield an empty
/// list; non-string elements are dropped.
pub fn load_images(store: &dyn KeyValueStore, pet_id: &str) -> Vec<String> {
    let key = gallery_key(pet_id);

    let raw = match store.get(&key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!("Failed to read gallery slot {}: {}", key, e);
            return Vec::new();
        }
    };

    match serde_json::from_str::<serde_json::Value>(&raw) {
        Ok(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Ok(_) => {
            debug!("Gallery slot {} is not an array, ignoring", key);
            Vec::new()
        }
        Err(e) => {
            debug!("Gallery slot {} is not valid JSON: {}", key, e);
            Vec::new()
        }
    }
}

/// Write a pet's full list (last writer wins)
pub fn save_images(store: &dyn KeyValueStore, pet_id: &str, images: &[String]) -> Result<()> {
    let value = serde_json::to_string(images)
        .map_err(|e| anyhow!("Failed to serialize gallery: {}", e))?;
    store.set(&gallery_key(pet_id), &value)
}

/// Session-scoped in-memory store with an optional byte quota
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that rejects writes once keys + values exceed `quota_bytes`
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| anyhow!("Memory store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| anyhow!("Memory store lock poisoned"))?;

        if let Some(quota) = self.quota_bytes {
            let used: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = used + key.len() + value.len();
            if needed > quota {
                return Err(anyhow!(
                    "Storage quota exceeded: need {} bytes, quota {}",
                    needed,
                    quota
                ));
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
