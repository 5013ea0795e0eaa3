// ============================================================================
// GalleryDb — Embedded Gallery Store (redb)
// ============================================================================
// Durable backend for gallery slots, used outside the browser.
// Default path: ~/.tamagosui/gallery.redb
// ============================================================================

use anyhow::{anyhow, Result};
use redb::{backends::InMemoryBackend, Database, TableDefinition};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::store::{KeyValueStore, GALLERY_KEY_PREFIX};

const SLOTS: TableDefinition<&str, &str> = TableDefinition::new("slots");

/// Embedded key/value database holding gallery slots
pub struct GalleryDb {
    db: Database,
    path: Option<PathBuf>,
}

impl GalleryDb {
    /// Open (or create) the database at the given path.
    /// If `path` is None, uses ~/.tamagosui/gallery.redb
    pub fn open(path: Option<&Path>) -> Result<Self> {
        let db_path = match path {
            Some(p) => p.to_path_buf(),
            None => default_db_path()?,
        };

        info!("Opening gallery database at: {}", db_path.display());

        let db = Database::create(&db_path)
            .map_err(|e| anyhow!("Failed to open database: {}", e))?;

        let store = Self {
            db,
            path: Some(db_path),
        };
        store.ensure_tables()?;
        Ok(store)
    }

    /// Database that lives only in memory (tests, throwaway sessions)
    pub fn in_memory() -> Result<Self> {
        let db = Database::builder()
            .create_with_backend(InMemoryBackend::new())
            .map_err(|e| anyhow!("Failed to create in-memory database: {}", e))?;

        let store = Self { db, path: None };
        store.ensure_tables()?;
        Ok(store)
    }

    fn ensure_tables(&self) -> Result<()> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| anyhow!("Failed to begin write: {}", e))?;
        {
            let _ = write_txn
                .open_table(SLOTS)
                .map_err(|e| anyhow!("Failed to create slots table: {}", e))?;
        }
        write_txn
            .commit()
            .map_err(|e| anyhow!("Failed to commit init: {}", e))?;
        Ok(())
    }

    /// Database file path, `None` for in-memory databases
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// All slots as `(key, raw value)` pairs in key order
    pub fn entries(&self) -> Result<Vec<(String, String)>> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| anyhow!("Failed to begin read: {}", e))?;
        let table = read_txn
            .open_table(SLOTS)
            .map_err(|e| anyhow!("Failed to open slots table: {}", e))?;

        let mut results = Vec::new();
        let iter = table
            .range::<&str>(..)
            .map_err(|e| anyhow!("Failed to iterate slots: {}", e))?;
        for entry in iter {
            let (key, value) = entry.map_err(|e| anyhow!("Failed to read entry: {}", e))?;
            results.push((key.value().to_string(), value.value().to_string()));
        }
        Ok(results)
    }

    /// Pet ids that have a gallery slot
    pub fn pet_ids(&self) -> Result<Vec<String>> {
        let prefix = format!("{}:", GALLERY_KEY_PREFIX);
        Ok(self
            .entries()?
            .into_iter()
            .filter_map(|(key, _)| key.strip_prefix(&prefix).map(str::to_string))
            .collect())
    }

    /// Delete a slot, returning whether it existed
    pub fn remove(&self, key: &str) -> Result<bool> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| anyhow!("Failed to begin write: {}", e))?;
        let removed;
        {
            let mut table = write_txn
                .open_table(SLOTS)
                .map_err(|e| anyhow!("Failed to open slots table: {}", e))?;
            removed = table
                .remove(key)
                .map_err(|e| anyhow!("Failed to remove slot: {}", e))?
                .is_some();
        }
        write_txn
            .commit()
            .map_err(|e| anyhow!("Failed to commit delete: {}", e))?;

        if removed {
            debug!("Deleted slot: {}", key);
        }
        Ok(removed)
    }
}

impl KeyValueStore for GalleryDb {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| anyhow!("Failed to begin read: {}", e))?;
        let table = read_txn
            .open_table(SLOTS)
            .map_err(|e| anyhow!("Failed to open slots table: {}", e))?;

        let value = table
            .get(key)
            .map_err(|e| anyhow!("Failed to get slot: {}", e))?
            .map(|v| v.value().to_string());
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| anyhow!("Failed to begin write: {}", e))?;
        {
            let mut table = write_txn
                .open_table(SLOTS)
                .map_err(|e| anyhow!("Failed to open slots table: {}", e))?;
            table
                .insert(key, value)
                .map_err(|e| anyhow!("Failed to insert slot: {}", e))?;
        }
        write_txn
            .commit()
            .map_err(|e| anyhow!("Failed to commit: {}", e))?;

        debug!("Stored slot: {} ({} bytes)", key, value.len());
        Ok(())
    }
}

fn default_db_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Cannot determine home directory"))?;
    let dir = home.join(".tamagosui");
    std::fs::create_dir_all(&dir)
        .map_err(|e| anyhow!("Failed to create .tamagosui directory: {}", e))?;
    Ok(dir.join("gallery.redb"))
}
