//! ============================================================================
//! Gallery Manager - Per-pet image list orchestration
//! ============================================================================
//! Owns the in-memory list for one pet and writes it through to the store
//! after every mutation. The in-memory list is the source of truth for the
//! session; a failed write only costs durability.
//! ============================================================================

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::encode::{to_data_url, ImageFile};
use super::store::{load_images, save_images, KeyValueStore};

/// What the gallery panel should draw
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "images", rename_all = "snake_case")]
pub enum GalleryView {
    /// "No images yet" placeholder
    Empty,
    Grid(Vec<String>),
}

/// Gallery list for a single pet
pub struct GalleryManager {
    pet_id: String,
    store: Arc<dyn KeyValueStore>,
    images: Vec<String>,
    /// Bumped by every upload and by `close`; stale uploads are dropped
    generation: u64,
    /// Set by `close`; a closed gallery ignores every mutation
    closed: bool,
}

impl GalleryManager {
    /// Resolve the initial list: persisted slot, then `defaults`, then
    /// `fallback`, first non-empty wins. Duplicates are removed.
    pub fn open(
        store: Arc<dyn KeyValueStore>,
        pet_id: &str,
        defaults: Option<&[String]>,
        fallback: &[String],
    ) -> Self {
        let persisted = load_images(store.as_ref(), pet_id);

        let (source, initial) = if !persisted.is_empty() {
            ("storage", persisted)
        } else if let Some(defaults) = defaults.filter(|d| !d.is_empty()) {
            ("defaults", defaults.to_vec())
        } else {
            ("fallback", fallback.to_vec())
        };

        let manager = Self {
            pet_id: pet_id.to_string(),
            store,
            images: dedup_preserving_order(initial),
            generation: 0,
            closed: false,
        };

        info!(
            "Opened gallery for pet {} from {} ({} images)",
            pet_id,
            source,
            manager.images.len()
        );
        // an empty resolution leaves no slot behind
        if source != "storage" && !manager.images.is_empty() {
            manager.persist();
        }
        manager
    }

    pub fn pet_id(&self) -> &str {
        &self.pet_id
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn view(&self) -> GalleryView {
        if self.images.is_empty() {
            GalleryView::Empty
        } else {
            GalleryView::Grid(self.images.clone())
        }
    }

    /// Add an image by URL. Returns false when the input is blank, not a
    /// valid URL, or already present.
    pub fn add_from_url(&mut self, input: &str) -> bool {
        if self.ignore_if_closed("add") {
            return false;
        }
        let cleaned = input.trim();
        if cleaned.is_empty() {
            return false;
        }

        let parsed = match url::Url::parse(cleaned) {
            Ok(u) => u,
            Err(e) => {
                debug!("Ignoring invalid gallery URL '{}': {}", cleaned, e);
                return false;
            }
        };

        self.push_unique(parsed.to_string())
    }

    /// Remove the entry at `index`; out-of-range indices leave the list alone
    pub fn remove_at(&mut self, index: usize) -> bool {
        if self.ignore_if_closed("remove") {
            return false;
        }
        if index >= self.images.len() {
            debug!(
                "Ignoring remove at {} (gallery for {} has {} images)",
                index,
                self.pet_id,
                self.images.len()
            );
            return false;
        }

        self.images.remove(index);
        self.persist();
        true
    }

    /// Start an upload. Non-image files are rejected.
    /// Starting a new upload supersedes any upload still encoding.
    pub fn begin_upload(&mut self, file: ImageFile) -> Option<PendingUpload> {
        if self.ignore_if_closed("upload") {
            return None;
        }
        if !file.is_image() {
            debug!(
                "Ignoring upload {} with media type {}",
                file.name, file.media_type
            );
            return None;
        }

        self.generation += 1;
        Some(PendingUpload {
            generation: self.generation,
            file,
        })
    }

    /// Apply an encoded upload if it is still current
    pub fn finish_upload(&mut self, upload: EncodedUpload) -> bool {
        if self.ignore_if_closed("upload") {
            return false;
        }
        if upload.generation != self.generation {
            debug!(
                "Discarding stale upload (generation {} != {})",
                upload.generation, self.generation
            );
            return false;
        }
        if upload.data_url.is_empty() {
            return false;
        }
        self.push_unique(upload.data_url)
    }

    /// Invalidate uploads still in flight and freeze the list
    pub fn close(&mut self) {
        self.generation += 1;
        self.closed = true;
    }

    fn ignore_if_closed(&self, op: &str) -> bool {
        if self.closed {
            debug!("Ignoring {} on closed gallery for pet {}", op, self.pet_id);
        }
        self.closed
    }

    fn push_unique(&mut self, entry: String) -> bool {
        if self.images.contains(&entry) {
            return false;
        }
        self.images.push(entry);
        self.persist();
        true
    }

    fn persist(&self) {
        match save_images(self.store.as_ref(), &self.pet_id, &self.images) {
            Ok(()) => debug!(
                "Persisted {} images for pet {}",
                self.images.len(),
                self.pet_id
            ),
            Err(e) => warn!(
                "Failed to persist gallery for pet {} (kept in memory): {}",
                self.pet_id, e
            ),
        }
    }
}

/// Upload waiting to be encoded
#[derive(Debug)]
pub struct PendingUpload {
    generation: u64,
    file: ImageFile,
}

impl PendingUpload {
    /// Encode the file into a data URL off the async executor
    pub async fn encode(self) -> Result<EncodedUpload> {
        let generation = self.generation;
        let file = self.file;

        let data_url = tokio::task::spawn_blocking(move || {
            if file.bytes.is_empty() {
                String::new()
            } else {
                to_data_url(&file.media_type, &file.bytes)
            }
        })
        .await
        .map_err(|e| anyhow!("Encode task failed: {}", e))?;

        Ok(EncodedUpload {
            generation,
            data_url,
        })
    }
}

/// Result of encoding a `PendingUpload`
#[derive(Debug)]
pub struct EncodedUpload {
    generation: u64,
    data_url: String,
}

/// Cloneable gallery handle for use across tasks
#[derive(Clone)]
pub struct SharedGallery {
    inner: Arc<RwLock<GalleryManager>>,
}

impl SharedGallery {
    pub fn new(manager: GalleryManager) -> Self {
        Self {
            inner: Arc::new(RwLock::new(manager)),
        }
    }

    pub async fn images(&self) -> Vec<String> {
        self.inner.read().await.images().to_vec()
    }

    pub async fn view(&self) -> GalleryView {
        self.inner.read().await.view()
    }

    pub async fn pet_id(&self) -> String {
        self.inner.read().await.pet_id().to_string()
    }

    pub async fn add_from_url(&self, input: &str) -> bool {
        self.inner.write().await.add_from_url(input)
    }

    pub async fn remove_at(&self, index: usize) -> bool {
        self.inner.write().await.remove_at(index)
    }

    /// Encode and append `file`, returning whether the list changed
    pub async fn add_from_file(&self, file: ImageFile) -> bool {
        let pending = match self.inner.write().await.begin_upload(file) {
            Some(p) => p,
            None => return false,
        };

        match pending.encode().await {
            Ok(encoded) => self.inner.write().await.finish_upload(encoded),
            Err(e) => {
                warn!("Failed to encode upload: {}", e);
                false
            }
        }
    }

    /// Fire-and-forget upload; the list updates when encoding completes
    pub fn spawn_upload(&self, file: ImageFile) -> JoinHandle<bool> {
        let gallery = self.clone();
        tokio::spawn(async move { gallery.add_from_file(file).await })
    }

    pub async fn close(&self) {
        self.inner.write().await.close();
    }
}

fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::db::GalleryDb;
    use crate::gallery::store::MemoryStore;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn png(bytes: &[u8]) -> ImageFile {
        ImageFile::new("pic.png", "image/png", bytes.to_vec())
    }

    #[test]
    fn test_open_prefers_storage() {
        let store = Arc::new(MemoryStore::new());
        save_images(store.as_ref(), "pet", &strings(&["https://stored.io/"])).unwrap();

        let defaults = strings(&["https://default.io/"]);
        let gallery = GalleryManager::open(
            store,
            "pet",
            Some(&defaults),
            &strings(&["https://fallback.io/"]),
        );
        assert_eq!(gallery.images(), strings(&["https://stored.io/"]).as_slice());
    }

    #[test]
    fn test_open_defaults_then_fallback() {
        let store = Arc::new(MemoryStore::new());
        let defaults = strings(&["https://default.io/", "https://default.io/"]);
        let gallery = GalleryManager::open(
            store.clone(),
            "pet-a",
            Some(&defaults),
            &strings(&["https://fallback.io/"]),
        );
        assert_eq!(gallery.images(), strings(&["https://default.io/"]).as_slice());
        // the resolved list is written back on open
        assert_eq!(load_images(store.as_ref(), "pet-a"), gallery.images());

        let empty: Vec<String> = Vec::new();
        let gallery = GalleryManager::open(
            store,
            "pet-b",
            Some(&empty),
            &strings(&["https://fallback.io/"]),
        );
        assert_eq!(gallery.images(), strings(&["https://fallback.io/"]).as_slice());
    }

    #[test]
    fn test_open_dedups_storage() {
        let store = Arc::new(MemoryStore::new());
        store
            .set("petGallery:pet", r#"["https://a.io/","https://b.io/","https://a.io/"]"#)
            .unwrap();
        let gallery = GalleryManager::open(store, "pet", None, &[]);
        assert_eq!(
            gallery.images(),
            strings(&["https://a.io/", "https://b.io/"]).as_slice()
        );
    }

    #[test]
    fn test_empty_gallery_view() {
        let gallery = GalleryManager::open(Arc::new(MemoryStore::new()), "pet", None, &[]);
        assert_eq!(gallery.view(), GalleryView::Empty);
    }

    #[test]
    fn test_add_url_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let mut gallery = GalleryManager::open(store.clone(), "pet", None, &[]);

        assert!(gallery.add_from_url("  https://ipfs.io/ipfs/abc  "));
        assert!(!gallery.add_from_url("https://ipfs.io/ipfs/abc"));
        assert_eq!(gallery.images().len(), 1);
        assert_eq!(load_images(store.as_ref(), "pet"), gallery.images());
    }

    #[test]
    fn test_add_url_normalizes() {
        let mut gallery = GalleryManager::open(Arc::new(MemoryStore::new()), "pet", None, &[]);
        assert!(gallery.add_from_url("HTTPS://Example.com"));
        assert!(!gallery.add_from_url("https://example.com/"));
        assert_eq!(gallery.images(), strings(&["https://example.com/"]).as_slice());
    }

    #[test]
    fn test_add_invalid_url_is_ignored() {
        let mut gallery = GalleryManager::open(
            Arc::new(MemoryStore::new()),
            "pet",
            None,
            &strings(&["https://a.io/"]),
        );
        assert!(!gallery.add_from_url("not a url"));
        assert!(!gallery.add_from_url("   "));
        assert_eq!(gallery.images(), strings(&["https://a.io/"]).as_slice());
    }

    #[test]
    fn test_remove_preserves_order() {
        let initial = strings(&["https://a.io/", "https://b.io/", "https://c.io/"]);
        let store = Arc::new(MemoryStore::new());
        let mut gallery = GalleryManager::open(store.clone(), "pet", Some(&initial), &[]);

        assert!(gallery.remove_at(1));
        assert_eq!(
            gallery.images(),
            strings(&["https://a.io/", "https://c.io/"]).as_slice()
        );
        assert_eq!(load_images(store.as_ref(), "pet"), gallery.images());
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let initial = strings(&["https://a.io/"]);
        let mut gallery =
            GalleryManager::open(Arc::new(MemoryStore::new()), "pet", Some(&initial), &[]);
        assert!(!gallery.remove_at(1));
        assert!(!gallery.remove_at(usize::MAX));
        assert_eq!(gallery.images(), initial.as_slice());
    }

    #[test]
    fn test_persist_failure_keeps_memory_list() {
        let store = Arc::new(MemoryStore::with_quota(64));
        let mut gallery = GalleryManager::open(store.clone(), "pet", None, &[]);

        let long = format!("https://cdn.example.com/{}", "x".repeat(100));
        assert!(gallery.add_from_url(&long));
        assert_eq!(gallery.images(), &[long]);
        // the write was rejected, so a reload sees the last persisted list
        assert!(load_images(store.as_ref(), "pet").is_empty());
    }

    #[test]
    fn test_non_image_upload_rejected() {
        let mut gallery = GalleryManager::open(Arc::new(MemoryStore::new()), "pet", None, &[]);
        let file = ImageFile::new("notes.txt", "text/plain", b"hello".to_vec());
        assert!(gallery.begin_upload(file).is_none());
        let file = ImageFile::new("cat.xyz", "application/octet-stream", b"hello".to_vec());
        assert!(gallery.begin_upload(file).is_none());
    }

    #[tokio::test]
    async fn test_upload_appends_data_url() {
        let mut gallery = GalleryManager::open(Arc::new(MemoryStore::new()), "pet", None, &[]);
        let pending = gallery.begin_upload(png(b"hi")).unwrap();
        let encoded = pending.encode().await.unwrap();

        assert!(gallery.finish_upload(encoded));
        assert_eq!(gallery.images(), strings(&["data:image/png;base64,aGk="]).as_slice());
    }

    #[tokio::test]
    async fn test_superseded_upload_discarded() {
        let mut gallery = GalleryManager::open(Arc::new(MemoryStore::new()), "pet", None, &[]);
        let first = gallery.begin_upload(png(b"one")).unwrap();
        let second = gallery.begin_upload(png(b"two")).unwrap();

        let first = first.encode().await.unwrap();
        let second = second.encode().await.unwrap();

        assert!(!gallery.finish_upload(first));
        assert!(gallery.finish_upload(second));
        assert_eq!(gallery.images().len(), 1);
    }

    #[tokio::test]
    async fn test_upload_after_close_discarded() {
        let mut gallery = GalleryManager::open(Arc::new(MemoryStore::new()), "pet", None, &[]);
        let pending = gallery.begin_upload(png(b"late")).unwrap();
        gallery.close();

        let encoded = pending.encode().await.unwrap();
        assert!(!gallery.finish_upload(encoded));
        assert!(gallery.images().is_empty());
    }

    #[tokio::test]
    async fn test_closed_gallery_ignores_mutations() {
        let store = Arc::new(MemoryStore::new());
        let initial = strings(&["https://a.io/"]);
        let gallery = SharedGallery::new(GalleryManager::open(
            store.clone(),
            "pet",
            Some(&initial),
            &[],
        ));
        gallery.close().await;

        assert!(!gallery.add_from_url("https://late.io").await);
        assert!(!gallery.remove_at(0).await);
        assert!(!gallery.add_from_file(png(b"late")).await);
        assert_eq!(gallery.images().await, initial);
        assert_eq!(load_images(store.as_ref(), "pet"), initial);
    }

    #[test]
    fn test_rejected_add_leaves_no_slot() {
        let db = Arc::new(GalleryDb::in_memory().unwrap());
        let mut gallery = GalleryManager::open(db.clone(), "typo-pet", None, &[]);

        assert!(!gallery.add_from_url("not a url"));
        assert!(!gallery.remove_at(0));
        assert!(db.pet_ids().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_file_not_added() {
        let mut gallery = GalleryManager::open(Arc::new(MemoryStore::new()), "pet", None, &[]);
        let pending = gallery.begin_upload(png(b"")).unwrap();
        let encoded = pending.encode().await.unwrap();
        assert!(!gallery.finish_upload(encoded));
    }

    #[tokio::test]
    async fn test_shared_gallery_upload_dedups() {
        let store = Arc::new(MemoryStore::new());
        let gallery = SharedGallery::new(GalleryManager::open(store.clone(), "pet", None, &[]));

        assert!(gallery.add_from_file(png(b"same")).await);
        assert!(!gallery.spawn_upload(png(b"same")).await.unwrap());
        assert!(gallery.add_from_url("https://a.io").await);

        assert_eq!(gallery.images().await.len(), 2);
        assert_eq!(load_images(store.as_ref(), "pet").len(), 2);
        assert!(gallery.remove_at(0).await);
        assert_eq!(gallery.view().await, GalleryView::Grid(strings(&["https://a.io/"])));
    }
}
