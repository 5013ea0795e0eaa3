//! ============================================================================
//! Gallery Module - Locally persisted image lists per pet
//! ============================================================================
//! Purely cosmetic: nothing here touches the chain.
//!
//! ## Architecture
//! ```text
//! add-by-URL / upload / remove
//!            ↓
//!     GalleryManager (in-memory list, dedup)
//!            ↓  full list after every mutation
//!     KeyValueStore  ──  MemoryStore | GalleryDb (redb)
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use tamagosui_core::gallery::{GalleryManager, MemoryStore};
//!
//! let store = Arc::new(MemoryStore::new());
//! let mut gallery = GalleryManager::open(store, &pet.id, None, &[pet.image_url.clone()]);
//! gallery.add_from_url("https://ipfs.io/ipfs/Qm...");
//! ```
//! ============================================================================

mod db;
mod encode;
mod manager;
mod store;

pub use db::GalleryDb;
pub use encode::{media_type_for_path, to_data_url, ImageFile};
pub use manager::{EncodedUpload, GalleryManager, GalleryView, PendingUpload, SharedGallery};
pub use store::{
    gallery_key, load_images, save_images, KeyValueStore, MemoryStore, GALLERY_KEY_PREFIX,
};
