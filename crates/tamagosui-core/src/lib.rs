//! ============================================================================
//! TAMAGOSUI-CORE: Client logic for the TAMAGOSUI pet game
//! ============================================================================
//! This crate handles everything the pet UI does besides drawing:
//! - Pet dashboard: display stats, sleep simulation, action gating
//! - Per-pet image gallery persisted to a key/value store (memory or redb)
//! - Wallet chip and home page branching
//!
//! Wallet signing and chain access stay behind the `GameClient` trait.
//! ============================================================================

pub mod client;
pub mod config;
pub mod dashboard;
pub mod gallery;
pub mod page;
pub mod types;
pub mod wallet;

// Re-export main types for convenience
pub use types::*;
pub use client::{GameClient, QueryState};
pub use config::AppConfig;
pub use dashboard::{DashboardView, PetDashboard};
pub use gallery::{GalleryDb, GalleryManager, KeyValueStore, MemoryStore};
pub use page::{HomePage, PageState};
pub use wallet::{Clipboard, WalletProfile};
