//! ============================================================================
//! App Configuration - Environment-driven settings
//! ============================================================================
//! TAMAGOSUI_DB_PATH   gallery database file (default ~/.tamagosui/gallery.redb)
//! TAMAGOSUI_TICK_MS   sleep simulation tick in milliseconds (default 1000)
//! TAMAGOSUI_NAME_MAX  longest local display name (default 32)
//! ============================================================================

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::dashboard::{DashboardOptions, DEFAULT_NAME_MAX_CHARS, DEFAULT_TICK};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub db_path: Option<PathBuf>,
    pub tick_ms: u64,
    pub name_max_chars: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            tick_ms: DEFAULT_TICK.as_millis() as u64,
            name_max_chars: DEFAULT_NAME_MAX_CHARS,
        }
    }
}

impl AppConfig {
    /// Read settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            db_path: lookup("TAMAGOSUI_DB_PATH").map(PathBuf::from),
            tick_ms: parse_or("TAMAGOSUI_TICK_MS", lookup("TAMAGOSUI_TICK_MS"), defaults.tick_ms),
            name_max_chars: parse_or(
                "TAMAGOSUI_NAME_MAX",
                lookup("TAMAGOSUI_NAME_MAX"),
                defaults.name_max_chars,
            ),
        }
    }

    pub fn dashboard_options(&self) -> DashboardOptions {
        DashboardOptions {
            tick: Duration::from_millis(self.tick_ms.max(1)),
            name_max_chars: self.name_max_chars,
        }
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Invalid value for {}: '{}', using default", key, raw);
            default
        }),
    }
}
