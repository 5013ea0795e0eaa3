//! ============================================================================
//! Core Types for the TAMAGOSUI Client
//! ============================================================================
//! Pet snapshots, game balance parameters, and actions as delivered by the
//! on-chain collaborators. These types are serialized to JSON for IPC with
//! whatever front-end draws the dashboard.
//! ============================================================================

use serde::{Deserialize, Serialize};

/// Read-only pet snapshot owned by the chain
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub stats: Stats,
    pub game_data: GameData,
    #[serde(default)]
    pub is_sleeping: bool,
}

/// Bounded stats, each in `0..=max_stat`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stats {
    pub energy: u64,
    pub hunger: u64,
    pub happiness: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameData {
    pub coins: u64,
    pub experience: u64,
    pub level: u64,
}

/// Session-wide tuning parameters fetched from the game package.
/// Treated as immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameBalance {
    pub max_stat: u64,
    pub feed_coins_cost: u64,
    pub play_energy_loss: u64,
    pub play_hunger_loss: u64,
    pub work_energy_loss: u64,
    pub work_happiness_loss: u64,
    pub work_hunger_loss: u64,
    pub exp_per_level: u64,
    /// Milliseconds of sleep per point of energy gained
    pub sleep_energy_gain_ms: u64,
    /// Milliseconds of sleep per point of hunger lost
    pub sleep_hunger_loss_ms: u64,
    /// Milliseconds of sleep per point of happiness lost
    pub sleep_happiness_loss_ms: u64,
}

/// Connected wallet account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WalletAccount {
    pub address: String,
}

/// State-changing actions a wallet can invoke on its pet
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PetAction {
    Feed,
    Play,
    Work,
    Sleep,
    WakeUp,
    LevelUp,
}

impl PetAction {
    pub const ALL: [PetAction; 6] = [
        PetAction::Feed,
        PetAction::Play,
        PetAction::Work,
        PetAction::Sleep,
        PetAction::WakeUp,
        PetAction::LevelUp,
    ];

    /// Button label shown on the dashboard
    pub fn label(&self) -> &'static str {
        match self {
            PetAction::Feed => "Feed",
            PetAction::Play => "Play",
            PetAction::Work => "Work",
            PetAction::Sleep => "Sleep",
            PetAction::WakeUp => "Wake Up!",
            PetAction::LevelUp => "Level Up!",
        }
    }
}

impl std::fmt::Display for PetAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PetAction::Feed => "feed",
            PetAction::Play => "play",
            PetAction::Work => "work",
            PetAction::Sleep => "sleep",
            PetAction::WakeUp => "wake_up",
            PetAction::LevelUp => "level_up",
        };
        f.write_str(name)
    }
}

/// Error types for the client core
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error, PartialEq)]
pub enum TamagoError {
    #[error("Game rules not loaded yet")]
    BalanceNotLoaded,

    #[error("Action {0} is not available for this pet")]
    ActionUnavailable(PetAction),

    #[error("Another action is in flight: {0}")]
    ActionInFlight(PetAction),

    #[error("Collaborator call failed: {0}")]
    Collaborator(String),
}
