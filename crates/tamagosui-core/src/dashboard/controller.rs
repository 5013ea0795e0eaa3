//! ============================================================================
//! Pet Dashboard - Snapshot, display stats, and action dispatch
//! ============================================================================
//! Holds the read-only pet snapshot and layers local state over it:
//! - display stats smoothed by the sleep simulation
//! - a display-only name override
//! - the action currently in flight
//!
//! Sleep state is never decided here. The dashboard follows `is_sleeping`
//! of whatever snapshot it last observed and starts or stops the sleep
//! ticker on transitions of (asleep && !waking && rules loaded && mounted).
//! ============================================================================

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::eligibility::{action_buttons, is_eligible, ActionButton};
use super::simulation::{DisplayStats, SleepTicker, DEFAULT_TICK};
use crate::client::GameClient;
use crate::gallery::{GalleryManager, GalleryView, KeyValueStore, SharedGallery};
use crate::types::{GameBalance, Pet, PetAction, TamagoError};

/// Longest display name accepted by `rename_local`
pub const DEFAULT_NAME_MAX_CHARS: usize = 32;

/// Tunables for a dashboard instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardOptions {
    pub tick: Duration,
    pub name_max_chars: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            tick: DEFAULT_TICK,
            name_max_chars: DEFAULT_NAME_MAX_CHARS,
        }
    }
}

/// How a submitted action ended
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    /// The collaborator settled the action
    Settled,
    /// The dashboard was unmounted before the result arrived
    Ignored,
}

/// Start/stop counts of the sleep ticker over the dashboard's lifetime
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TickerStats {
    pub starts: u32,
    pub stops: u32,
}

/// Everything the pet card draws
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PetCard {
    pub pet_id: String,
    pub name: String,
    pub level: u64,
    pub coins: u64,
    pub experience: u64,
    pub image_url: String,
    pub stats: DisplayStats,
    pub is_sleeping: bool,
    pub buttons: Vec<ActionButton>,
    pub gallery: GalleryView,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DashboardView {
    /// Game rules not loaded yet; no actions offered
    Loading,
    Ready(PetCard),
}

struct DashboardState {
    snapshot: Pet,
    balance: Option<GameBalance>,
    name_override: Option<String>,
    in_flight: Option<PetAction>,
    ticker: Option<SleepTicker>,
    ticker_stats: TickerStats,
    mounted: bool,
    gallery: SharedGallery,
}

/// Cloneable dashboard handle
#[derive(Clone)]
pub struct PetDashboard {
    client: Arc<dyn GameClient>,
    store: Arc<dyn KeyValueStore>,
    options: DashboardOptions,
    display: Arc<RwLock<DisplayStats>>,
    state: Arc<Mutex<DashboardState>>,
}

impl PetDashboard {
    /// Mount a dashboard for `pet`. Must be called inside a tokio runtime;
    /// a sleeping pet starts the simulation immediately if rules are known.
    pub fn mount(
        client: Arc<dyn GameClient>,
        store: Arc<dyn KeyValueStore>,
        options: DashboardOptions,
        balance: Option<GameBalance>,
        pet: Pet,
    ) -> Self {
        info!("Mounting dashboard for pet {}", pet.id);

        let gallery = open_gallery(store.clone(), &pet);
        let display = Arc::new(RwLock::new(DisplayStats::from(pet.stats)));

        let mut state = DashboardState {
            snapshot: pet,
            balance,
            name_override: None,
            in_flight: None,
            ticker: None,
            ticker_stats: TickerStats::default(),
            mounted: true,
            gallery,
        };
        reconcile_ticker(&mut state, &display, options.tick);

        Self {
            client,
            store,
            options,
            display,
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Fetch the game rules from the collaborator
    pub async fn load_balance(&self) -> anyhow::Result<()> {
        let balance = self.client.game_balance().await?;
        self.set_balance(balance).await;
        Ok(())
    }

    pub async fn set_balance(&self, balance: GameBalance) {
        let mut state = self.state.lock().await;
        if !state.mounted {
            return;
        }
        state.balance = Some(balance);
        reconcile_ticker(&mut state, &self.display, self.options.tick);
    }

    /// Accept a fresh authoritative snapshot. Display stats are reset to it;
    /// a different pet id re-opens the gallery and drops the name override.
    pub async fn observe_snapshot(&self, pet: Pet) {
        let mut state = self.state.lock().await;
        if !state.mounted {
            debug!("Ignoring snapshot for {} after unmount", pet.id);
            return;
        }

        if pet.id != state.snapshot.id {
            info!("Dashboard switching pet {} -> {}", state.snapshot.id, pet.id);
            state.gallery.close().await;
            state.gallery = open_gallery(self.store.clone(), &pet);
            state.name_override = None;
        }

        *self.display.write().await = DisplayStats::from(pet.stats);
        state.snapshot = pet;
        reconcile_ticker(&mut state, &self.display, self.options.tick);
    }

    /// Re-query the owned pet and observe it
    pub async fn refresh(&self) -> anyhow::Result<()> {
        let Some(account) = self.client.current_account().await else {
            debug!("No wallet connected, skipping refresh");
            return Ok(());
        };
        if let Some(pet) = self.client.owned_pet(&account.address).await? {
            self.observe_snapshot(pet).await;
        }
        Ok(())
    }

    /// Submit `action` through the collaborator. At most one action is in
    /// flight; on success the snapshot is refreshed.
    pub async fn perform(&self, action: PetAction) -> Result<ActionOutcome, TamagoError> {
        let pet_id = {
            let mut state = self.state.lock().await;
            if !state.mounted {
                return Ok(ActionOutcome::Ignored);
            }
            let eligible = match &state.balance {
                Some(balance) => is_eligible(action, &state.snapshot, balance),
                None => return Err(TamagoError::BalanceNotLoaded),
            };
            if let Some(current) = state.in_flight {
                return Err(TamagoError::ActionInFlight(current));
            }
            if !eligible {
                return Err(TamagoError::ActionUnavailable(action));
            }

            state.in_flight = Some(action);
            reconcile_ticker(&mut state, &self.display, self.options.tick);
            state.snapshot.id.clone()
        };

        info!("Submitting {} for pet {}", action, pet_id);
        let result = self.client.execute(action, &pet_id).await;

        {
            let mut state = self.state.lock().await;
            if !state.mounted {
                debug!("Dropping {} result for pet {} after unmount", action, pet_id);
                return Ok(ActionOutcome::Ignored);
            }
            state.in_flight = None;
            reconcile_ticker(&mut state, &self.display, self.options.tick);
        }

        match result {
            Ok(()) => {
                if let Err(e) = self.refresh().await {
                    warn!("Refresh after {} failed: {}", action, e);
                }
                Ok(ActionOutcome::Settled)
            }
            Err(e) => {
                warn!("{} failed for pet {}: {}", action, pet_id, e);
                Err(TamagoError::Collaborator(e.to_string()))
            }
        }
    }

    /// Set a display-only name. Blank input clears the override.
    pub async fn rename_local(&self, name: &str) {
        let trimmed = name.trim();
        let mut state = self.state.lock().await;
        state.name_override = if trimmed.is_empty() {
            None
        } else {
            let truncated: String = trimmed.chars().take(self.options.name_max_chars).collect();
            Some(truncated.trim_end().to_string())
        };
    }

    pub async fn display_name(&self) -> String {
        let state = self.state.lock().await;
        display_name(&state)
    }

    pub async fn display_stats(&self) -> DisplayStats {
        *self.display.read().await
    }

    pub async fn gallery(&self) -> SharedGallery {
        self.state.lock().await.gallery.clone()
    }

    pub async fn in_flight(&self) -> Option<PetAction> {
        self.state.lock().await.in_flight
    }

    pub async fn ticker_running(&self) -> bool {
        self.state.lock().await.ticker.is_some()
    }

    pub async fn ticker_stats(&self) -> TickerStats {
        self.state.lock().await.ticker_stats
    }

    pub async fn view(&self) -> DashboardView {
        let state = self.state.lock().await;
        let Some(balance) = &state.balance else {
            return DashboardView::Loading;
        };

        let pet = &state.snapshot;
        DashboardView::Ready(PetCard {
            pet_id: pet.id.clone(),
            name: display_name(&state),
            level: pet.game_data.level,
            coins: pet.game_data.coins,
            experience: pet.game_data.experience,
            image_url: pet.image_url.clone(),
            stats: *self.display.read().await,
            is_sleeping: pet.is_sleeping,
            buttons: action_buttons(pet, balance, state.in_flight),
            gallery: state.gallery.view().await,
        })
    }

    /// Tear down the ticker and pending uploads; later results are ignored
    pub async fn unmount(&self) {
        let mut state = self.state.lock().await;
        if !state.mounted {
            return;
        }
        state.mounted = false;
        reconcile_ticker(&mut state, &self.display, self.options.tick);
        state.gallery.close().await;
        info!("Unmounted dashboard for pet {}", state.snapshot.id);
    }
}

fn open_gallery(store: Arc<dyn KeyValueStore>, pet: &Pet) -> SharedGallery {
    let fallback = [pet.image_url.clone()];
    SharedGallery::new(GalleryManager::open(store, &pet.id, None, &fallback))
}

fn display_name(state: &DashboardState) -> String {
    state
        .name_override
        .clone()
        .unwrap_or_else(|| state.snapshot.name.clone())
}

fn reconcile_ticker(state: &mut DashboardState, display: &Arc<RwLock<DisplayStats>>, tick: Duration) {
    let should_run = state.mounted
        && state.snapshot.is_sleeping
        && state.in_flight != Some(PetAction::WakeUp)
        && state.balance.is_some();

    match (should_run, state.ticker.take()) {
        (true, None) => {
            if let Some(balance) = state.balance.clone() {
                state.ticker = Some(SleepTicker::start(display.clone(), balance, tick));
                state.ticker_stats.starts += 1;
            }
        }
        (false, Some(ticker)) => {
            ticker.stop();
            state.ticker_stats.stops += 1;
        }
        (_, ticker) => state.ticker = ticker,
    }
}
