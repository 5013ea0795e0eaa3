//! ============================================================================
//! Dashboard Module - Pet card state, sleep simulation, and action gating
//! ============================================================================
//!
//! ## States
//! ```text
//!   Awake ──(sleep confirmed on chain)──▶ Asleep ── ticker running
//!     ▲                                      │
//!     └────────(wake confirmed on chain)─────┘
//! ```
//! The ticker also pauses while a wake-up is in flight and stops for good
//! on unmount.
//! ============================================================================

mod controller;
pub(crate) mod eligibility;
mod simulation;

pub use controller::{
    ActionOutcome, DashboardOptions, DashboardView, PetCard, PetDashboard, TickerStats,
    DEFAULT_NAME_MAX_CHARS,
};
pub use eligibility::{
    action_buttons, can_feed, can_level_up, can_play, can_work, is_eligible, ActionButton,
};
pub use simulation::{sleep_tick, DisplayStats, SleepTicker, DEFAULT_TICK};
