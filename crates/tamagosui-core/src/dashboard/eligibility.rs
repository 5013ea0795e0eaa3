//! ============================================================================
//! Eligibility - Which actions a pet can take right now
//! ============================================================================
//! Pure functions of the snapshot and the balance. Every action except
//! waking up requires the pet to be awake.
//! ============================================================================

use serde::{Deserialize, Serialize};

use crate::types::{GameBalance, Pet, PetAction};

pub fn can_feed(pet: &Pet, balance: &GameBalance) -> bool {
    !pet.is_sleeping
        && pet.stats.hunger < balance.max_stat
        && pet.game_data.coins >= balance.feed_coins_cost
}

pub fn can_play(pet: &Pet, balance: &GameBalance) -> bool {
    !pet.is_sleeping
        && pet.stats.energy >= balance.play_energy_loss
        && pet.stats.hunger >= balance.play_hunger_loss
}

pub fn can_work(pet: &Pet, balance: &GameBalance) -> bool {
    !pet.is_sleeping
        && pet.stats.energy >= balance.work_energy_loss
        && pet.stats.happiness >= balance.work_happiness_loss
        && pet.stats.hunger >= balance.work_hunger_loss
}

pub fn can_level_up(pet: &Pet, balance: &GameBalance) -> bool {
    !pet.is_sleeping
        && pet.game_data.experience
            >= pet.game_data.level.saturating_mul(balance.exp_per_level)
}

/// Whether `action` is allowed by the pet's state alone
pub fn is_eligible(action: PetAction, pet: &Pet, balance: &GameBalance) -> bool {
    match action {
        PetAction::Feed => can_feed(pet, balance),
        PetAction::Play => can_play(pet, balance),
        PetAction::Work => can_work(pet, balance),
        PetAction::LevelUp => can_level_up(pet, balance),
        PetAction::Sleep => !pet.is_sleeping,
        PetAction::WakeUp => pet.is_sleeping,
    }
}

/// Rendered state of one action button
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionButton {
    pub action: PetAction,
    pub enabled: bool,
    /// Spinner: this action is the one in flight
    pub pending: bool,
}

/// Button states for every action. While any action is in flight all
/// buttons are disabled.
pub fn action_buttons(
    pet: &Pet,
    balance: &GameBalance,
    in_flight: Option<PetAction>,
) -> Vec<ActionButton> {
    PetAction::ALL
        .iter()
        .map(|&action| ActionButton {
            action,
            enabled: in_flight.is_none() && is_eligible(action, pet, balance),
            pending: in_flight == Some(action),
        })
        .collect()
}
