//! ============================================================================
//! Game Client - Collaborator interface for wallet and chain access
//! ============================================================================
//! The dashboard never talks to the chain directly. Wallet connection,
//! transaction signing, and confirmation live behind this trait so the
//! front-end can plug in its own wallet adapter.
//! ============================================================================

use anyhow::Result;
use async_trait::async_trait;

use crate::types::{GameBalance, Pet, PetAction, WalletAccount};

/// Queries and mutations the client core consumes
#[async_trait]
pub trait GameClient: Send + Sync {
    /// Currently connected wallet, if any
    async fn current_account(&self) -> Option<WalletAccount>;

    /// Game balance configuration (fetched once per session)
    async fn game_balance(&self) -> Result<GameBalance>;

    /// The pet owned by `owner`, or `None` if it has not adopted one
    async fn owned_pet(&self, owner: &str) -> Result<Option<Pet>>;

    /// Submit an action for `pet_id` and wait until the chain settles it
    async fn execute(&self, action: PetAction, pet_id: &str) -> Result<()>;
}

/// Loading state of a collaborator query
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    Pending,
    Ready(T),
}

impl<T> QueryState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, QueryState::Pending)
    }

    pub fn ready(self) -> Option<T> {
        match self {
            QueryState::Pending => None,
            QueryState::Ready(value) => Some(value),
        }
    }
}
