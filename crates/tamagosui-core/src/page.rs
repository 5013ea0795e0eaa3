//! ============================================================================
//! Home Page - Wallet status and pet-or-adopt branching
//! ============================================================================

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::{GameClient, QueryState};
use crate::types::{Pet, WalletAccount};
use crate::wallet::WalletProfile;

/// Main panel of the home page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "page", content = "pet", rename_all = "snake_case")]
pub enum PageState {
    /// No wallet connected
    ConnectWallet,
    /// Owned-pet query still running
    LoadingPet,
    /// Wallet owns a pet: show the dashboard
    Pet(Pet),
    /// Wallet has no pet yet: show adoption
    Adopt,
}

pub fn resolve_page(account: Option<&WalletAccount>, owned_pet: QueryState<Option<Pet>>) -> PageState {
    if account.is_none() {
        return PageState::ConnectWallet;
    }
    match owned_pet {
        QueryState::Pending => PageState::LoadingPet,
        QueryState::Ready(Some(pet)) => PageState::Pet(pet),
        QueryState::Ready(None) => PageState::Adopt,
    }
}

/// Composed home page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HomePage {
    pub wallet: Option<WalletProfile>,
    pub main: PageState,
}

impl HomePage {
    /// Query the collaborator and compose the page
    pub async fn load(client: &dyn GameClient) -> Result<Self> {
        let account = client.current_account().await;
        let owned_pet = match &account {
            Some(acc) => QueryState::Ready(client.owned_pet(&acc.address).await?),
            None => QueryState::Pending,
        };

        let main = resolve_page(account.as_ref(), owned_pet);
        debug!("Home page resolved: {:?}", main);

        Ok(Self {
            wallet: WalletProfile::from_account(account.as_ref()),
            main,
        })
    }
}
