//! Wallet chip: shortened address and copy-to-clipboard.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::WalletAccount;

/// Clipboard access provided by the host (browser, desktop shell, ...)
pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<()>;
}

/// `0x1234...cdef` form of an address. Short addresses are returned as-is.
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// What the wallet chip shows
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WalletProfile {
    pub address: String,
    pub short: String,
}

impl WalletProfile {
    /// `None` when no wallet is connected; the chip is hidden
    pub fn from_account(account: Option<&WalletAccount>) -> Option<Self> {
        account.map(|acc| Self {
            address: acc.address.clone(),
            short: short_address(&acc.address),
        })
    }

    /// Copy the full address. Denied or missing clipboard access is ignored.
    pub fn copy_address(&self, clipboard: &dyn Clipboard) -> bool {
        match clipboard.write_text(&self.address) {
            Ok(()) => true,
            Err(e) => {
                debug!("Clipboard write failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingClipboard {
        text: Mutex<Option<String>>,
        deny: bool,
    }

    impl Clipboard for RecordingClipboard {
        fn write_text(&self, text: &str) -> Result<()> {
            if self.deny {
                anyhow::bail!("permission denied");
            }
            *self.text.lock().unwrap() = Some(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_short_address() {
        assert_eq!(
            short_address("0x7a3f9c21b4d5e6f70812a9bc3d4e5f60718293a4"),
            "0x7a3f...93a4"
        );
        assert_eq!(short_address("0xabc"), "0xabc");
    }

    #[test]
    fn test_no_account_no_chip() {
        assert_eq!(WalletProfile::from_account(None), None);
    }

    #[test]
    fn test_copy_address() {
        let account = WalletAccount {
            address: "0x7a3f9c21b4d5e6f70812a9bc3d4e5f60718293a4".to_string(),
        };
        let profile = WalletProfile::from_account(Some(&account)).unwrap();

        let clipboard = RecordingClipboard::default();
        assert!(profile.copy_address(&clipboard));
        assert_eq!(
            clipboard.text.lock().unwrap().as_deref(),
            Some(account.address.as_str())
        );

        let denied = RecordingClipboard {
            deny: true,
            ..Default::default()
        };
        assert!(!profile.copy_address(&denied));
    }
}
