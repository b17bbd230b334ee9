//! Checkout failure taxonomy
//!
//! The `Display` text of every variant is what the user sees.

use super::types::MissingPayout;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("Connect your wallet to continue with checkout")]
    WalletNotConnected,

    #[error("Select at least one project to donate to")]
    NoPaymentsSelected,

    #[error(
        "Some projects are missing payout addresses for the selected chains: {}",
        describe_missing(.missing)
    )]
    MissingPayoutAddress { missing: Vec<MissingPayout> },

    #[error("{}", .errors.first().map(String::as_str).unwrap_or("Payment validation failed"))]
    ValidationFailed { errors: Vec<String> },

    #[error("Failed to switch network to chain {chain_id}: {reason}")]
    NetworkSwitchRejected { chain_id: u64, reason: String },

    #[error("Wallet client not ready on chain {chain_id} after {attempts} attempts")]
    WalletClientUnavailable { chain_id: u64, attempts: u32 },

    #[error("Checkout failed: {0}")]
    ExecutionException(String),
}

fn describe_missing(missing: &[MissingPayout]) -> String {
    missing
        .iter()
        .map(|m| format!("{} (chain {})", m.project_id, m.chain_id))
        .collect::<Vec<_>>()
        .join(", ")
}

impl CheckoutError {
    /// Whether the failure happened before any transfer was attempted
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            CheckoutError::WalletNotConnected
                | CheckoutError::NoPaymentsSelected
                | CheckoutError::MissingPayoutAddress { .. }
                | CheckoutError::ValidationFailed { .. }
        )
    }
}
