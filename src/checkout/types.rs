//! Checkout data model

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Token a donation can be paid in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedToken {
    pub address: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    pub chain_id: u64,
    pub chain_name: String,
    pub is_native: bool,
}

/// One donation line item selected by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationPayment {
    pub project_id: String,
    /// Decimal amount in token units, e.g. "12.5"
    pub amount: String,
    pub token: SupportedToken,
    pub chain_id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    Success,
    Error,
}

/// Result of executing one payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub hash: String,
    pub project_id: String,
    pub status: TransferStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Transfer {
    pub fn success(project_id: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            project_id: project_id.into(),
            status: TransferStatus::Success,
            error: None,
        }
    }

    pub fn failed(project_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            hash: String::new(),
            project_id: project_id.into(),
            status: TransferStatus::Error,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == TransferStatus::Success
    }
}

/// Token allowance requirement discovered during execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalEntry {
    pub token_address: String,
    pub token_symbol: String,
    pub chain_id: u64,
    pub amount: String,
    pub needs_approval: bool,
}

/// Where a checkout session currently is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckoutPhase {
    #[default]
    Idle,
    Previewing,
    Validating,
    SwitchingNetwork,
    Approving,
    Donating,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionState {
    pub phase: CheckoutPhase,
}

/// Observable state of one checkout session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutState {
    pub transfers: Vec<Transfer>,
    pub is_executing: bool,
    pub validation_errors: Vec<String>,
    pub show_steps_preview: bool,
    pub execution_state: ExecutionState,
    pub approval_info: Vec<ApprovalEntry>,
}

/// Answer of the payment validator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentValidation {
    pub valid: bool,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl PaymentValidation {
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    pub fn invalid(errors: Vec<String>) -> Self {
        Self {
            valid: false,
            errors,
        }
    }
}

/// Formatted balances keyed by `"{chainId}:{tokenAddress}"`
pub type TokenBalances = HashMap<String, String>;

/// `projectId -> chainId -> payout address`
pub type ChainPayoutAddresses = HashMap<String, HashMap<u64, String>>;

/// Progress reported by the transfer executor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionProgress {
    Phase(CheckoutPhase),
    ApprovalRequired(ApprovalEntry),
    TransferSubmitted { project_id: String, hash: String },
}

/// A project whose payout address is unknown on a chain it is paid on
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingPayout {
    pub project_id: String,
    pub chain_id: u64,
}

/// Summary of a finished `proceed_with_checkout` call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutReport {
    pub transfers: Vec<Transfer>,
    pub succeeded: usize,
    pub failed: usize,
    pub approvals_performed: bool,
}

impl CheckoutReport {
    pub fn is_partial_failure(&self) -> bool {
        self.succeeded > 0 && self.failed > 0
    }
}
