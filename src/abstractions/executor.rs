//! Transfer executor abstraction
//!
//! The executor wraps the on-chain side of a donation: balance checks,
//! token approvals and the transfers themselves.

use crate::abstractions::wallet::WalletClient;
use crate::checkout::types::{
    ApprovalEntry, CheckoutPhase, DonationPayment, ExecutionProgress, PaymentValidation,
    TokenBalances, Transfer,
};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Receives progress while donations execute
pub trait ProgressSink: Send + Sync {
    fn report(&self, event: ExecutionProgress);
}

/// Trait for validating and executing donation batches
#[async_trait]
pub trait TransferExecutor: Send + Sync {
    /// Check the batch against the user's balances
    async fn validate_payments(
        &self,
        payments: &[DonationPayment],
        balances: &TokenBalances,
    ) -> Result<PaymentValidation>;

    /// Execute a batch on the wallet's current chain.
    ///
    /// Per-payment failures are reported as `Transfer`s with an error status;
    /// `Err` is reserved for failures of the whole batch.
    async fn execute_donations(
        &self,
        payments: &[DonationPayment],
        wallet: &WalletClient,
        progress: &dyn ProgressSink,
    ) -> Result<Vec<Transfer>>;
}

/// One recorded `execute_donations` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionCall {
    pub chain_id: u64,
    pub project_ids: Vec<String>,
}

/// Mock implementation of TransferExecutor for testing
#[derive(Debug, Clone, Default)]
pub struct MockTransferExecutor {
    validation_errors: Vec<String>,
    validation_failure: Option<String>,
    failing_projects: HashSet<String>,
    execution_error: Option<String>,
    approvals: Vec<ApprovalEntry>,
    validate_calls: Arc<Mutex<usize>>,
    execute_calls: Arc<Mutex<Vec<ExecutionCall>>>,
}

impl MockTransferExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make validation report the given errors
    pub fn with_validation_errors(mut self, errors: &[&str]) -> Self {
        self.validation_errors = errors.iter().map(|e| e.to_string()).collect();
        self
    }

    /// Make the validator itself fail
    pub fn with_validation_failure(mut self, error: &str) -> Self {
        self.validation_failure = Some(error.to_string());
        self
    }

    /// Produce an error transfer for this project
    pub fn with_failed_project(mut self, project_id: &str) -> Self {
        self.failing_projects.insert(project_id.to_string());
        self
    }

    /// Make every execution fail outright
    pub fn with_execution_error(mut self, error: &str) -> Self {
        self.execution_error = Some(error.to_string());
        self
    }

    /// Report an approval step before donating on the approval's chain
    pub fn with_approval(mut self, approval: ApprovalEntry) -> Self {
        self.approvals.push(approval);
        self
    }

    pub async fn validate_call_count(&self) -> usize {
        *self.validate_calls.lock().await
    }

    pub async fn execute_calls(&self) -> Vec<ExecutionCall> {
        self.execute_calls.lock().await.clone()
    }
}

#[async_trait]
impl TransferExecutor for MockTransferExecutor {
    async fn validate_payments(
        &self,
        _payments: &[DonationPayment],
        _balances: &TokenBalances,
    ) -> Result<PaymentValidation> {
        *self.validate_calls.lock().await += 1;

        if let Some(error) = &self.validation_failure {
            return Err(anyhow::anyhow!(error.clone()));
        }
        if self.validation_errors.is_empty() {
            Ok(PaymentValidation::ok())
        } else {
            Ok(PaymentValidation::invalid(self.validation_errors.clone()))
        }
    }

    async fn execute_donations(
        &self,
        payments: &[DonationPayment],
        wallet: &WalletClient,
        progress: &dyn ProgressSink,
    ) -> Result<Vec<Transfer>> {
        self.execute_calls.lock().await.push(ExecutionCall {
            chain_id: wallet.chain_id,
            project_ids: payments.iter().map(|p| p.project_id.clone()).collect(),
        });

        if let Some(error) = &self.execution_error {
            return Err(anyhow::anyhow!(error.clone()));
        }

        let approvals: Vec<_> = self
            .approvals
            .iter()
            .filter(|a| a.chain_id == wallet.chain_id)
            .collect();
        if !approvals.is_empty() {
            progress.report(ExecutionProgress::Phase(CheckoutPhase::Approving));
            for approval in approvals {
                progress.report(ExecutionProgress::ApprovalRequired(approval.clone()));
            }
        }

        progress.report(ExecutionProgress::Phase(CheckoutPhase::Donating));
        let transfers = payments
            .iter()
            .enumerate()
            .map(|(index, payment)| {
                if self.failing_projects.contains(&payment.project_id) {
                    return Transfer::failed(&payment.project_id, "Transaction reverted");
                }
                let hash = format!("0x{:064x}", (wallet.chain_id << 16) + index as u64);
                progress.report(ExecutionProgress::TransferSubmitted {
                    project_id: payment.project_id.clone(),
                    hash: hash.clone(),
                });
                Transfer::success(&payment.project_id, hash)
            })
            .collect();
        Ok(transfers)
    }
}
