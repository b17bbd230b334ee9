//! Donation checkout orchestration
//!
//! Drives one checkout session through preview, validation, network
//! reconciliation and execution. Every failure is surfaced through the
//! injected [`Notifier`] before it is returned, so callers never have to
//! report errors themselves.

use super::error::CheckoutError;
use super::pure;
use super::types::{
    ChainPayoutAddresses, CheckoutPhase, CheckoutReport, CheckoutState, DonationPayment,
    ExecutionProgress, TokenBalances, Transfer,
};
use crate::abstractions::{Notifier, NetworkSwitcher, ProgressSink, TransferExecutor, WalletContext};
use crate::wallet::{wait_for_wallet_client, RetryPolicy};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Inputs of one `proceed_with_checkout` call
#[derive(Debug, Clone, Copy)]
pub struct CheckoutRequest<'a> {
    pub payments: &'a [DonationPayment],
    pub chain_payout_addresses: &'a ChainPayoutAddresses,
    pub balances: &'a TokenBalances,
    /// Chain the wallet is on when the call starts
    pub active_chain_id: Option<u64>,
}

/// Two-phase checkout state machine over injected collaborators
pub struct CheckoutOrchestrator {
    executor: Arc<dyn TransferExecutor>,
    network: Arc<dyn NetworkSwitcher>,
    wallet: Arc<dyn WalletContext>,
    notifier: Arc<dyn Notifier>,
    wallet_policy: RetryPolicy,
    state: Arc<Mutex<CheckoutState>>,
}

impl CheckoutOrchestrator {
    pub fn new(
        executor: Arc<dyn TransferExecutor>,
        network: Arc<dyn NetworkSwitcher>,
        wallet: Arc<dyn WalletContext>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            executor,
            network,
            wallet,
            notifier,
            wallet_policy: RetryPolicy::default(),
            state: Arc::new(Mutex::new(CheckoutState::default())),
        }
    }

    /// Set how long to wait for a wallet client after a network switch
    pub fn with_wallet_policy(mut self, policy: RetryPolicy) -> Self {
        self.wallet_policy = policy;
        self
    }

    /// Snapshot of the session state
    pub fn state(&self) -> CheckoutState {
        self.lock_state().clone()
    }

    /// Whether donations are being executed right now.
    ///
    /// Not a lock: callers disable their checkout control while this is set.
    pub fn is_executing(&self) -> bool {
        self.lock_state().is_executing
    }

    /// Start a fresh session
    pub fn reset(&self) {
        *self.lock_state() = CheckoutState::default();
    }

    /// Open the steps preview after checking the session preconditions.
    ///
    /// Nothing is executed here.
    pub fn request_checkout(&self, payments: &[DonationPayment]) -> Result<(), CheckoutError> {
        let account = self.wallet.account();
        if let Err(err) = pure::check_checkout_preconditions(account.as_deref(), payments) {
            warn!("Checkout request rejected: {}", err);
            self.notifier.error(&err.to_string());
            return Err(err);
        }

        self.update(|state| {
            state.show_steps_preview = true;
            state.execution_state.phase = CheckoutPhase::Previewing;
        });
        debug!("Showing checkout preview for {} payments", payments.len());
        Ok(())
    }

    /// Close the preview without executing anything
    pub fn cancel_preview(&self) {
        self.update(|state| {
            state.show_steps_preview = false;
            if state.execution_state.phase == CheckoutPhase::Previewing {
                state.execution_state.phase = CheckoutPhase::Idle;
            }
        });
    }

    /// Validate the batch, reconcile the wallet network and execute donations.
    ///
    /// `set_missing_payouts` receives the affected project ids when payout
    /// addresses are missing. On `Err` the failure has already been notified.
    pub async fn proceed_with_checkout<F>(
        &self,
        request: CheckoutRequest<'_>,
        set_missing_payouts: F,
    ) -> Result<CheckoutReport, CheckoutError>
    where
        F: FnOnce(Vec<String>),
    {
        self.update(|state| {
            state.show_steps_preview = false;
            state.validation_errors.clear();
            state.transfers.clear();
            state.approval_info.clear();
            state.execution_state.phase = CheckoutPhase::Validating;
        });

        let missing = pure::find_missing_payouts(request.payments, request.chain_payout_addresses);
        if !missing.is_empty() {
            set_missing_payouts(pure::missing_project_ids(&missing));
            return Err(self.fail(CheckoutError::MissingPayoutAddress { missing }));
        }

        self.validate(request.payments, request.balances).await?;

        self.update(|state| state.is_executing = true);
        info!(
            "Executing {} donations across {} chains",
            request.payments.len(),
            pure::required_chains(request.payments).len()
        );

        let (transfers, aborted) = self.execute_by_chain(request).await;
        self.finish(transfers, aborted)
    }

    async fn validate(
        &self,
        payments: &[DonationPayment],
        balances: &TokenBalances,
    ) -> Result<(), CheckoutError> {
        let errors = match self.executor.validate_payments(payments, balances).await {
            Ok(validation) if validation.valid => return Ok(()),
            Ok(validation) => validation.errors,
            Err(e) => vec![format!("Failed to validate payments: {}", e)],
        };

        self.update(|state| state.validation_errors = errors.clone());
        Err(self.fail(CheckoutError::ValidationFailed { errors }))
    }

    /// Run switch, wallet and execute stages for each chain group in order.
    ///
    /// Stops at the first failing stage; transfers of earlier groups are kept.
    async fn execute_by_chain(
        &self,
        request: CheckoutRequest<'_>,
    ) -> (Vec<Transfer>, Option<CheckoutError>) {
        let mut active_chain = request.active_chain_id;
        let mut transfers: Vec<Transfer> = Vec::new();
        let progress = StateProgress { state: &self.state };

        for (chain_id, group) in pure::group_by_chain(request.payments) {
            if pure::needs_network_switch(active_chain, chain_id) {
                self.update(|state| state.execution_state.phase = CheckoutPhase::SwitchingNetwork);
                debug!("Switching network from {:?} to {}", active_chain, chain_id);

                if let Err(e) = self.network.switch_network(chain_id).await {
                    let reason = e.to_string();
                    return (
                        transfers,
                        Some(CheckoutError::NetworkSwitchRejected { chain_id, reason }),
                    );
                }
                active_chain = Some(chain_id);
            }

            let client =
                match wait_for_wallet_client(self.wallet.as_ref(), chain_id, self.wallet_policy)
                    .await
                {
                    Ok(client) => client,
                    Err(err) => return (transfers, Some(err)),
                };

            match self
                .executor
                .execute_donations(&group, &client, &progress)
                .await
            {
                Ok(batch) => {
                    debug!("Chain {} produced {} transfers", chain_id, batch.len());
                    transfers.extend(batch);
                    self.update(|state| state.transfers = transfers.clone());
                }
                Err(e) => {
                    return (
                        transfers,
                        Some(CheckoutError::ExecutionException(e.to_string())),
                    );
                }
            }
        }

        (transfers, None)
    }

    fn finish(
        &self,
        transfers: Vec<Transfer>,
        aborted: Option<CheckoutError>,
    ) -> Result<CheckoutReport, CheckoutError> {
        let approvals_performed = self
            .lock_state()
            .approval_info
            .iter()
            .any(|approval| approval.needs_approval);
        let (succeeded, failed) = pure::summarize_transfers(&transfers);

        let outcome = pure::classify_outcome(&transfers, approvals_performed);
        if let Some(message) = outcome.success {
            self.notifier.success(message);
        }
        if let Some(message) = outcome.failure {
            self.notifier.error(message);
        }

        self.update(|state| {
            state.transfers = transfers.clone();
            state.is_executing = false;
        });

        if let Some(err) = aborted {
            return Err(self.fail(err));
        }

        let phase = if succeeded == 0 && failed > 0 {
            CheckoutPhase::Failed
        } else {
            CheckoutPhase::Completed
        };
        self.update(|state| state.execution_state.phase = phase);
        info!("Checkout finished: {} succeeded, {} failed", succeeded, failed);

        Ok(CheckoutReport {
            transfers,
            succeeded,
            failed,
            approvals_performed,
        })
    }

    /// Surface `err` and leave the session retryable
    fn fail(&self, err: CheckoutError) -> CheckoutError {
        warn!("Checkout aborted: {}", err);
        match &err {
            CheckoutError::ValidationFailed { errors } if !errors.is_empty() => {
                for message in errors {
                    self.notifier.error(message);
                }
            }
            _ => self.notifier.error(&err.to_string()),
        }

        self.update(|state| {
            state.is_executing = false;
            state.execution_state.phase = CheckoutPhase::Failed;
        });
        err
    }

    fn update(&self, apply: impl FnOnce(&mut CheckoutState)) {
        apply(&mut self.lock_state());
    }

    fn lock_state(&self) -> MutexGuard<'_, CheckoutState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Feeds executor progress into the session state
struct StateProgress<'a> {
    state: &'a Mutex<CheckoutState>,
}

impl ProgressSink for StateProgress<'_> {
    fn report(&self, event: ExecutionProgress) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match event {
            ExecutionProgress::Phase(phase) => state.execution_state.phase = phase,
            ExecutionProgress::ApprovalRequired(approval) => {
                debug!(
                    "Approval required for {} on chain {}",
                    approval.token_symbol, approval.chain_id
                );
                state.approval_info.push(approval);
            }
            ExecutionProgress::TransferSubmitted { project_id, hash } => {
                debug!("Donation to {} submitted: {}", project_id, hash);
            }
        }
    }
}
