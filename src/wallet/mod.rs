//! Wallet client readiness
//!
//! After a network switch the wallet library takes a moment to hand out a
//! client bound to the new chain. Signing with a stale client would target
//! the previous network, so execution waits here until the client matches.

use crate::abstractions::wallet::{WalletClient, WalletContext};
use crate::checkout::CheckoutError;
use std::time::Duration;
use tracing::{debug, warn};

/// How long to wait for a usable wallet client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            retry_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, retry_delay: Duration) -> Self {
        Self {
            max_attempts,
            retry_delay,
        }
    }

    /// Policy without sleeping between attempts
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }
}

/// Poll `wallet` until it yields a connected client on `chain_id`.
///
/// Provider errors count as failed attempts.
pub async fn wait_for_wallet_client(
    wallet: &dyn WalletContext,
    chain_id: u64,
    policy: RetryPolicy,
) -> Result<WalletClient, CheckoutError> {
    let attempts = policy.max_attempts.max(1);

    for attempt in 1..=attempts {
        match wallet.fresh_client().await {
            Ok(Some(client)) if client.is_ready_for(chain_id) => {
                debug!("Wallet client ready on chain {} (attempt {})", chain_id, attempt);
                return Ok(client);
            }
            Ok(Some(client)) => {
                debug!(
                    "Wallet client on chain {} while waiting for {} (attempt {}/{})",
                    client.chain_id, chain_id, attempt, attempts
                );
            }
            Ok(None) => {
                debug!("Wallet client unavailable (attempt {}/{})", attempt, attempts);
            }
            Err(e) => {
                warn!("Failed to get wallet client (attempt {}/{}): {}", attempt, attempts, e);
            }
        }

        if attempt < attempts && !policy.retry_delay.is_zero() {
            tokio::time::sleep(policy.retry_delay).await;
        }
    }

    Err(CheckoutError::WalletClientUnavailable { chain_id, attempts })
}
