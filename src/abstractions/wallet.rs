//! Wallet context abstraction
//!
//! Replaces ambient wallet-library state with an injected handle.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Signing client bound to an account and chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletClient {
    pub account: Option<String>,
    pub chain_id: u64,
}

impl WalletClient {
    pub fn new(account: impl Into<String>, chain_id: u64) -> Self {
        Self {
            account: Some(account.into()),
            chain_id,
        }
    }

    /// Connected and on the expected chain
    pub fn is_ready_for(&self, chain_id: u64) -> bool {
        self.account.as_deref().is_some_and(|a| !a.is_empty()) && self.chain_id == chain_id
    }
}

/// Trait for the connected wallet
#[async_trait]
pub trait WalletContext: Send + Sync {
    /// Connected account address, if any
    fn account(&self) -> Option<String>;

    /// Fetch a fresh signing client. `Ok(None)` while the wallet is not ready.
    async fn fresh_client(&self) -> Result<Option<WalletClient>>;
}

/// Mock implementation of WalletContext for testing
#[derive(Debug, Clone)]
pub struct MockWalletContext {
    account: Option<String>,
    chain: Arc<AtomicU64>,
    scripted: Arc<Mutex<VecDeque<Result<Option<WalletClient>, String>>>>,
    client_requests: Arc<Mutex<usize>>,
}

impl MockWalletContext {
    /// Wallet connected with `account` on `chain_id`
    pub fn connected(account: &str, chain_id: u64) -> Self {
        Self {
            account: Some(account.to_string()),
            chain: Arc::new(AtomicU64::new(chain_id)),
            scripted: Arc::new(Mutex::new(VecDeque::new())),
            client_requests: Arc::new(Mutex::new(0)),
        }
    }

    pub fn disconnected() -> Self {
        Self {
            account: None,
            ..Self::connected("", 0)
        }
    }

    /// Shared chain cell, for linking a mock network switcher
    pub fn chain_cell(&self) -> Arc<AtomicU64> {
        self.chain.clone()
    }

    /// Queue a client answer returned before falling back to the live state
    pub async fn push_client(&self, client: Option<WalletClient>) {
        self.scripted.lock().await.push_back(Ok(client));
    }

    /// Queue a provider error
    pub async fn push_error(&self, error: &str) {
        self.scripted.lock().await.push_back(Err(error.to_string()));
    }

    pub async fn client_request_count(&self) -> usize {
        *self.client_requests.lock().await
    }
}

#[async_trait]
impl WalletContext for MockWalletContext {
    fn account(&self) -> Option<String> {
        self.account.clone()
    }

    async fn fresh_client(&self) -> Result<Option<WalletClient>> {
        *self.client_requests.lock().await += 1;

        if let Some(next) = self.scripted.lock().await.pop_front() {
            return next.map_err(|e| anyhow::anyhow!(e));
        }
        Ok(self.account.as_ref().map(|account| WalletClient {
            account: Some(account.clone()),
            chain_id: self.chain.load(Ordering::SeqCst),
        }))
    }
}
