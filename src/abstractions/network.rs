//! Wallet network switching abstraction

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Trait for asking the wallet to change its active chain
#[async_trait]
pub trait NetworkSwitcher: Send + Sync {
    /// Resolve once the wallet reports `chain_id` as active.
    /// Rejection by the user is an error.
    async fn switch_network(&self, chain_id: u64) -> Result<()>;
}

/// Mock implementation of NetworkSwitcher for testing
#[derive(Debug, Clone, Default)]
pub struct MockNetworkSwitcher {
    rejected_chains: HashSet<u64>,
    reject_all: bool,
    /// Chain cell of a mock wallet that follows successful switches
    linked_chain: Option<Arc<AtomicU64>>,
    calls: Arc<Mutex<Vec<u64>>>,
}

impl MockNetworkSwitcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every switch request
    pub fn rejecting() -> Self {
        Self {
            reject_all: true,
            ..Self::default()
        }
    }

    /// Reject switches to one chain
    pub fn with_rejected_chain(mut self, chain_id: u64) -> Self {
        self.rejected_chains.insert(chain_id);
        self
    }

    /// Update a wallet's chain cell after every successful switch
    pub fn linked_to(mut self, chain: Arc<AtomicU64>) -> Self {
        self.linked_chain = Some(chain);
        self
    }

    /// Chains requested so far, in call order
    pub async fn calls(&self) -> Vec<u64> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl NetworkSwitcher for MockNetworkSwitcher {
    async fn switch_network(&self, chain_id: u64) -> Result<()> {
        self.calls.lock().await.push(chain_id);

        if self.reject_all || self.rejected_chains.contains(&chain_id) {
            return Err(anyhow::anyhow!("User rejected the request"));
        }
        if let Some(chain) = &self.linked_chain {
            chain.store(chain_id, Ordering::SeqCst);
        }
        Ok(())
    }
}
