//! Abstraction layers for external collaborators
//!
//! This module provides trait-based abstractions for the wallet, the chain
//! and the indexer so checkout and payout logic can be tested and injected.

pub mod address;
pub mod executor;
pub mod network;
pub mod notifier;
pub mod project;
pub mod wallet;

pub use address::{AddressValidator, EvmAddressValidator};
pub use executor::{ExecutionCall, MockTransferExecutor, ProgressSink, TransferExecutor};
pub use network::{MockNetworkSwitcher, NetworkSwitcher};
pub use notifier::{Notification, Notifier, RecordingNotifier, TracingNotifier};
pub use project::{
    PayoutAddressField, ProjectGrant, ProjectGrantData, ProjectGrantDetails, ProjectLookup,
    ProjectRecord, StaticProjectLookup,
};
pub use wallet::{MockWalletContext, WalletClient, WalletContext};
