//! # gap-core
//!
//! Core logic behind project timelines and donation checkout for grant
//! tracking: merging milestones shared by several grants, resolving payout
//! addresses, and driving the donation checkout flow over an injected wallet.
//!
//! ## Modules
//!
//! - `abstractions` - Trait-based abstractions for the wallet, chain and indexer
//! - `app` - Configuration and logging for the `gap` binary
//! - `checkout` - Donation checkout state machine
//! - `error` - Crate-wide error type
//! - `milestones` - Timeline milestone model and grant milestone merging
//! - `payout` - Payout address resolution and display
//! - `wallet` - Waiting for a wallet client on the expected chain
pub mod abstractions;
pub mod app;
pub mod checkout;
pub mod error;
pub mod milestones;
pub mod payout;
pub mod wallet;

pub use error::{Error, Result};
