//! Donation payout addresses
//!
//! - `pure` - address precedence rules and display helpers
//! - `resolver` - concurrent, generation-gated resolution against the indexer

pub mod pure;
pub mod resolver;

pub use pure::{
    chain_payout_addresses, format_address, resolve_payout_address, PayoutAddressMap, PayoutItem,
    NOT_CONFIGURED,
};
pub use resolver::{PayoutAddressResolver, PayoutSnapshot, ResolutionRound, PAYOUT_LOAD_WARNING};
