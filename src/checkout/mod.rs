//! Donation checkout
//!
//! - `types` - payments, transfers and observable session state
//! - `pure` - decision functions with no side effects
//! - `orchestrator` - the preview/execute state machine
//! - `error` - user-facing failure taxonomy

pub mod error;
pub mod orchestrator;
pub mod pure;
pub mod types;

pub use error::CheckoutError;
pub use orchestrator::{CheckoutOrchestrator, CheckoutRequest};
pub use types::{
    ApprovalEntry, ChainPayoutAddresses, CheckoutPhase, CheckoutReport, CheckoutState,
    DonationPayment, ExecutionProgress, ExecutionState, MissingPayout, PaymentValidation,
    SupportedToken, TokenBalances, Transfer, TransferStatus,
};
