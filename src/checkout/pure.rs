//! Pure checkout decisions (no I/O, no side effects)
//!
//! Everything the orchestrator decides lives here so it can be tested
//! without wallets, executors or notifiers.

use super::error::CheckoutError;
use super::types::{ChainPayoutAddresses, DonationPayment, MissingPayout, Transfer};

pub const DONATION_SUCCESS: &str = "Donations submitted successfully";
pub const DONATION_SUCCESS_WITH_APPROVAL: &str =
    "Tokens approved and donations submitted successfully";
pub const DONATION_PARTIAL_FAILURE: &str =
    "Some donations failed. Please review the transaction results.";

/// Check the preconditions of opening the steps preview, first failure wins
pub fn check_checkout_preconditions(
    account: Option<&str>,
    payments: &[DonationPayment],
) -> Result<(), CheckoutError> {
    if account.map_or(true, str::is_empty) {
        return Err(CheckoutError::WalletNotConnected);
    }
    if payments.is_empty() {
        return Err(CheckoutError::NoPaymentsSelected);
    }
    Ok(())
}

/// Distinct chains referenced by the batch, in first-encounter order
pub fn required_chains(payments: &[DonationPayment]) -> Vec<u64> {
    let mut chains = Vec::new();
    for payment in payments {
        if !chains.contains(&payment.chain_id) {
            chains.push(payment.chain_id);
        }
    }
    chains
}

/// Split the batch into per-chain groups, preserving payment order inside each
pub fn group_by_chain(payments: &[DonationPayment]) -> Vec<(u64, Vec<DonationPayment>)> {
    required_chains(payments)
        .into_iter()
        .map(|chain_id| {
            let group = payments
                .iter()
                .filter(|p| p.chain_id == chain_id)
                .cloned()
                .collect();
            (chain_id, group)
        })
        .collect()
}

/// Every `(project, chain)` pair of the batch without a payout address
pub fn find_missing_payouts(
    payments: &[DonationPayment],
    addresses: &ChainPayoutAddresses,
) -> Vec<MissingPayout> {
    let mut missing: Vec<MissingPayout> = Vec::new();
    for payment in payments {
        let known = addresses
            .get(&payment.project_id)
            .and_then(|per_chain| per_chain.get(&payment.chain_id))
            .is_some_and(|address| !address.is_empty());
        let entry = MissingPayout {
            project_id: payment.project_id.clone(),
            chain_id: payment.chain_id,
        };
        if !known && !missing.contains(&entry) {
            missing.push(entry);
        }
    }
    missing
}

/// Project ids affected by missing payouts, deduplicated in order
pub fn missing_project_ids(missing: &[MissingPayout]) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for entry in missing {
        if !ids.contains(&entry.project_id) {
            ids.push(entry.project_id.clone());
        }
    }
    ids
}

/// Whether a network switch is needed before executing on `target`
pub fn needs_network_switch(active_chain_id: Option<u64>, target: u64) -> bool {
    active_chain_id != Some(target)
}

/// Count successful and failed transfers
pub fn summarize_transfers(transfers: &[Transfer]) -> (usize, usize) {
    let succeeded = transfers.iter().filter(|t| t.is_success()).count();
    (succeeded, transfers.len() - succeeded)
}

/// Notifications to emit for an execution result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeMessages {
    pub success: Option<&'static str>,
    pub failure: Option<&'static str>,
}

/// Decide which notifications an execution result deserves.
///
/// Success and failure are reported independently so a partial failure never
/// hides the donations that did go through.
pub fn classify_outcome(transfers: &[Transfer], approvals_performed: bool) -> OutcomeMessages {
    let (succeeded, failed) = summarize_transfers(transfers);
    let success = (succeeded > 0).then_some(if approvals_performed {
        DONATION_SUCCESS_WITH_APPROVAL
    } else {
        DONATION_SUCCESS
    });
    let failure = (failed > 0).then_some(DONATION_PARTIAL_FAILURE);
    OutcomeMessages { success, failure }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::types::SupportedToken;
    use std::collections::HashMap;

    fn payment(project_id: &str, chain_id: u64) -> DonationPayment {
        DonationPayment {
            project_id: project_id.to_string(),
            amount: "1".to_string(),
            token: SupportedToken {
                address: "0x0000000000000000000000000000000000000000".to_string(),
                symbol: "ETH".to_string(),
                name: "Ether".to_string(),
                decimals: 18,
                chain_id,
                chain_name: format!("chain-{chain_id}"),
                is_native: true,
            },
            chain_id,
        }
    }

    #[test]
    fn test_wallet_checked_before_payments() {
        assert_eq!(
            check_checkout_preconditions(None, &[]),
            Err(CheckoutError::WalletNotConnected)
        );
        assert_eq!(
            check_checkout_preconditions(Some(""), &[payment("a", 1)]),
            Err(CheckoutError::WalletNotConnected)
        );
        assert_eq!(
            check_checkout_preconditions(Some("0xabc"), &[]),
            Err(CheckoutError::NoPaymentsSelected)
        );
        assert!(check_checkout_preconditions(Some("0xabc"), &[payment("a", 1)]).is_ok());
    }

    #[test]
    fn test_required_chains_and_grouping() {
        let payments = vec![payment("a", 10), payment("b", 1), payment("c", 10)];
        assert_eq!(required_chains(&payments), vec![10, 1]);

        let groups = group_by_chain(&payments);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, 10);
        let ids: Vec<_> = groups[0].1.iter().map(|p| p.project_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_find_missing_payouts() {
        let payments = vec![payment("a", 10), payment("a", 1), payment("b", 10)];
        let mut addresses: ChainPayoutAddresses = HashMap::new();
        addresses.insert("a".to_string(), HashMap::from([(10, "0x1".to_string())]));
        addresses.insert("b".to_string(), HashMap::from([(10, String::new())]));

        let missing = find_missing_payouts(&payments, &addresses);
        assert_eq!(
            missing,
            vec![
                MissingPayout {
                    project_id: "a".to_string(),
                    chain_id: 1
                },
                MissingPayout {
                    project_id: "b".to_string(),
                    chain_id: 10
                },
            ]
        );
        assert_eq!(missing_project_ids(&missing), vec!["a", "b"]);
        assert!(find_missing_payouts(&payments, &HashMap::new()).len() == 3);
    }

    #[test]
    fn test_network_switch_decision() {
        assert!(!needs_network_switch(Some(10), 10));
        assert!(needs_network_switch(Some(1), 10));
        assert!(needs_network_switch(None, 10));
    }

    #[test]
    fn test_classify_outcome() {
        let ok = Transfer::success("a", "0x01");
        let bad = Transfer::failed("b", "reverted");

        let all_ok = classify_outcome(&[ok.clone()], false);
        assert_eq!(all_ok.success, Some(DONATION_SUCCESS));
        assert_eq!(all_ok.failure, None);

        let approved = classify_outcome(&[ok.clone()], true);
        assert!(approved.success.unwrap().contains("approved"));

        let partial = classify_outcome(&[ok, bad.clone()], false);
        assert!(partial.success.is_some());
        assert!(partial.failure.unwrap().contains("Some donations failed"));

        let failed = classify_outcome(&[bad], true);
        assert_eq!(failed.success, None);
        assert!(failed.failure.is_some());
    }
}
