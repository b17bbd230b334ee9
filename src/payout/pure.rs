//! Payout address selection and display (pure)

use crate::abstractions::address::AddressValidator;
use crate::abstractions::project::{PayoutAddressField, ProjectRecord};
use crate::checkout::types::{ChainPayoutAddresses, DonationPayment};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const NOT_CONFIGURED: &str = "Not configured";

/// `projectId -> resolved payout address`
pub type PayoutAddressMap = HashMap<String, Option<String>>;

/// Project whose payout address should be resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutItem {
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl PayoutItem {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            slug: None,
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Slug when present, uid otherwise
    pub fn lookup_key(&self) -> &str {
        self.slug
            .as_deref()
            .filter(|slug| !slug.is_empty())
            .unwrap_or(&self.uid)
    }
}

fn valid<'a>(validator: &dyn AddressValidator, candidate: Option<&'a str>) -> Option<&'a str> {
    candidate.filter(|address| !address.is_empty() && validator.is_valid_address(address))
}

/// Pick the payout address of a project.
///
/// Precedence: explicit payout address (global, then community-keyed), first
/// grant's payout address, project recipient.
pub fn resolve_payout_address(
    project: &ProjectRecord,
    community_id: Option<&str>,
    validator: &dyn AddressValidator,
) -> Option<String> {
    let explicit = match &project.payout_address {
        Some(PayoutAddressField::Single(address)) => valid(validator, Some(address.as_str())),
        Some(PayoutAddressField::PerCommunity(by_community)) => {
            let preferred = community_id
                .and_then(|id| by_community.get(id))
                .and_then(|value| valid(validator, value.as_str()));
            preferred.or_else(|| {
                by_community
                    .values()
                    .find_map(|value| valid(validator, value.as_str()))
            })
        }
        None => None,
    };

    explicit
        .or_else(|| valid(validator, project.first_grant_payout()))
        .or_else(|| valid(validator, project.recipient.as_deref()))
        .map(str::to_string)
}

/// Short display form of an address, e.g. `0x1234…abcd`
pub fn format_address(address: Option<&str>) -> String {
    let address = match address {
        Some(address) if !address.is_empty() => address,
        _ => return NOT_CONFIGURED.to_string(),
    };

    if !address.is_ascii() || address.len() <= 10 {
        return address.to_string();
    }
    format!("{}…{}", &address[..6], &address[address.len() - 4..])
}

/// Map every paid chain of a project to its resolved payout address.
///
/// Unresolved projects are left out so checkout reports them as missing.
pub fn chain_payout_addresses(
    payments: &[DonationPayment],
    resolved: &PayoutAddressMap,
) -> ChainPayoutAddresses {
    let mut by_project: ChainPayoutAddresses = HashMap::new();
    for payment in payments {
        if let Some(Some(address)) = resolved.get(&payment.project_id) {
            by_project
                .entry(payment.project_id.clone())
                .or_default()
                .insert(payment.chain_id, address.clone());
        }
    }
    by_project
}
