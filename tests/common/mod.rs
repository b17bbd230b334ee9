//! Common test fixtures shared by the integration tests

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use gap_core::checkout::{DonationPayment, SupportedToken};
use gap_core::milestones::{
    CommunityDetails, CommunityRef, Completion, GrantDetails, GrantMilestoneSource, GrantRef,
    MilestoneSource, MilestoneType, UnifiedMilestone,
};
use std::collections::HashMap;

pub const ACCOUNT: &str = "0x9999999999999999999999999999999999999999";
pub const PAYOUT_A: &str = "0x1111111111111111111111111111111111111111";
pub const PAYOUT_B: &str = "0x2222222222222222222222222222222222222222";

/// Builder for timeline milestones
pub struct MilestoneBuilder {
    milestone: UnifiedMilestone,
}

impl MilestoneBuilder {
    pub fn new(uid: &str, milestone_type: MilestoneType) -> Self {
        Self {
            milestone: UnifiedMilestone {
                uid: uid.to_string(),
                title: "Milestone".to_string(),
                description: None,
                completed: Completion::Flag(false),
                milestone_type,
                created_at: Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap(),
                chain_id: 1,
                ref_uid: format!("ref-{uid}"),
                starts_at: None,
                ends_at: None,
                source: MilestoneSource::default(),
                merged_grants: None,
            },
        }
    }

    pub fn grant(uid: &str) -> Self {
        Self::new(uid, MilestoneType::Grant)
    }

    pub fn title(mut self, title: &str) -> Self {
        self.milestone.title = title.to_string();
        self
    }

    pub fn description(mut self, description: Option<&str>) -> Self {
        self.milestone.description = description.map(str::to_string);
        self
    }

    pub fn dates(mut self, starts_at: Option<i64>, ends_at: Option<i64>) -> Self {
        self.milestone.starts_at = starts_at;
        self.milestone.ends_at = ends_at;
        self
    }

    /// Attach grant details; `grant_title = None` leaves the title unset
    pub fn in_grant(
        mut self,
        grant_uid: &str,
        chain_id: u64,
        grant_title: Option<&str>,
        community: &str,
    ) -> Self {
        self.milestone.source.grant_milestone = Some(GrantMilestoneSource {
            milestone: None,
            grant: Some(GrantRef {
                uid: Some(grant_uid.to_string()),
                chain_id: Some(chain_id),
                details: Some(GrantDetails {
                    title: grant_title.map(str::to_string),
                    program_id: None,
                }),
                community: Some(CommunityRef {
                    details: Some(CommunityDetails {
                        name: Some(community.to_string()),
                        image_url: None,
                    }),
                }),
            }),
        });
        self
    }

    pub fn build(self) -> UnifiedMilestone {
        self.milestone
    }
}

pub fn token(chain_id: u64) -> SupportedToken {
    SupportedToken {
        address: "0x0000000000000000000000000000000000000000".to_string(),
        symbol: "ETH".to_string(),
        name: "Ether".to_string(),
        decimals: 18,
        chain_id,
        chain_name: format!("chain-{chain_id}"),
        is_native: true,
    }
}

pub fn payment(project_id: &str, chain_id: u64) -> DonationPayment {
    DonationPayment {
        project_id: project_id.to_string(),
        amount: "10".to_string(),
        token: token(chain_id),
        chain_id,
    }
}

/// Payout addresses for every `(project, chain)` of `payments`
pub fn payouts_for(payments: &[DonationPayment]) -> HashMap<String, HashMap<u64, String>> {
    let mut addresses: HashMap<String, HashMap<u64, String>> = HashMap::new();
    for p in payments {
        addresses
            .entry(p.project_id.clone())
            .or_default()
            .insert(p.chain_id, PAYOUT_A.to_string());
    }
    addresses
}
