//! Timeline milestone data model
//!
//! Mirrors the JSON shape returned by the indexer for project timelines.
//! Every record is read-only input; the merger builds new values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of timeline entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneType {
    Project,
    Milestone,
    Update,
    Activity,
    Impact,
    Grant,
    GrantUpdate,
}

impl MilestoneType {
    /// Whether entries of this kind may be collapsed with identical siblings
    pub fn is_merge_candidate(self) -> bool {
        matches!(self, MilestoneType::Grant)
    }
}

/// Completion marker: either a plain flag or the completion attestation payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Completion {
    Flag(bool),
    Details(serde_json::Map<String, serde_json::Value>),
}

impl Default for Completion {
    fn default() -> Self {
        Completion::Flag(false)
    }
}

impl Completion {
    pub fn is_completed(&self) -> bool {
        match self {
            Completion::Flag(done) => *done,
            Completion::Details(_) => true,
        }
    }
}

/// One entry of a unified project timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedMilestone {
    pub uid: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: Completion,
    #[serde(rename = "type")]
    pub milestone_type: MilestoneType,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "chainID", default)]
    pub chain_id: u64,
    #[serde(rename = "refUID", default)]
    pub ref_uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<i64>,
    #[serde(default)]
    pub source: MilestoneSource,
    /// Populated by the merger for grant entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged_grants: Option<Vec<MergedGrantEntry>>,
}

/// Origin payload of a timeline entry. Either side may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_milestone: Option<ProjectMilestoneRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grant_milestone: Option<GrantMilestoneSource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectMilestoneRef {
    #[serde(default)]
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attester: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrantMilestoneSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestone: Option<GrantMilestoneRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grant: Option<GrantRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrantMilestoneRef {
    #[serde(default)]
    pub uid: String,
    #[serde(rename = "chainID", default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub verified: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrantRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(rename = "chainID", default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<GrantDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community: Option<CommunityRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommunityRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<CommunityDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommunityDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "imageURL", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// One grant sharing a merged milestone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedGrantEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grant_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community_image: Option<String>,
    #[serde(rename = "chainID")]
    pub chain_id: u64,
}

impl MergedGrantEntry {
    /// Build the entry describing the grant a milestone belongs to
    pub fn from_grant(grant: Option<&GrantRef>) -> Self {
        let details = grant.and_then(|g| g.details.as_ref());
        let community = grant
            .and_then(|g| g.community.as_ref())
            .and_then(|c| c.details.as_ref());

        Self {
            grant_title: details.and_then(|d| d.title.clone()),
            community_name: community.and_then(|c| c.name.clone()),
            program_id: details.and_then(|d| d.program_id.clone()),
            community_image: community.and_then(|c| c.image_url.clone()),
            chain_id: grant.and_then(|g| g.chain_id).unwrap_or(0),
        }
    }
}

impl UnifiedMilestone {
    /// Grant payload of a grant milestone, if the source carries one
    pub fn grant(&self) -> Option<&GrantRef> {
        self.source
            .grant_milestone
            .as_ref()
            .and_then(|gm| gm.grant.as_ref())
    }
}
