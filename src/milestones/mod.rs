//! Project timeline milestones
//!
//! - `types` - serde model of unified timeline entries
//! - `merge` - collapsing of grant milestones shared by several grants

pub mod merge;
pub mod types;

pub use merge::{merge_duplicate_milestones, sort_merged_grants, UNTITLED_GRANT};
pub use types::{
    CommunityDetails, CommunityRef, Completion, GrantDetails, GrantMilestoneRef,
    GrantMilestoneSource, GrantRef, MergedGrantEntry, MilestoneSource, MilestoneType,
    ProjectMilestoneRef, UnifiedMilestone,
};
