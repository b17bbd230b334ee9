//! Grant milestone deduplication (pure)
//!
//! The same milestone is frequently attested once per grant when a project is
//! funded by several programs. Those copies are collapsed into a single
//! timeline entry that lists every grant sharing it.

use super::types::{MergedGrantEntry, MilestoneType, UnifiedMilestone};
use std::collections::{HashMap, HashSet};

/// Sort label used for grants without a title
pub const UNTITLED_GRANT: &str = "Untitled Grant";

/// Fields that must match exactly for two grant milestones to collapse
#[derive(Debug, PartialEq, Eq, Hash)]
struct MergeKey<'a> {
    title: &'a str,
    description: Option<&'a str>,
    starts_at: Option<i64>,
    ends_at: Option<i64>,
}

impl<'a> MergeKey<'a> {
    fn of(milestone: &'a UnifiedMilestone) -> Self {
        Self {
            title: &milestone.title,
            description: milestone.description.as_deref(),
            starts_at: milestone.starts_at,
            ends_at: milestone.ends_at,
        }
    }
}

/// Merge duplicate grant milestones and normalize reference ids.
///
/// The input is left untouched. Grant milestones sharing title, description
/// and both dates become one entry at the position of the first copy, with
/// `merged_grants` listing every contributing grant sorted by title. All other
/// kinds pass through once per `uid`.
///
/// # Examples
///
/// ```
/// use gap_core::milestones::merge_duplicate_milestones;
///
/// assert!(merge_duplicate_milestones(&[]).is_empty());
/// ```
pub fn merge_duplicate_milestones(milestones: &[UnifiedMilestone]) -> Vec<UnifiedMilestone> {
    let mut merged: Vec<UnifiedMilestone> = Vec::with_capacity(milestones.len());
    let mut grant_slots: HashMap<MergeKey<'_>, usize> = HashMap::new();
    let mut grant_entries: HashMap<usize, Vec<MergedGrantEntry>> = HashMap::new();
    let mut seen_uids: HashSet<&str> = HashSet::new();

    for milestone in milestones {
        if milestone.milestone_type.is_merge_candidate() {
            let entry = MergedGrantEntry::from_grant(milestone.grant());
            let key = MergeKey::of(milestone);

            if let Some(&slot) = grant_slots.get(&key) {
                grant_entries.entry(slot).or_default().push(entry);
                continue;
            }

            let slot = merged.len();
            merged.push(normalize_grant(milestone));
            grant_slots.insert(key, slot);
            grant_entries.insert(slot, vec![entry]);
            continue;
        }

        if !seen_uids.insert(milestone.uid.as_str()) {
            continue;
        }

        merged.push(match milestone.milestone_type {
            MilestoneType::Project | MilestoneType::Milestone => normalize_project(milestone),
            _ => milestone.clone(),
        });
    }

    for (slot, mut entries) in grant_entries {
        sort_merged_grants(&mut entries);
        merged[slot].merged_grants = Some(entries);
    }

    merged
}

/// Stable sort by grant title, treating a missing title as [`UNTITLED_GRANT`]
pub fn sort_merged_grants(entries: &mut [MergedGrantEntry]) {
    entries.sort_by_cached_key(|entry| {
        entry
            .grant_title
            .as_deref()
            .unwrap_or(UNTITLED_GRANT)
            .to_lowercase()
    });
}

fn normalize_grant(milestone: &UnifiedMilestone) -> UnifiedMilestone {
    let grant = milestone.grant();
    let mut normalized = milestone.clone();
    normalized.chain_id = grant.and_then(|g| g.chain_id).unwrap_or(0);
    normalized.ref_uid = grant.and_then(|g| g.uid.clone()).unwrap_or_default();
    normalized.merged_grants = None;
    normalized
}

fn normalize_project(milestone: &UnifiedMilestone) -> UnifiedMilestone {
    let mut normalized = milestone.clone();
    if let Some(project_uid) = milestone
        .source
        .project_milestone
        .as_ref()
        .map(|pm| pm.uid.as_str())
        .filter(|uid| !uid.is_empty())
    {
        normalized.ref_uid = project_uid.to_string();
    }
    normalized
}
