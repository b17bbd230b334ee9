//! Project lookup abstraction
//!
//! Provides trait-based access to project records held by the indexer so
//! payout resolution can be exercised without network access.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Project fields relevant to donations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payout_address: Option<PayoutAddressField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(default)]
    pub grants: Vec<ProjectGrant>,
}

/// A project's payout address: global, or one per community.
///
/// The per-community map keeps the order the indexer sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PayoutAddressField {
    Single(String),
    PerCommunity(serde_json::Map<String, serde_json::Value>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectGrant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ProjectGrantDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectGrantDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ProjectGrantData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectGrantData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payout_address: Option<String>,
}

impl ProjectRecord {
    /// Payout address of the first grant, if any
    pub fn first_grant_payout(&self) -> Option<&str> {
        self.grants
            .first()
            .and_then(|g| g.details.as_ref())
            .and_then(|d| d.data.as_ref())
            .and_then(|d| d.payout_address.as_deref())
    }
}

/// Trait for reading projects by slug or uid
#[async_trait]
pub trait ProjectLookup: Send + Sync {
    /// Fetch a project. `Ok(None)` means the project does not exist.
    async fn fetch_project(&self, slug_or_uid: &str) -> Result<Option<ProjectRecord>>;
}

/// In-memory project lookup, loadable from a JSON `{key: project}` file
#[derive(Debug, Clone, Default)]
pub struct StaticProjectLookup {
    projects: HashMap<String, ProjectRecord>,
    failing_keys: HashSet<String>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl StaticProjectLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load projects from a JSON object keyed by slug or uid
    pub fn from_json_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> crate::Result<Self> {
        let projects: HashMap<String, ProjectRecord> = serde_json::from_str(content)?;
        Ok(Self {
            projects,
            ..Self::default()
        })
    }

    pub fn with_project(mut self, key: impl Into<String>, project: ProjectRecord) -> Self {
        self.projects.insert(key.into(), project);
        self
    }

    /// Make lookups of `key` fail as if the request errored
    pub fn with_failure(mut self, key: impl Into<String>) -> Self {
        self.failing_keys.insert(key.into());
        self
    }

    /// Keys requested so far, in call order
    pub async fn requested_keys(&self) -> Vec<String> {
        self.requested.lock().await.clone()
    }
}

#[async_trait]
impl ProjectLookup for StaticProjectLookup {
    async fn fetch_project(&self, slug_or_uid: &str) -> Result<Option<ProjectRecord>> {
        self.requested.lock().await.push(slug_or_uid.to_string());

        if self.failing_keys.contains(slug_or_uid) {
            return Err(anyhow::anyhow!(
                "Failed to fetch project {}: request failed",
                slug_or_uid
            ));
        }
        Ok(self.projects.get(slug_or_uid).cloned())
    }
}
