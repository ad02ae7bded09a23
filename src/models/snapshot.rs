use serde::{Deserialize, Serialize};

use super::{AccessEntry, Member, Organization, Repository, Team};

/// Point-in-time access model of one organization.
///
/// Field order is the key order of the exported document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AccessSnapshot {
    pub organization: Organization,
    #[serde(default)]
    pub repositories: Vec<Repository>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub permissions: Vec<AccessEntry>,
}

impl AccessSnapshot {
    pub fn entry(&self, repository: &str) -> Option<&AccessEntry> {
        self.permissions
            .iter()
            .find(|entry| entry.repository == repository)
    }
}
