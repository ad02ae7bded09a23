use serde::{Deserialize, Serialize};

/// One access grant as collected from a permission walk, before it is
/// reconciled against the organization's repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGrant {
    pub repository: String,
    /// Team slug or user login, depending on which walk produced it.
    pub actor: String,
    pub access: String,
}

impl AccessGrant {
    pub fn new(repository: &str, actor: &str, access: &str) -> Self {
        Self {
            repository: repository.to_string(),
            actor: actor.to_string(),
            access: access.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TeamGrant {
    pub slug: String,
    pub access: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserGrant {
    pub login: String,
    pub access: String,
}

/// Every grant recorded for one repository.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AccessEntry {
    pub repository: String,
    #[serde(default)]
    pub teams: Vec<TeamGrant>,
    #[serde(default)]
    pub users: Vec<UserGrant>,
}
