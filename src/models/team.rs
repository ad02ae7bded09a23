use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Member logins, sorted.
    #[serde(default)]
    pub members: Vec<String>,
    /// Child team names, sorted.
    #[serde(default)]
    pub child_teams: Vec<String>,
}

/// Organization member and their organization role (ADMIN or MEMBER).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Member {
    pub login: String,
    pub role: String,
}
