use serde::Deserialize;
use serde_json::Value;

use crate::error::{AacError, AacResult};
use crate::pagination::{NestedNode, Page, PageInfo};

use super::{AccessGrant, Member, Organization, Repository};

#[derive(Debug, Deserialize)]
pub struct GraphQLResponse {
    pub data: Option<Value>,
    pub errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLError {
    pub message: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

// Connection shapes

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeConnection<T> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<T>,
    pub page_info: PageInfo,
}

impl<T> NodeConnection<T> {
    pub fn into_page(self) -> Page<T> {
        Page::from_info(self.nodes, self.page_info)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeConnection<E> {
    #[serde(default = "Vec::new")]
    pub edges: Vec<E>,
    pub page_info: PageInfo,
}

impl<E> EdgeConnection<E> {
    pub fn into_page(self) -> Page<E> {
        Page::from_info(self.edges, self.page_info)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginNode {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NameNode {
    pub name: String,
}

/// Edge carrying the viewer-independent `permission` of a repository grant.
#[derive(Debug, Deserialize)]
pub struct PermissionEdge<N> {
    pub permission: String,
    pub node: N,
}

#[derive(Debug, Deserialize)]
pub struct MemberEdge {
    pub role: String,
    pub node: LoginNode,
}

impl From<MemberEdge> for Member {
    fn from(edge: MemberEdge) -> Self {
        Member {
            login: edge.node.login,
            role: edge.role,
        }
    }
}

/// Every query is rooted at `organization(login: $org)`, which is null when
/// the login does not resolve.
#[derive(Debug, Deserialize)]
pub struct OrganizationRoot<T> {
    pub organization: Option<T>,
}

impl<T> OrganizationRoot<T> {
    pub fn into_organization(self, login: &str) -> AacResult<T> {
        self.organization.ok_or_else(|| {
            AacError::ProtocolError(format!("organization {:?} missing from response", login))
        })
    }
}

pub type OrganizationData = OrganizationRoot<Organization>;

// Repositories

#[derive(Debug, Deserialize)]
pub struct RepositoriesField {
    pub repositories: NodeConnection<Repository>,
}

pub type RepositoriesData = OrganizationRoot<RepositoriesField>;

// Teams with nested members and child teams

pub const TEAM_MEMBERS_EDGE: usize = 0;
pub const TEAM_CHILD_TEAMS_EDGE: usize = 1;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamNode {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub members: Option<NodeConnection<LoginNode>>,
    #[serde(default)]
    pub child_teams: Option<NodeConnection<NameNode>>,
}

impl NestedNode for TeamNode {
    type Inner = String;

    fn identity(&self) -> &str {
        &self.slug
    }

    fn take_edge(&mut self, edge: usize) -> Option<Page<String>> {
        match edge {
            TEAM_MEMBERS_EDGE => self
                .members
                .take()
                .map(|members| members.into_page().map(|node| node.login)),
            TEAM_CHILD_TEAMS_EDGE => self
                .child_teams
                .take()
                .map(|children| children.into_page().map(|node| node.name)),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TeamsField {
    pub teams: NodeConnection<TeamNode>,
}

pub type TeamsData = OrganizationRoot<TeamsField>;

// Organization members

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembersField {
    pub members_with_role: EdgeConnection<MemberEdge>,
}

pub type MembersData = OrganizationRoot<MembersField>;

// Team repository permissions

#[derive(Debug, Deserialize)]
pub struct TeamRepositories {
    pub repositories: EdgeConnection<PermissionEdge<NameNode>>,
}

#[derive(Debug, Deserialize)]
pub struct TeamField {
    pub team: Option<TeamRepositories>,
}

pub type TeamRepositoriesData = OrganizationRoot<TeamField>;

// Repository collaborators

pub const COLLABORATORS_EDGE: usize = 0;

#[derive(Debug, Deserialize)]
pub struct CollaboratorRepositoryNode {
    pub name: String,
    #[serde(default)]
    pub collaborators: Option<EdgeConnection<PermissionEdge<LoginNode>>>,
}

impl NestedNode for CollaboratorRepositoryNode {
    type Inner = AccessGrant;

    fn identity(&self) -> &str {
        &self.name
    }

    fn take_edge(&mut self, edge: usize) -> Option<Page<AccessGrant>> {
        if edge != COLLABORATORS_EDGE {
            return None;
        }
        let repository = self.name.clone();
        self.collaborators.take().map(|collaborators| {
            collaborators.into_page().map(|edge| AccessGrant {
                repository: repository.clone(),
                actor: edge.node.login,
                access: edge.permission,
            })
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CollaboratorRepositoriesField {
    pub repositories: NodeConnection<CollaboratorRepositoryNode>,
}

pub type CollaboratorsData = OrganizationRoot<CollaboratorRepositoriesField>;
