use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::graphql::GraphTransport;
use super::queries::{self, RepositoryOrder};
use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::error::{AacError, AacResult};
use crate::models::graphql::{
    CollaboratorRepositoryNode, CollaboratorsData, COLLABORATORS_EDGE, MembersData, OrganizationData,
    RepositoriesData, TeamNode, TeamRepositoriesData, TeamsData, TEAM_CHILD_TEAMS_EDGE,
    TEAM_MEMBERS_EDGE,
};
use crate::models::*;
use crate::pagination::{Cursor, NestedCursors, Page};

/// Page-level access to the GitHub organization edges the export needs.
///
/// Every method fetches exactly one page; draining edges is left to the
/// walkers in [`crate::pagination`].
pub struct GitHubClient<T> {
    transport: T,
    page_size: u32,
    repository_order: RepositoryOrder,
}

impl<T: GraphTransport> GitHubClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            page_size: DEFAULT_PAGE_SIZE,
            repository_order: RepositoryOrder::default(),
        }
    }

    /// Connection page size, clamped to what GitHub accepts.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    pub fn with_repository_order(mut self, order: RepositoryOrder) -> Self {
        self.repository_order = order;
        self
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn execute_query<D: DeserializeOwned>(
        &self,
        document: &str,
        variables: Value,
    ) -> AacResult<D> {
        let data = self.transport.query(document, variables).await?;
        Ok(serde_json::from_value(data)?)
    }

    pub async fn get_organization(&self, org: &str) -> AacResult<Organization> {
        let data: OrganizationData = self
            .execute_query(&queries::organization(), json!({ "org": org }))
            .await?;
        data.into_organization(org)
    }

    pub async fn repositories_page(&self, org: &str, cursor: Cursor) -> AacResult<Page<Repository>> {
        let document = queries::repositories(self.page_size, self.repository_order);
        let variables = json!({
            "org": org,
            "repoCursor": cursor.as_variable(),
        });

        let data: RepositoriesData = self.execute_query(&document, variables).await?;
        Ok(data.into_organization(org)?.repositories.into_page())
    }

    /// One page of teams; each team carries the member and child-team pages
    /// selected by the inner cursors.
    pub async fn teams_page(&self, org: &str, cursors: NestedCursors) -> AacResult<Page<TeamNode>> {
        let document = queries::teams(self.page_size);
        let variables = json!({
            "org": org,
            "teamCursor": cursors.outer.as_variable(),
            "memberCursor": cursors.inner(TEAM_MEMBERS_EDGE).as_variable(),
            "childTeamCursor": cursors.inner(TEAM_CHILD_TEAMS_EDGE).as_variable(),
        });

        let data: TeamsData = self.execute_query(&document, variables).await?;
        Ok(data.into_organization(org)?.teams.into_page())
    }

    pub async fn members_page(&self, org: &str, cursor: Cursor) -> AacResult<Page<Member>> {
        let document = queries::members(self.page_size);
        let variables = json!({
            "org": org,
            "memberCursor": cursor.as_variable(),
        });

        let data: MembersData = self.execute_query(&document, variables).await?;
        Ok(data
            .into_organization(org)?
            .members_with_role
            .into_page()
            .map(Member::from))
    }

    /// One page of the repositories a team can access, as grants whose
    /// actor is the team slug.
    pub async fn team_repositories_page(
        &self,
        org: &str,
        slug: &str,
        cursor: Cursor,
    ) -> AacResult<Page<AccessGrant>> {
        let document = queries::team_repositories(self.page_size);
        let variables = json!({
            "org": org,
            "slug": slug,
            "repoCursor": cursor.as_variable(),
        });

        let data: TeamRepositoriesData = self.execute_query(&document, variables).await?;
        let team = data.into_organization(org)?.team.ok_or_else(|| {
            AacError::ProtocolError(format!("team {:?} missing from {}", slug, org))
        })?;

        Ok(team
            .repositories
            .into_page()
            .map(|edge| AccessGrant::new(&edge.node.name, slug, &edge.permission)))
    }

    /// One page of repositories, each carrying the collaborator page selected
    /// by the inner cursor.
    pub async fn collaborators_page(
        &self,
        org: &str,
        cursors: NestedCursors,
    ) -> AacResult<Page<CollaboratorRepositoryNode>> {
        let document = queries::repository_collaborators(self.page_size, self.repository_order);
        let variables = json!({
            "org": org,
            "repoCursor": cursors.outer.as_variable(),
            "collabCursor": cursors.inner(COLLABORATORS_EDGE).as_variable(),
        });

        let data: CollaboratorsData = self.execute_query(&document, variables).await?;
        Ok(data.into_organization(org)?.repositories.into_page())
    }
}
