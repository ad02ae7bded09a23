use std::future::Future;
use std::mem;

use futures::TryFutureExt;

use super::aggregate::{aggregate, Aggregation};
use super::progress::{emit, ProgressCallback, SnapshotProgress};
use crate::client::{GitHubClient, GraphTransport};
use crate::error::{AacError, AacResult, Stage};
use crate::models::graphql::{COLLABORATORS_EDGE, TEAM_CHILD_TEAMS_EDGE, TEAM_MEMBERS_EDGE};
use crate::models::{AccessGrant, AccessSnapshot, Organization, Team};
use crate::pagination::{walk, walk_nested, Page};

/// Reports each fetched page of one edge.
#[derive(Clone, Copy)]
struct PageHook<'p> {
    progress: Option<&'p ProgressCallback<'p>>,
    organization: &'p str,
    edge: &'static str,
}

impl PageHook<'_> {
    fn record<I>(self, page: &Page<I>) {
        emit(
            self.progress,
            SnapshotProgress::PageFetched {
                organization: self.organization.to_string(),
                edge: self.edge,
                items: page.items.len(),
            },
        );
    }
}

/// Builds the [`AccessSnapshot`] of one organization.
///
/// Stages run strictly in order: organization info, repositories, teams
/// (with members and child teams), organization members, team repository
/// permissions, repository collaborators, aggregation. The first failing
/// stage abandons the build; nothing is retried and no partial snapshot is
/// returned.
pub struct SnapshotBuilder<'a, T> {
    client: &'a GitHubClient<T>,
    progress: Option<&'a ProgressCallback<'a>>,
}

impl<'a, T: GraphTransport> SnapshotBuilder<'a, T> {
    pub fn new(client: &'a GitHubClient<T>) -> Self {
        Self {
            client,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: &'a ProgressCallback<'a>) -> Self {
        self.progress = Some(progress);
        self
    }

    async fn stage<R, Fut>(
        &self,
        org: &str,
        stage: Stage,
        items: fn(&R) -> usize,
        run: Fut,
    ) -> AacResult<R>
    where
        Fut: Future<Output = AacResult<R>>,
    {
        emit(
            self.progress,
            SnapshotProgress::StageStarted {
                organization: org.to_string(),
                stage,
            },
        );

        match run.await {
            Ok(output) => {
                emit(
                    self.progress,
                    SnapshotProgress::StageFinished {
                        organization: org.to_string(),
                        stage,
                        items: items(&output),
                    },
                );
                Ok(output)
            }
            Err(error) => {
                emit(
                    self.progress,
                    SnapshotProgress::StageFailed {
                        organization: org.to_string(),
                        stage,
                        error: error.to_string(),
                    },
                );
                Err(AacError::SnapshotFailed {
                    organization: org.to_string(),
                    stage,
                    source: Box::new(error),
                })
            }
        }
    }

    fn page_hook<'p>(&self, org: &'p str, edge: &'static str) -> PageHook<'p>
    where
        'a: 'p,
    {
        PageHook {
            progress: self.progress,
            organization: org,
            edge,
        }
    }

    pub async fn build(&self, org: &str) -> AacResult<AccessSnapshot> {
        let client = self.client;

        let organization = self
            .stage(
                org,
                Stage::FetchOrg,
                |_: &Organization| 1,
                client.get_organization(org),
            )
            .await?;

        let hook = self.page_hook(org, "repositories");
        let repositories = self
            .stage(
                org,
                Stage::FetchRepos,
                Vec::len,
                walk("repositories", move |cursor| {
                    client.repositories_page(org, cursor).inspect_ok(move |page| hook.record(page))
                }),
            )
            .await?;

        let hook = self.page_hook(org, "teams");
        let teams = self
            .stage(
                org,
                Stage::FetchTeams,
                Vec::len,
                walk_nested("teams", &["members", "childTeams"], move |cursors| {
                    client.teams_page(org, cursors).inspect_ok(move |page| hook.record(page))
                })
                .map_ok(|drained| {
                    drained
                        .into_iter()
                        .map(|mut team| {
                            let mut members = mem::take(&mut team.edges[TEAM_MEMBERS_EDGE]);
                            let mut child_teams =
                                mem::take(&mut team.edges[TEAM_CHILD_TEAMS_EDGE]);
                            members.sort();
                            members.dedup();
                            child_teams.sort();
                            child_teams.dedup();
                            Team {
                                name: team.node.name,
                                slug: team.node.slug,
                                description: team.node.description,
                                members,
                                child_teams,
                            }
                        })
                        .collect::<Vec<_>>()
                }),
            )
            .await?;

        let hook = self.page_hook(org, "membersWithRole");
        let members = self
            .stage(
                org,
                Stage::FetchMembers,
                Vec::len,
                walk("membersWithRole", move |cursor| {
                    client.members_page(org, cursor).inspect_ok(move |page| hook.record(page))
                }),
            )
            .await?;

        let hook = self.page_hook(org, "team repositories");
        let team_grants = self
            .stage(org, Stage::FetchTeamPermissions, Vec::len, async {
                let mut grants: Vec<AccessGrant> = Vec::new();
                for team in &teams {
                    let slug = team.slug.as_str();
                    let granted = walk("team repositories", move |cursor| {
                        client
                            .team_repositories_page(org, slug, cursor)
                            .inspect_ok(move |page| hook.record(page))
                    })
                    .await?;
                    grants.extend(granted);
                }
                Ok::<_, AacError>(grants)
            })
            .await?;

        let hook = self.page_hook(org, "collaborators");
        let user_grants = self
            .stage(
                org,
                Stage::FetchRepoPermissions,
                Vec::len,
                walk_nested("repositories", &["collaborators"], move |cursors| {
                    client.collaborators_page(org, cursors).inspect_ok(move |page| hook.record(page))
                })
                .map_ok(|drained| {
                    drained
                        .into_iter()
                        .flat_map(|mut repo| mem::take(&mut repo.edges[COLLABORATORS_EDGE]))
                        .collect::<Vec<_>>()
                }),
            )
            .await?;

        let Aggregation {
            entries,
            dropped,
            duplicates,
        } = self
            .stage(
                org,
                Stage::Aggregate,
                |aggregation: &Aggregation| aggregation.entries.len(),
                async { Ok::<_, AacError>(aggregate(team_grants, user_grants, &repositories)) },
            )
            .await?;

        emit(
            self.progress,
            SnapshotProgress::Reconciled {
                organization: org.to_string(),
                entries: entries.len(),
                dropped,
                duplicates,
            },
        );

        Ok(AccessSnapshot {
            organization,
            repositories,
            teams,
            members,
            permissions: entries,
        })
    }
}
