use std::path::PathBuf;

use futures::StreamExt;

use super::builder::SnapshotBuilder;
use super::progress::ProgressCallback;
use super::serializer::{write_snapshot, OutputFormat};
use crate::client::{GitHubClient, GraphTransport};
use crate::constants::DEFAULT_CONCURRENCY;
use crate::error::{AacError, AacResult};
use crate::models::AccessSnapshot;

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    /// Organizations built at the same time.
    pub concurrency: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            format: OutputFormat::default(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

/// Counts of a written snapshot, for the run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedSnapshot {
    pub path: PathBuf,
    pub repositories: usize,
    pub teams: usize,
    pub members: usize,
    pub entries: usize,
}

impl ExportedSnapshot {
    fn new(snapshot: &AccessSnapshot, path: PathBuf) -> Self {
        Self {
            path,
            repositories: snapshot.repositories.len(),
            teams: snapshot.teams.len(),
            members: snapshot.members.len(),
            entries: snapshot.permissions.len(),
        }
    }
}

#[derive(Debug)]
pub struct ExportOutcome {
    pub organization: String,
    pub result: AacResult<ExportedSnapshot>,
}

impl ExportOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes in the order the organizations were given.
#[derive(Debug, Default)]
pub struct ExportReport {
    pub outcomes: Vec<ExportOutcome>,
}

impl ExportReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// A run with nothing to do did not fail.
    pub fn all_failed(&self) -> bool {
        !self.outcomes.is_empty() && self.succeeded() == 0
    }

    /// The run's error when every organization failed. Per-organization
    /// causes stay in the outcomes.
    pub fn failure(&self) -> Option<AacError> {
        self.all_failed().then(|| AacError::ExportFailed(self.failed()))
    }
}

async fn export_one<T: GraphTransport>(
    client: &GitHubClient<T>,
    organization: &str,
    options: &ExportOptions,
    progress: Option<&ProgressCallback<'_>>,
) -> AacResult<ExportedSnapshot> {
    let mut builder = SnapshotBuilder::new(client);
    if let Some(progress) = progress {
        builder = builder.with_progress(progress);
    }

    let snapshot = builder.build(organization).await?;
    let path = write_snapshot(&snapshot, &options.output_dir, organization, options.format)?;
    Ok(ExportedSnapshot::new(&snapshot, path))
}

/// Build and write one snapshot per organization, at most
/// `options.concurrency` at a time.
///
/// A failed organization does not stop the others. `on_done` runs as each
/// organization finishes.
pub async fn export_organizations<T, D>(
    client: &GitHubClient<T>,
    organizations: &[String],
    options: &ExportOptions,
    progress: Option<&ProgressCallback<'_>>,
    on_done: D,
) -> ExportReport
where
    T: GraphTransport,
    D: Fn(&ExportOutcome),
{
    let on_done = &on_done;
    let builds = organizations.iter().map(move |organization| async move {
        let outcome = ExportOutcome {
            organization: organization.clone(),
            result: export_one(client, organization, options, progress).await,
        };
        on_done(&outcome);
        outcome
    });

    let outcomes = futures::stream::iter(builds)
        .buffered(options.concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

    ExportReport { outcomes }
}
