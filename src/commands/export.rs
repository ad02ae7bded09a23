use std::path::PathBuf;

use clap::ArgMatches;
use indicatif::{ProgressBar, ProgressStyle};

use super::context_from;
use crate::client::RepositoryOrder;
use crate::config::{validate_organization, Config};
use crate::error::{AacError, AacResult, ErrorContext};
use crate::export::{export_organizations, log_progress, ExportOptions, OutputFormat, ProgressCallback};
use crate::formatting::print_export_summary;
use crate::logging::{echo_above, log_error_to_file, log_info};

/// Organizations to export: `--org` alone, or every configured one.
///
/// With a configured list, `--org` must be on it.
pub fn select_organizations(config: &Config, org: Option<&str>) -> AacResult<Vec<String>> {
    match org {
        Some(org) => {
            validate_organization(org)?;
            if !config.allows(org) {
                return Err(AacError::InvalidInput(format!(
                    "organization {} is not allowed",
                    org
                )));
            }
            Ok(vec![org.to_string()])
        }
        None if config.organizations.is_empty() => Err(AacError::InvalidInput(
            "no organizations to export; pass --org or list organizations in the config file"
                .to_string(),
        )),
        None => Ok(config.organizations.clone()),
    }
}

fn progress_bar(organizations: usize) -> ProgressBar {
    let bar = ProgressBar::new(organizations as u64);
    let style = ProgressStyle::with_template(
        "{prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos:>3}/{len:3} {msg}",
    )
    .map(|style| style.progress_chars("█▓░"))
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar.set_prefix("export");
    bar
}

pub async fn handle_export(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    handle_export_impl(matches).await.map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
}

async fn handle_export_impl(matches: &ArgMatches) -> AacResult<()> {
    let mut context = context_from(matches).context("Failed to load CLI context")?;

    {
        let config = context.config_mut();
        if let Some(order) = matches.get_one::<String>("order") {
            config.repository_order = order.parse::<RepositoryOrder>()?;
        }
        if let Some(format) = matches.get_one::<String>("format") {
            config.format = format.parse::<OutputFormat>()?;
        }
        if let Some(dir) = matches.get_one::<String>("output-dir") {
            config.output_dir = Some(PathBuf::from(dir));
        }
        if let Some(jobs) = matches.get_one::<usize>("jobs") {
            config.concurrency = (*jobs).max(1);
        }
    }

    let organizations = select_organizations(
        context.config(),
        matches.get_one::<String>("org").map(String::as_str),
    )?;

    let options = ExportOptions {
        output_dir: context
            .config()
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(".")),
        format: context.config().format,
        concurrency: context.config().concurrency,
    };

    let client = context.verified_client()?;
    log_info(&format!(
        "exporting {} organization(s) from {}",
        organizations.len(),
        context.api_url()
    ));

    let bar = progress_bar(organizations.len());
    echo_above(Some(bar.clone()));
    let progress: &ProgressCallback<'_> = &log_progress;

    let report = export_organizations(&*client, &organizations, &options, Some(progress), |outcome| {
        // Build failures were already logged through the progress events.
        if let Err(error) = &outcome.result {
            if error.stage().is_none() {
                log_error_to_file(&format!("[{}] {}", outcome.organization, error));
            }
        }
        bar.set_message(outcome.organization.clone());
        bar.inc(1);
    })
    .await;
    bar.finish_and_clear();
    echo_above(None);

    print_export_summary(&report);

    match report.failure() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}
