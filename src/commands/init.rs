use std::fs;
use std::path::{Path, PathBuf};

use clap::ArgMatches;
use colored::*;
use serde::Serialize;

use crate::config::validate_organization;
use crate::constants::ACCESS_CONFIG_FILE;
use crate::error::{AacError, AacResult, ErrorContext};
use crate::logging::log_info;

#[derive(Serialize)]
struct AccessConfig<'a> {
    organizations: Vec<&'a str>,
}

/// Create `<dir>/<org>/` holding an `access-config.yaml` skeleton.
///
/// Refuses to touch an existing directory.
pub fn init_organization(dir: &Path, org: &str) -> AacResult<PathBuf> {
    validate_organization(org)?;

    let org_dir = dir.join(org);
    if org_dir.exists() {
        return Err(AacError::InvalidInput(format!(
            "{} already exists",
            org_dir.display()
        )));
    }
    fs::create_dir_all(&org_dir)?;

    let skeleton = serde_yaml::to_string(&AccessConfig {
        organizations: vec![org],
    })?;
    fs::write(org_dir.join(ACCESS_CONFIG_FILE), skeleton)?;

    Ok(org_dir)
}

pub async fn handle_init(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    handle_init_impl(matches).map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
}

fn handle_init_impl(matches: &ArgMatches) -> AacResult<()> {
    let org = matches
        .get_one::<String>("org")
        .ok_or_else(|| AacError::InvalidInput("--org is required".to_string()))?;

    let dir = match matches.get_one::<String>("dir") {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir().context("Resolving the working directory")?,
    };

    let org_dir = init_organization(&dir, org)?;
    log_info(&format!("initialized {}", org_dir.display()));
    println!("{} Initialization completed in {}", "✓".green(), org_dir.display().to_string().bold());

    Ok(())
}
