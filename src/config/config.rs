use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::client::RepositoryOrder;
use crate::constants::{
    CONFIG_FILE, DEFAULT_CONCURRENCY, DEFAULT_PAGE_SIZE, GITHUB_GRAPHQL_URL, GITHUB_WEB_URL,
    TOKEN_ENV_VAR,
};
use crate::error::{AacError, AacResult};
use crate::export::OutputFormat;

lazy_static::lazy_static! {
    static ref ORGANIZATION_LOGIN: Regex =
        Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// GitHub web URL; GitHub Enterprise hosts get their own API endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Organizations exported by default, and the allow-list for `--org`.
    pub organizations: Vec<String>,
    pub format: OutputFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    pub repository_order: RepositoryOrder,
    pub concurrency: usize,
    pub page_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            token: None,
            endpoint: None,
            organizations: Vec::new(),
            format: OutputFormat::default(),
            output_dir: None,
            repository_order: RepositoryOrder::default(),
            concurrency: DEFAULT_CONCURRENCY,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Config {
    /// Whether `org` may be exported. An empty list allows everything.
    pub fn allows(&self, org: &str) -> bool {
        self.organizations.is_empty()
            || self
                .organizations
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(org))
    }

    pub fn validate(&self) -> AacResult<()> {
        for org in &self.organizations {
            validate_organization(org)?;
        }
        if self.concurrency == 0 {
            return Err(AacError::ConfigError("concurrency must be at least 1".to_string()));
        }
        Ok(())
    }
}

pub fn default_config_path() -> AacResult<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| AacError::ConfigError("Could not find home directory".to_string()))?;
    Ok(home_dir.join(CONFIG_FILE))
}

/// Load `path`, or `~/.gh-aac.yaml` when no path is given. A missing
/// default file yields the default config; a missing explicit file is an
/// error.
pub fn load_config(path: Option<&Path>) -> AacResult<Config> {
    let config_path = match path {
        Some(path) => {
            if !path.exists() {
                return Err(AacError::ConfigError(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            }
            path.to_path_buf()
        }
        None => default_config_path()?,
    };

    if !config_path.exists() {
        return Ok(Config::default());
    }

    let config_str = fs::read_to_string(&config_path)?;
    let config: Config = serde_yaml::from_str(&config_str).map_err(|e| {
        AacError::ConfigError(format!("{}: {}", config_path.display(), e))
    })?;
    config.validate()?;
    Ok(config)
}

pub fn save_config(config: &Config, path: Option<&Path>) -> AacResult<()> {
    let config_path = match path {
        Some(path) => path.to_path_buf(),
        None => default_config_path()?,
    };

    let config_str = serde_yaml::to_string(config)?;
    fs::write(config_path, config_str)?;

    Ok(())
}

pub fn get_token(config: &Config) -> AacResult<String> {
    resolve_token(env::var(TOKEN_ENV_VAR).ok(), config)
}

/// A non-blank `env_token` wins over the config file's `token`.
pub fn resolve_token(env_token: Option<String>, config: &Config) -> AacResult<String> {
    env_token
        .into_iter()
        .chain(config.token.clone())
        .find(|token| !token.trim().is_empty())
        .ok_or(AacError::TokenNotFound)
}

/// GraphQL endpoint for a GitHub web URL.
///
/// `https://github.com` (or nothing) maps to the public API, any other host
/// to `https://api.<host>/graphql`.
pub fn graphql_url(endpoint: Option<&str>) -> String {
    let endpoint = endpoint.map(str::trim).unwrap_or_default();
    if endpoint.is_empty() || endpoint.trim_end_matches('/') == GITHUB_WEB_URL {
        return GITHUB_GRAPHQL_URL.to_string();
    }

    let host = endpoint
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/');
    format!("https://api.{}/graphql", host)
}

/// Organization logins name output files and directories.
pub fn validate_organization(login: &str) -> AacResult<()> {
    if ORGANIZATION_LOGIN.is_match(login) {
        Ok(())
    } else {
        Err(AacError::InvalidInput(format!(
            "invalid organization login: {:?}",
            login
        )))
    }
}
