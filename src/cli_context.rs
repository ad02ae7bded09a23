use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::client::{GitHubClient, GraphQLClient};
use crate::config::{get_token, graphql_url, load_config, Config};
use crate::error::{AacError, AacResult};

pub type Client = GitHubClient<GraphQLClient>;

/// Central context for CLI operations, managing configuration and client instances
pub struct CliContext {
    config: Config,
    endpoint: Option<String>,
    token: Option<String>,
    client: Option<Arc<Client>>,
}

impl CliContext {
    /// Context with the default configuration and no token
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            endpoint: None,
            token: None,
            client: None,
        }
    }

    /// Load context from the config file
    pub fn load(config_path: Option<&Path>) -> AacResult<Self> {
        let config = load_config(config_path)?;
        let token = get_token(&config).ok();

        Ok(Self {
            config,
            endpoint: None,
            token,
            client: None,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Command-line overrides; only take effect before the client is created
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// GraphQL URL for the `--endpoint` override, else the configured endpoint
    pub fn api_url(&self) -> String {
        graphql_url(self.endpoint.as_deref().or(self.config.endpoint.as_deref()))
    }

    /// Get or create the shared client (requires a token)
    pub fn verified_client(&mut self) -> AacResult<Arc<Client>> {
        if let Some(client) = &self.client {
            return Ok(client.clone());
        }

        let token = self.token()?.clone();
        let transport = GraphQLClient::new(&self.api_url(), &token)?;
        let client = Arc::new(
            GitHubClient::new(transport)
                .with_page_size(self.config.page_size)
                .with_repository_order(self.config.repository_order),
        );
        self.client = Some(client.clone());
        Ok(client)
    }

    /// Get the token, resolving it from the environment or config if necessary
    pub fn token(&mut self) -> AacResult<&String> {
        if self.token.is_none() {
            self.token = Some(get_token(&self.config)?);
        }

        self.token.as_ref().ok_or(AacError::TokenNotFound)
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some() || get_token(&self.config).is_ok()
    }
}

impl Default for CliContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder pattern for creating CLI contexts with specific configurations
pub struct CliContextBuilder {
    config_path: Option<PathBuf>,
    config: Option<Config>,
    endpoint: Option<String>,
    token: Option<String>,
}

impl CliContextBuilder {
    pub fn new() -> Self {
        Self {
            config_path: None,
            config: None,
            endpoint: None,
            token: None,
        }
    }

    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Use `config` as is instead of reading a file
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    pub fn with_token(mut self, token: String) -> Self {
        self.token = Some(token);
        self
    }

    pub fn build(self) -> AacResult<CliContext> {
        let mut context = match self.config {
            Some(config) => CliContext {
                config,
                endpoint: None,
                token: None,
                client: None,
            },
            None => CliContext::load(self.config_path.as_deref())?,
        };

        if self.endpoint.is_some() {
            context.endpoint = self.endpoint;
        }
        if self.token.is_some() {
            context.token = self.token;
        }

        Ok(context)
    }
}

impl Default for CliContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
