pub const GITHUB_GRAPHQL_URL: &str = "https://api.github.com/graphql";
pub const GITHUB_WEB_URL: &str = "https://github.com";
pub const CONFIG_FILE: &str = ".gh-aac.yaml";
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";
pub const USER_AGENT: &str = concat!("gh-aac/", env!("CARGO_PKG_VERSION"));

// GitHub caps `first` on every connection at 100.
pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_PAGE_SIZE: u32 = MAX_PAGE_SIZE;
pub const DEFAULT_CONCURRENCY: usize = 4;

pub const ACCESS_CONFIG_FILE: &str = "access-config.yaml";
