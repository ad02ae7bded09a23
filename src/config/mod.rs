mod config;

pub use config::{
    default_config_path, get_token, graphql_url, load_config, resolve_token, save_config,
    validate_organization, Config,
};
