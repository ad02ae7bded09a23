// Module declarations
pub mod cli_context;
pub mod client;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod formatting;
pub mod graphql_fields;
pub mod logging;
pub mod models;
pub mod pagination;

#[cfg(test)]
mod tests;

// Re-export commonly used items
pub use client::{GitHubClient, GraphQLClient, GraphTransport};
pub use config::{get_token, load_config, save_config, Config};
pub use error::{AacError, AacResult};
pub use export::{OutputFormat, SnapshotBuilder};
pub use models::*;
