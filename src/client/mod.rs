pub mod github_client;
pub mod graphql;
pub mod queries;

pub use github_client::GitHubClient;
pub use graphql::{GraphQLClient, GraphTransport, QueryBuilder};
pub use queries::RepositoryOrder;
