pub mod access;
pub mod graphql;
pub mod organization;
pub mod repository;
pub mod snapshot;
pub mod team;

// Re-export commonly used types
pub use access::{AccessEntry, AccessGrant, TeamGrant, UserGrant};
pub use graphql::{GraphQLError, GraphQLResponse};
pub use organization::Organization;
pub use repository::{Repository, Visibility};
pub use snapshot::AccessSnapshot;
pub use team::{Member, Team};
