use std::fmt;

use thiserror::Error;

/// Stage of a snapshot build, used to report where an organization failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    FetchOrg,
    FetchRepos,
    FetchTeams,
    FetchMembers,
    FetchTeamPermissions,
    FetchRepoPermissions,
    Aggregate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::FetchOrg => "organization info",
            Stage::FetchRepos => "repositories",
            Stage::FetchTeams => "teams",
            Stage::FetchMembers => "members",
            Stage::FetchTeamPermissions => "team permissions",
            Stage::FetchRepoPermissions => "repository permissions",
            Stage::Aggregate => "aggregation",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum AacError {
    #[error("GitHub token not found. Set GITHUB_TOKEN or add `token` to the config file.")]
    TokenNotFound,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("GraphQL error: {0}")]
    GraphQLError(String),

    #[error("Pagination protocol violated: {0}")]
    ProtocolError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("snapshot for {organization} failed at {stage}: {source}")]
    SnapshotFailed {
        organization: String,
        stage: Stage,
        #[source]
        source: Box<AacError>,
    },

    #[error("no organization was exported ({0} failed, see the summary above)")]
    ExportFailed(usize),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AacError {
    /// Failures reported by the transport: network, HTTP status, GraphQL
    /// errors, or a response that could not be decoded.
    pub fn is_transport(&self) -> bool {
        match self {
            AacError::ApiError(_)
            | AacError::GraphQLError(_)
            | AacError::RequestError(_)
            | AacError::JsonError(_) => true,
            AacError::SnapshotFailed { source, .. } => source.is_transport(),
            _ => false,
        }
    }

    /// The upstream broke a pagination assumption (stale cursor, missing edge).
    pub fn is_protocol(&self) -> bool {
        match self {
            AacError::ProtocolError(_) => true,
            AacError::SnapshotFailed { source, .. } => source.is_protocol(),
            _ => false,
        }
    }

    pub fn stage(&self) -> Option<Stage> {
        match self {
            AacError::SnapshotFailed { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

pub type AacResult<T> = Result<T, AacError>;

pub trait ErrorContext<T> {
    fn context(self, msg: &str) -> AacResult<T>;
    fn with_context<F>(self, f: F) -> AacResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::error::Error + 'static,
{
    fn context(self, msg: &str) -> AacResult<T> {
        self.map_err(|e| AacError::Unknown(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AacResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AacError::Unknown(format!("{}: {}", f(), e)))
    }
}

impl<T> ErrorContext<T> for Option<T> {
    fn context(self, msg: &str) -> AacResult<T> {
        self.ok_or_else(|| AacError::Unknown(msg.to_string()))
    }

    fn with_context<F>(self, f: F) -> AacResult<T>
    where
        F: FnOnce() -> String,
    {
        self.ok_or_else(|| AacError::Unknown(f()))
    }
}

#[macro_export]
macro_rules! aac_error {
    ($error_type:ident, $msg:expr) => {
        $crate::error::AacError::$error_type($msg.to_string())
    };
    ($error_type:ident, $fmt:expr, $($arg:tt)*) => {
        $crate::error::AacError::$error_type(format!($fmt, $($arg)*))
    };
}
