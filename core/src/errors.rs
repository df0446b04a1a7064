use thiserror::Error;

/// Key-value storage related errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Storage read failed for key {key}: {reason}")]
    ReadFailed { key: String, reason: String },

    #[error("Storage write failed for key {key}: {reason}")]
    WriteFailed { key: String, reason: String },

    #[error("Malformed stored value for key {key}: {reason}")]
    Malformed { key: String, reason: String },
}

/// Repository slug related errors
#[derive(Debug, Error)]
pub enum SlugError {
    #[error("Invalid repository slug: must be a non-empty string")]
    Empty,

    #[error("Invalid nameWithOwner format, expected \"owner/repository\": {value}")]
    InvalidNameWithOwner { value: String },

    #[error("Invalid repository slug format, expected \"owner-repository-name\": {slug}")]
    MissingSeparator { slug: String },

    #[error("Invalid repository slug, owner and name must be non-empty: {slug}")]
    EmptyPart { slug: String },
}

/// Failures reported by the GitHub API collaborator
#[derive(Debug, Error)]
pub enum GitHubApiError {
    #[error("User not found: {login}")]
    UserNotFound { login: String },

    #[error("Repository not found: {name_with_owner}")]
    RepositoryNotFound { name_with_owner: String },

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimitExceeded,

    #[error("Network error: {details}")]
    Network { details: String },

    #[error("GITHUB_TOKEN environment variable is not set")]
    MissingToken,

    #[error("Failed to fetch {resource}")]
    FetchFailed { resource: String },
}

impl GitHubApiError {
    /// Map an HTTP status from the API to the error shown upstream
    pub fn from_status(status: u16, resource: &str) -> Self {
        match status {
            404 if resource.contains('/') => GitHubApiError::RepositoryNotFound {
                name_with_owner: resource.to_string(),
            },
            404 => GitHubApiError::UserNotFound {
                login: resource.to_string(),
            },
            403 => GitHubApiError::RateLimitExceeded,
            _ => GitHubApiError::FetchFailed {
                resource: resource.to_string(),
            },
        }
    }
}

/// General system errors
#[derive(Debug, Error)]
pub enum SystemError {
    #[error("Configuration error: {details}")]
    Configuration { details: String },

    #[error("IO error: {source}")]
    IO {
        #[from]
        source: std::io::Error,
    },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    #[error("Unknown error: {details}")]
    Unknown { details: String },
}

/// Main error type for the application
#[derive(Debug, Error)]
pub enum TelescopeError {
    #[error("Storage error: {source}")]
    Storage {
        #[from]
        source: StorageError,
    },

    #[error("Slug error: {source}")]
    Slug {
        #[from]
        source: SlugError,
    },

    #[error("GitHub API error: {source}")]
    GitHubApi {
        #[from]
        source: GitHubApiError,
    },

    #[error("System error: {source}")]
    System {
        #[from]
        source: SystemError,
    },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, TelescopeError>;
