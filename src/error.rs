use thiserror::Error;

/// Unified error type for semrel operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("Invalid tag format: {0}")]
    InvalidTagFormat(String),

    #[error("Unknown commit message style: {0}")]
    UnknownCommitMessageStyle(String),

    #[error("Branch '{0}' matches no configured release group; no release will be made")]
    NotAReleaseBranch(String),

    #[error("Tag '{0}' already exists")]
    TagExists(String),

    #[error("HEAD is detached; pass the branch name explicitly")]
    DetachedHead,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration file is not valid TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience type alias for Results in semrel
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create an invalid version error with context
    pub fn invalid_version(msg: impl Into<String>) -> Self {
        ReleaseError::InvalidVersion(msg.into())
    }

    /// Create a tag format error with context
    pub fn tag_format(msg: impl Into<String>) -> Self {
        ReleaseError::InvalidTagFormat(msg.into())
    }

    /// Create an unknown commit style error with context
    pub fn unknown_style(msg: impl Into<String>) -> Self {
        ReleaseError::UnknownCommitMessageStyle(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Whether the error only concerns a single commit and may be skipped
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ReleaseError::UnknownCommitMessageStyle(_))
    }
}
