use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for since operations
#[derive(Error, Debug)]
pub enum SinceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Repository unavailable at {path}: {source}")]
    RepositoryUnavailable {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("No changes in window: {0}")]
    NoChangesInWindow(String),

    #[error("Cannot determine next version: {0}")]
    UndeterminableVersion(String),

    #[error("Malformed changelog: {0}")]
    MalformedChangelog(String),

    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("Not on branch '{required}' (current branch: '{actual}')")]
    BranchMismatch { required: String, actual: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Hook failed: {0}")]
    Hook(String),

    #[error("Invalid exclude pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in since
pub type Result<T> = std::result::Result<T, SinceError>;

impl SinceError {
    /// Create a not-found error with context
    pub fn not_found(msg: impl Into<String>) -> Self {
        SinceError::NotFound(msg.into())
    }

    /// Create an empty-window error with context
    pub fn no_changes(msg: impl Into<String>) -> Self {
        SinceError::NoChangesInWindow(msg.into())
    }

    /// Create an undeterminable-version error with context
    pub fn undeterminable(msg: impl Into<String>) -> Self {
        SinceError::UndeterminableVersion(msg.into())
    }

    /// Create a malformed-changelog error with context
    pub fn malformed(msg: impl Into<String>) -> Self {
        SinceError::MalformedChangelog(msg.into())
    }

    /// Create an invalid-version error for a tag that is not `X.Y.Z`
    pub fn invalid_version(msg: impl Into<String>) -> Self {
        SinceError::InvalidVersion(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        SinceError::Config(msg.into())
    }

    /// Create a hook error with context
    pub fn hook(msg: impl Into<String>) -> Self {
        SinceError::Hook(msg.into())
    }

    /// Process exit code for this error.
    ///
    /// Every variant maps to its own code so scripts can tell an empty release
    /// window apart from a broken repository. Codes start above 2, which clap
    /// uses for usage errors.
    pub fn exit_code(&self) -> i32 {
        match self {
            SinceError::NotFound(_) => 3,
            SinceError::RepositoryUnavailable { .. } => 4,
            SinceError::NoChangesInWindow(_) => 5,
            SinceError::UndeterminableVersion(_) => 6,
            SinceError::MalformedChangelog(_) => 7,
            SinceError::InvalidVersion(_) => 8,
            SinceError::BranchMismatch { .. } => 9,
            SinceError::Config(_) => 10,
            SinceError::Hook(_) => 11,
            SinceError::Pattern(_) => 12,
            SinceError::Git(_) => 13,
            SinceError::Io(_) => 14,
        }
    }
}
