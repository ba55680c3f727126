use chrono::{DateTime, Utc};
use git2::Oid;

/// A commit as read from the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub hash: Oid,
    /// Full commit message, body included
    pub message: String,
    pub committed_at: DateTime<Utc>,
}

impl CommitRecord {
    pub fn new(hash: Oid, message: impl Into<String>, committed_at: DateTime<Utc>) -> Self {
        CommitRecord {
            hash,
            message: message.into(),
            committed_at,
        }
    }

    /// First line of the message, trimmed
    pub fn short_message(&self) -> String {
        short_message(&self.message)
    }
}

/// Return the first line of a commit message with surrounding whitespace removed.
pub fn short_message(message: &str) -> String {
    message.lines().next().unwrap_or("").trim().to_string()
}

/// Abbreviated hash as shown to users
pub fn short_sha(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}
