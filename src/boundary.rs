use std::fmt;

use crate::domain::commit::short_sha;

/// Something worth telling the user about a release window that does not
/// stop the command
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// HEAD is the start tag's commit, or everything after it was excluded
    NoNewCommits { tag: String, head_sha: String },
    /// The current tag is not a strict `X.Y.Z`; missing or non-numeric parts read as 0
    UnparsableTag { tag: String, reason: String },
    /// None of the commits in the window has a conventional type
    NoConventionalCommits { commit_count: usize },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoNewCommits { tag, head_sha } => write!(
                f,
                "No new commits since tag '{}' (current: {})",
                tag,
                short_sha(head_sha)
            ),
            BoundaryWarning::UnparsableTag { tag, reason } => {
                write!(f, "Cannot parse tag '{}': {}", tag, reason)
            }
            BoundaryWarning::NoConventionalCommits { commit_count } => write!(
                f,
                "None of the {} commits since the last release has a conventional type",
                commit_count
            ),
        }
    }
}
