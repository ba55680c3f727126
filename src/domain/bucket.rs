use chrono::{DateTime, Utc};

use crate::domain::TagMeta;

/// Name given to commits that no tag covers yet
pub const UNRELEASED_VERSION_NAME: &str = "Unreleased";

/// One segment of history: the commits attributed to a single release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseBucket {
    pub name: String,
    pub date: DateTime<Utc>,
    /// Short commit messages, newest first
    pub commits: Vec<String>,
}

impl ReleaseBucket {
    /// The bucket for commits newer than every tag, dated at `now`
    pub fn unreleased(now: DateTime<Utc>) -> Self {
        ReleaseBucket {
            name: UNRELEASED_VERSION_NAME.to_string(),
            date: now,
            commits: Vec::new(),
        }
    }

    pub fn released(tag: &TagMeta) -> Self {
        ReleaseBucket {
            name: tag.name.clone(),
            date: tag.date,
            commits: Vec::new(),
        }
    }

    pub fn is_unreleased(&self) -> bool {
        self.name == UNRELEASED_VERSION_NAME
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}
