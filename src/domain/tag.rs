use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use git2::Oid;

use crate::error::SinceError;

/// Name and date of a release, as used to label a bucket of commits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMeta {
    pub name: String,
    pub date: DateTime<Utc>,
}

impl TagMeta {
    pub fn new(name: impl Into<String>, date: DateTime<Utc>) -> Self {
        TagMeta {
            name: name.into(),
            date,
        }
    }
}

/// A tag peeled to the commit it identifies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTag {
    pub name: String,
    pub commit: Oid,
    /// Committer time of the target commit
    pub date: DateTime<Utc>,
}

impl ResolvedTag {
    pub fn meta(&self) -> TagMeta {
        TagMeta::new(self.name.clone(), self.date)
    }
}

/// Policy used to decide which of two tags is "later"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagOrdering {
    /// Lexicographic compare of tag names
    Alphabetical,
    /// Compare committer timestamps of the tagged commits
    CommitDate,
    /// Semantic version precedence, ignoring a leading `v`
    #[default]
    Semver,
}

impl TagOrdering {
    /// Compare two tags under this ordering.
    pub fn compare(&self, a: &ResolvedTag, b: &ResolvedTag) -> Ordering {
        match self {
            TagOrdering::Alphabetical => a.name.cmp(&b.name),
            TagOrdering::CommitDate => a.date.cmp(&b.date),
            TagOrdering::Semver => compare_semver(&a.name, &b.name),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TagOrdering::Alphabetical => "alphabetical",
            TagOrdering::CommitDate => "commit-date",
            TagOrdering::Semver => "semver",
        }
    }
}

impl fmt::Display for TagOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TagOrdering {
    type Err = SinceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alphabetical" => Ok(TagOrdering::Alphabetical),
            "commit-date" => Ok(TagOrdering::CommitDate),
            "semver" => Ok(TagOrdering::Semver),
            other => Err(SinceError::config(format!(
                "unknown tag ordering '{}' (expected alphabetical, commit-date or semver)",
                other
            ))),
        }
    }
}

/// Which end of the ordered tag list to select
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Earliest,
    Latest,
}

impl Endpoint {
    /// Whether a candidate comparing `ordering` against the current pick replaces it.
    ///
    /// Ties keep the current pick, so the first tag listed wins.
    pub fn prefers(&self, ordering: Ordering) -> bool {
        match self {
            Endpoint::Earliest => ordering == Ordering::Less,
            Endpoint::Latest => ordering == Ordering::Greater,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Earliest => f.write_str("earliest"),
            Endpoint::Latest => f.write_str("latest"),
        }
    }
}

/// Compare two tag names by semantic version precedence.
///
/// Names that do not parse as versions sort before every valid version and
/// compare equal to each other.
pub fn compare_semver(a: &str, b: &str) -> Ordering {
    match (semver_key(a), semver_key(b)) {
        (Some(a), Some(b)) => a.cmp_precedence(&b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

fn semver_key(name: &str) -> Option<semver::Version> {
    let trimmed = name.strip_prefix('v').unwrap_or(name);
    if let Ok(version) = semver::Version::parse(trimmed) {
        return Some(version);
    }

    // Shorthand such as `1` or `1.2`
    if trimmed.contains(['-', '+']) {
        return None;
    }
    let parts: Vec<&str> = trimmed.split('.').collect();
    if parts.len() > 3 || parts.iter().any(|p| p.parse::<u64>().is_err()) {
        return None;
    }
    let mut padded = parts.clone();
    padded.resize(3, "0");
    semver::Version::parse(&padded.join(".")).ok()
}
