//! History partitioning: commits between two tags, grouped per release
//!
//! The walk runs from HEAD towards the root. Commits newer than the `before`
//! tag are skipped, every tagged commit opens a new bucket, and the walk ends
//! at the `after` tag (or the root when the window starts at the beginning).

use std::collections::HashSet;
use std::ops::ControlFlow;

use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::{debug, trace, warn};

use crate::domain::{Endpoint, ReleaseBucket, TagOrdering};
use crate::error::{Result, SinceError};
use crate::git::Repository;
use crate::resolver::TagResolver;

/// Where the window of interest starts (the oldest end)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WindowStart {
    /// The latest tag under the active ordering
    #[default]
    LatestTag,
    /// A named tag
    Tag(String),
    /// The root of history
    Beginning,
}

impl WindowStart {
    /// Latest tag when `tag` is empty or absent, otherwise that tag
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some(name) if !name.is_empty() => WindowStart::Tag(name.to_string()),
            _ => WindowStart::LatestTag,
        }
    }
}

/// Whether the commit at the `after` boundary belongs to the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryPolicy {
    /// Stop before the boundary commit
    #[default]
    Exclude,
    /// Process the boundary commit, opening its tag bucket, then stop
    Include,
}

/// How callers treat a window with no commits in it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyWindowPolicy {
    #[default]
    Error,
    Allow,
}

impl EmptyWindowPolicy {
    /// Apply the policy to a partition result
    pub fn check(&self, buckets: &[ReleaseBucket], context: &str) -> Result<()> {
        if buckets.is_empty() && *self == EmptyWindowPolicy::Error {
            return Err(SinceError::no_changes(context.to_string()));
        }
        Ok(())
    }
}

/// A window of history to partition
#[derive(Debug, Clone, Default)]
pub struct HistoryWindow {
    /// Newest end; `None` means HEAD
    pub before: Option<String>,
    pub after: WindowStart,
    /// Regexes matched against full commit messages
    pub exclude: Vec<String>,
    /// Collapse case-insensitive duplicates within a bucket
    pub unique: bool,
    pub boundary: BoundaryPolicy,
}

impl HistoryWindow {
    /// Window from the latest tag to HEAD
    pub fn since_latest() -> Self {
        HistoryWindow {
            unique: true,
            ..Default::default()
        }
    }

    pub fn with_after(mut self, after: WindowStart) -> Self {
        self.after = after;
        self
    }

    pub fn with_before(mut self, before: Option<String>) -> Self {
        self.before = before.filter(|b| !b.is_empty());
        self
    }

    pub fn with_exclude(mut self, exclude: Vec<String>) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    pub fn with_boundary(mut self, boundary: BoundaryPolicy) -> Self {
        self.boundary = boundary;
        self
    }
}

/// Splits commit history into release buckets
pub struct HistoryPartitioner<'r, R: Repository> {
    resolver: TagResolver<'r, R>,
}

impl<'r, R: Repository> HistoryPartitioner<'r, R> {
    pub fn new(repo: &'r R, ordering: TagOrdering) -> Self {
        HistoryPartitioner {
            resolver: TagResolver::new(repo, ordering),
        }
    }

    pub fn with_resolver(resolver: TagResolver<'r, R>) -> Self {
        HistoryPartitioner { resolver }
    }

    pub fn resolver(&self) -> &TagResolver<'r, R> {
        &self.resolver
    }

    /// Partition the window into buckets, newest first, dating Unreleased now
    pub fn partition(&self, window: &HistoryWindow) -> Result<Vec<ReleaseBucket>> {
        self.partition_at(window, Utc::now())
    }

    /// Partition the window into buckets, newest first.
    ///
    /// An empty list means the window holds no included commits; deciding
    /// whether that is an error is left to the caller. A window whose `after`
    /// tag is newer than its `before` tag is empty.
    ///
    /// # Errors
    /// * `NotFound` - a boundary tag does not exist, or the window starts at
    ///   the latest tag and there are no tags
    /// * `Pattern` - an exclude pattern is not a valid regex
    pub fn partition_at(
        &self,
        window: &HistoryWindow,
        now: DateTime<Utc>,
    ) -> Result<Vec<ReleaseBucket>> {
        let excludes = compile_excludes(&window.exclude)?;

        let after_commit = match &window.after {
            WindowStart::LatestTag => {
                let latest = self.resolver.resolve_endpoint_tag(Endpoint::Latest)?;
                debug!(tag = %latest, "most recent tag");
                Some(self.resolver.resolve_commit_for_tag(&latest)?)
            }
            WindowStart::Tag(name) => Some(self.resolver.resolve_commit_for_tag(name)?),
            WindowStart::Beginning => None,
        };
        let before_commit = window
            .before
            .as_deref()
            .map(|name| self.resolver.resolve_commit_for_tag(name))
            .transpose()?;

        let tags = self.resolver.tag_index()?;

        let mut buckets = Vec::new();
        let mut current = ReleaseBucket::unreleased(now);
        let mut skipping = before_commit.is_some();
        let mut inverted = false;
        let mut visited = 0usize;

        self.resolver.repository().walk_from_head(&mut |commit| {
            if skipping {
                if Some(commit.hash) != before_commit {
                    if Some(commit.hash) == after_commit {
                        inverted = true;
                        return ControlFlow::Break(());
                    }
                    return ControlFlow::Continue(());
                }
                skipping = false;
            }

            let at_boundary = Some(commit.hash) == after_commit;
            if at_boundary && window.boundary == BoundaryPolicy::Exclude {
                return ControlFlow::Break(());
            }
            visited += 1;

            if let Some(tag) = tags.get(&commit.hash) {
                let next = ReleaseBucket::released(tag);
                close_bucket(&mut buckets, std::mem::replace(&mut current, next), window.unique);
            }

            if should_include(&commit.message, &excludes) {
                current.commits.push(commit.short_message());
            } else {
                trace!(commit = %commit.hash, "excluded commit");
            }

            if at_boundary {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })?;

        if inverted {
            warn!(
                before = ?window.before,
                after = ?window.after,
                "start of the window is newer than its end"
            );
            return Ok(Vec::new());
        }

        close_bucket(&mut buckets, current, window.unique);

        debug!(
            commits = visited,
            buckets = buckets.len(),
            "partitioned history"
        );
        Ok(buckets)
    }

    /// Commit subjects in the window, newest first, across all buckets
    pub fn commit_messages(&self, window: &HistoryWindow) -> Result<Vec<String>> {
        Ok(flatten(&self.partition(window)?))
    }
}

/// Concatenate bucket contents, newest bucket first
pub fn flatten(buckets: &[ReleaseBucket]) -> Vec<String> {
    buckets
        .iter()
        .flat_map(|b| b.commits.iter().cloned())
        .collect()
}

/// Remove case-insensitive duplicates, keeping the first occurrence
pub fn unique(messages: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    messages
        .into_iter()
        .filter(|m| seen.insert(m.to_lowercase()))
        .collect()
}

fn close_bucket(buckets: &mut Vec<ReleaseBucket>, mut bucket: ReleaseBucket, dedupe: bool) {
    if dedupe {
        bucket.commits = unique(std::mem::take(&mut bucket.commits));
    }
    if bucket.is_empty() {
        trace!(bucket = %bucket.name, "dropping empty bucket");
        return;
    }
    debug!(bucket = %bucket.name, commits = bucket.commits.len(), "closed bucket");
    buckets.push(bucket);
}

fn compile_excludes(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| Regex::new(p).map_err(SinceError::from))
        .collect()
}

fn should_include(message: &str, excludes: &[Regex]) -> bool {
    !excludes.iter().any(|re| re.is_match(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRepository;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    /// C1 (tag 0.0.1) -> C2 -> C3 (tag 0.1.0) -> C4
    fn four_commit_repo() -> MockRepository {
        let mut repo = MockRepository::new();
        let c1 = repo.add_commit("feat: first", at(100));
        repo.add_tag("0.0.1", c1);
        repo.add_commit("fix: second", at(200));
        let c3 = repo.add_commit("feat: third", at(300));
        repo.add_tag("0.1.0", c3);
        repo.add_commit("chore: fourth", at(400));
        repo
    }

    fn names(buckets: &[ReleaseBucket]) -> Vec<&str> {
        buckets.iter().map(|b| b.name.as_str()).collect()
    }

    #[test]
    fn test_partition_from_beginning() {
        let repo = four_commit_repo();
        let partitioner = HistoryPartitioner::new(&repo, TagOrdering::Semver);
        let window = HistoryWindow::since_latest().with_after(WindowStart::Beginning);

        let buckets = partitioner.partition_at(&window, at(1000)).unwrap();

        assert_eq!(names(&buckets), vec!["Unreleased", "0.1.0", "0.0.1"]);
        assert_eq!(buckets[0].commits, vec!["chore: fourth"]);
        assert_eq!(buckets[0].date, at(1000));
        assert_eq!(buckets[1].commits, vec!["feat: third", "fix: second"]);
        assert_eq!(buckets[1].date, at(300));
        assert_eq!(buckets[2].commits, vec!["feat: first"]);
    }

    #[test]
    fn test_partition_since_latest_excludes_boundary() {
        let repo = four_commit_repo();
        let partitioner = HistoryPartitioner::new(&repo, TagOrdering::Semver);

        let buckets = partitioner
            .partition(&HistoryWindow::since_latest())
            .unwrap();

        assert_eq!(names(&buckets), vec!["Unreleased"]);
        assert_eq!(buckets[0].commits, vec!["chore: fourth"]);
    }

    #[test]
    fn test_partition_include_boundary() {
        let repo = four_commit_repo();
        let partitioner = HistoryPartitioner::new(&repo, TagOrdering::Semver);
        let window = HistoryWindow::since_latest().with_boundary(BoundaryPolicy::Include);

        let buckets = partitioner.partition(&window).unwrap();

        assert_eq!(names(&buckets), vec!["Unreleased", "0.1.0"]);
        assert_eq!(buckets[1].commits, vec!["feat: third"]);
    }

    #[test]
    fn test_partition_after_older_tag() {
        let repo = four_commit_repo();
        let partitioner = HistoryPartitioner::new(&repo, TagOrdering::Semver);
        let window = HistoryWindow::since_latest().with_after(WindowStart::Tag("0.0.1".into()));

        let buckets = partitioner.partition(&window).unwrap();

        assert_eq!(names(&buckets), vec!["Unreleased", "0.1.0"]);
        assert_eq!(buckets[1].commits, vec!["feat: third", "fix: second"]);
    }

    #[test]
    fn test_partition_before_tag_skips_newer_commits() {
        let repo = four_commit_repo();
        let partitioner = HistoryPartitioner::new(&repo, TagOrdering::Semver);
        let window = HistoryWindow::since_latest()
            .with_before(Some("0.1.0".into()))
            .with_after(WindowStart::Tag("0.0.1".into()));

        let buckets = partitioner.partition(&window).unwrap();

        assert_eq!(names(&buckets), vec!["0.1.0"]);
        assert_eq!(buckets[0].commits, vec!["feat: third", "fix: second"]);
    }

    #[test]
    fn test_partition_inverted_window_is_empty() {
        let repo = four_commit_repo();
        let partitioner = HistoryPartitioner::new(&repo, TagOrdering::Semver);
        let window = HistoryWindow::since_latest()
            .with_before(Some("0.0.1".into()))
            .with_after(WindowStart::Tag("0.1.0".into()));

        assert!(partitioner.partition(&window).unwrap().is_empty());

        let inclusive = window.with_boundary(BoundaryPolicy::Include);
        assert!(partitioner.partition(&inclusive).unwrap().is_empty());
    }

    #[test]
    fn test_partition_same_tag_at_both_ends() {
        let repo = four_commit_repo();
        let partitioner = HistoryPartitioner::new(&repo, TagOrdering::Semver);
        let window = HistoryWindow::since_latest()
            .with_before(Some("0.1.0".into()))
            .with_after(WindowStart::Tag("0.1.0".into()));

        assert!(partitioner.partition(&window).unwrap().is_empty());

        let buckets = partitioner
            .partition(&window.with_boundary(BoundaryPolicy::Include))
            .unwrap();
        assert_eq!(names(&buckets), vec!["0.1.0"]);
        assert_eq!(buckets[0].commits, vec!["feat: third"]);
    }

    #[test]
    fn test_partition_empty_window() {
        let mut repo = MockRepository::new();
        let c1 = repo.add_commit("feat: only", at(100));
        repo.add_tag("1.0.0", c1);

        let partitioner = HistoryPartitioner::new(&repo, TagOrdering::Semver);
        let buckets = partitioner
            .partition(&HistoryWindow::since_latest())
            .unwrap();

        assert!(buckets.is_empty());
        assert!(EmptyWindowPolicy::Error.check(&buckets, "x").is_err());
        assert!(EmptyWindowPolicy::Allow.check(&buckets, "x").is_ok());
    }

    #[test]
    fn test_partition_without_tags_is_not_found() {
        let mut repo = MockRepository::new();
        repo.add_commit("feat: only", at(100));

        let partitioner = HistoryPartitioner::new(&repo, TagOrdering::Semver);
        let err = partitioner
            .partition(&HistoryWindow::since_latest())
            .unwrap_err();
        assert!(matches!(err, SinceError::NotFound(_)));
    }

    #[test]
    fn test_partition_missing_boundary_tag() {
        let repo = four_commit_repo();
        let partitioner = HistoryPartitioner::new(&repo, TagOrdering::Semver);
        let window = HistoryWindow::since_latest().with_after(WindowStart::Tag("9.9.9".into()));

        assert!(matches!(
            partitioner.partition(&window),
            Err(SinceError::NotFound(_))
        ));
    }

    #[test]
    fn test_dedupe_within_bucket_only() {
        let mut repo = MockRepository::new();
        repo.add_commit("fix: typo", at(100));
        let c2 = repo.add_commit("Fix: Typo", at(200));
        repo.add_tag("0.1.0", c2);
        repo.add_commit("fix: typo", at(300));
        repo.add_commit("FIX: TYPO", at(400));
        repo.add_commit("feat: new", at(500));

        let partitioner = HistoryPartitioner::new(&repo, TagOrdering::Semver);
        let window = HistoryWindow::since_latest().with_after(WindowStart::Beginning);
        let buckets = partitioner.partition(&window).unwrap();

        assert_eq!(buckets[0].commits, vec!["feat: new", "FIX: TYPO"]);
        assert_eq!(buckets[1].commits, vec!["Fix: Typo"]);
    }

    #[test]
    fn test_dedupe_disabled_keeps_duplicates() {
        let mut repo = MockRepository::new();
        let c1 = repo.add_commit("chore: init", at(100));
        repo.add_tag("0.1.0", c1);
        repo.add_commit("fix: typo", at(200));
        repo.add_commit("fix: typo", at(300));

        let partitioner = HistoryPartitioner::new(&repo, TagOrdering::Semver);
        let window = HistoryWindow::since_latest().with_unique(false);
        let buckets = partitioner.partition(&window).unwrap();

        assert_eq!(buckets[0].commits, vec!["fix: typo", "fix: typo"]);
    }

    #[test]
    fn test_exclude_matches_full_message() {
        let mut repo = MockRepository::new();
        let c1 = repo.add_commit("chore: init", at(100));
        repo.add_tag("0.1.0", c1);
        repo.add_commit("feat: keep", at(200));
        repo.add_commit("chore: bump deps\n\nskip-changelog", at(300));

        let partitioner = HistoryPartitioner::new(&repo, TagOrdering::Semver);
        let window = HistoryWindow::since_latest().with_exclude(vec!["skip-changelog".into()]);
        let buckets = partitioner.partition(&window).unwrap();

        assert_eq!(buckets[0].commits, vec!["feat: keep"]);
    }

    #[test]
    fn test_excluded_tagged_commit_still_opens_bucket() {
        let mut repo = MockRepository::new();
        repo.add_commit("feat: base", at(100));
        let c2 = repo.add_commit("build: release 0.1.0.", at(200));
        repo.add_tag("0.1.0", c2);
        repo.add_commit("fix: later", at(300));

        let partitioner = HistoryPartitioner::new(&repo, TagOrdering::Semver);
        let window = HistoryWindow::since_latest()
            .with_after(WindowStart::Beginning)
            .with_exclude(vec!["^build: release".into()]);
        let buckets = partitioner.partition(&window).unwrap();

        assert_eq!(names(&buckets), vec!["Unreleased", "0.1.0"]);
        assert_eq!(buckets[1].commits, vec!["feat: base"]);
    }

    #[test]
    fn test_fully_excluded_bucket_is_dropped() {
        let mut repo = MockRepository::new();
        let c1 = repo.add_commit("chore: init", at(100));
        repo.add_tag("0.1.0", c1);
        repo.add_commit("wip", at(200));

        let partitioner = HistoryPartitioner::new(&repo, TagOrdering::Semver);
        let window = HistoryWindow::since_latest().with_exclude(vec!["^wip".into()]);

        assert!(partitioner.partition(&window).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let repo = four_commit_repo();
        let partitioner = HistoryPartitioner::new(&repo, TagOrdering::Semver);
        let window = HistoryWindow::since_latest().with_exclude(vec!["(".into()]);

        assert!(matches!(
            partitioner.partition(&window),
            Err(SinceError::Pattern(_))
        ));
    }

    #[test]
    fn test_flatten_and_unique() {
        let repo = four_commit_repo();
        let partitioner = HistoryPartitioner::new(&repo, TagOrdering::Semver);
        let window = HistoryWindow::since_latest().with_after(WindowStart::Beginning);

        let messages = partitioner.commit_messages(&window).unwrap();
        assert_eq!(
            messages,
            vec!["chore: fourth", "feat: third", "fix: second", "feat: first"]
        );

        let deduped = unique(vec!["a".into(), "A".into(), "b".into()]);
        assert_eq!(deduped, vec!["a", "b"]);
    }

    #[test]
    fn test_window_start_from_tag() {
        assert_eq!(WindowStart::from_tag(None), WindowStart::LatestTag);
        assert_eq!(WindowStart::from_tag(Some("")), WindowStart::LatestTag);
        assert_eq!(
            WindowStart::from_tag(Some("1.0.0")),
            WindowStart::Tag("1.0.0".into())
        );
    }
}
