//! Release workflow orchestration
//!
//! Each workflow composes the engine (tag resolution, history partitioning,
//! version derivation, changelog splicing) for one command. The functions are
//! generic over [Repository] and take plain arguments, so they can be called
//! programmatically or tested against [crate::git::MockRepository] without
//! depending on clap.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::analyzer::VersionAnalyzer;
use crate::boundary::BoundaryWarning;
use crate::changelog::{self, Renderer, SplitMode};
use crate::config::Config;
use crate::conventional;
use crate::domain::{BranchContext, Endpoint, ReleaseMetadata, TagOrdering, Version};
use crate::error::{Result, SinceError};
use crate::git::Repository;
use crate::history::{
    flatten, BoundaryPolicy, EmptyWindowPolicy, HistoryPartitioner, HistoryWindow, WindowStart,
};
use crate::hooks::{HookExecutor, HookType};
use crate::resolver::TagResolver;

/// Preamble of a freshly initialised changelog
pub const CHANGELOG_BOILERPLATE: &str = "# Changelog

All notable changes to this project will be documented in this file.

The format is based on [Keep a Changelog](https://keepachangelog.com/en/1.0.0/),
and this project adheres to [Semantic Versioning](https://semver.org/spec/v2.0.0.html).

";

/// Arguments shared by the workflows
///
/// Mirrors the CLI arguments in a format suitable for orchestration logic.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowArgs {
    /// Repository directory, passed on to hooks as their working directory
    pub repo_path: PathBuf,

    /// How to decide which tag is the latest
    pub order_by: TagOrdering,

    /// Only include commits up to this tag (newest end)
    pub before_tag: Option<String>,

    /// Only include commits after this tag; the latest tag when unset
    pub after_tag: Option<String>,

    /// Collapse duplicate commit messages within a release
    pub unique: bool,

    pub boundary: BoundaryPolicy,

    pub split_mode: SplitMode,
}

impl WorkflowArgs {
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        WorkflowArgs {
            repo_path: repo_path.into(),
            order_by: TagOrdering::default(),
            before_tag: None,
            after_tag: None,
            unique: true,
            boundary: BoundaryPolicy::default(),
            split_mode: SplitMode::default(),
        }
    }

    fn window(&self, config: &Config) -> HistoryWindow {
        HistoryWindow::since_latest()
            .with_after(WindowStart::from_tag(self.after_tag.as_deref()))
            .with_before(self.before_tag.clone())
            .with_exclude(config.ignore.clone())
            .with_unique(self.unique)
            .with_boundary(self.boundary)
    }
}

impl Default for WorkflowArgs {
    fn default() -> Self {
        WorkflowArgs::new(".")
    }
}

/// Result of rendering the next release into a changelog
#[derive(Debug, Clone, PartialEq)]
pub struct UpdatedChangelog {
    pub metadata: ReleaseMetadata,
    /// Full changelog text, without a trailing newline
    pub changelog: String,
    pub warnings: Vec<BoundaryWarning>,
}

/// Current version from the latest tag.
///
/// A tag that is not a strict `X.Y.Z` is read leniently and reported as a warning.
pub fn current_version<R: Repository>(
    resolver: &TagResolver<'_, R>,
) -> Result<(Version, Option<BoundaryWarning>)> {
    let tag = resolver.resolve_endpoint_tag(Endpoint::Latest)?;
    match Version::parse(&tag) {
        Ok(version) => Ok((version, None)),
        Err(e) => {
            let warning = BoundaryWarning::UnparsableTag {
                tag: tag.clone(),
                reason: e.to_string(),
            };
            Ok((Version::parse_lenient(&tag), Some(warning)))
        }
    }
}

/// Render the unreleased changes as the next version and splice them into a changelog
///
/// # Arguments
/// * `existing` - Lines of the current changelog
/// * `now` - Date given to the new release
///
/// # Errors
/// * `NoChangesInWindow` - nothing was committed since the start tag
/// * `UndeterminableVersion` - the unreleased commits carry no recognised type
pub fn updated_changelog<R: Repository>(
    repo: &R,
    args: &WorkflowArgs,
    config: &Config,
    existing: &[String],
    now: DateTime<Utc>,
) -> Result<UpdatedChangelog> {
    let partitioner = HistoryPartitioner::new(repo, args.order_by);
    let buckets = partitioner.partition_at(&args.window(config), now)?;

    let unreleased = match buckets.first() {
        Some(bucket) if bucket.is_unreleased() => bucket,
        _ => return Err(SinceError::no_changes("no changes since start tag")),
    };

    let mut warnings = Vec::new();
    let (current, warning) = current_version(partitioner.resolver())?;
    warnings.extend(warning);

    let next = VersionAnalyzer::new().next_version(&current, &unreleased.commits)?;
    let new_version = next.number();

    let renderer = Renderer::grouped(config.changelog.section_map());
    let rendered = renderer.render_buckets(&buckets, Some(&new_version));

    let sections = changelog::split_into_sections(existing, args.split_mode)?;
    let updated = changelog::merge(&sections.boilerplate, &rendered, &sections.body);

    let metadata = ReleaseMetadata {
        old_version: current.number(),
        new_version,
        repo_path: args.repo_path.clone(),
        sha: repo.head_sha()?,
        v_prefix: current.v_prefix,
    };
    info!(old = %metadata.old_version, new = %metadata.new_version, "rendered next release");

    Ok(UpdatedChangelog {
        metadata,
        changelog: updated,
        warnings,
    })
}

/// Render the whole history below a fresh changelog preamble
///
/// The `after_tag` argument is ignored; history is read back to the first commit.
pub fn init_changelog<R: Repository>(
    repo: &R,
    args: &WorkflowArgs,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<String> {
    let partitioner = HistoryPartitioner::new(repo, args.order_by);
    let window = args.window(config).with_after(WindowStart::Beginning);
    let buckets = partitioner.partition_at(&window, now)?;
    EmptyWindowPolicy::Error.check(&buckets, "repository has no commits to record")?;

    let rendered = Renderer::grouped(config.changelog.section_map()).render_buckets(&buckets, None);
    Ok(changelog::merge(CHANGELOG_BOILERPLATE, &rendered, ""))
}

/// Current version (the latest tag, verbatim) or the next one derived from the window
///
/// The next version carries any `v` prefix of the current tag. A current tag
/// that had to be read leniently is reported as a warning.
pub fn project_version<R: Repository>(
    repo: &R,
    args: &WorkflowArgs,
    config: &Config,
    current_only: bool,
) -> Result<(String, Vec<BoundaryWarning>)> {
    let partitioner = HistoryPartitioner::new(repo, args.order_by);
    if current_only {
        let tag = partitioner.resolver().resolve_endpoint_tag(Endpoint::Latest)?;
        return Ok((tag, Vec::new()));
    }

    let (current, warning) = current_version(partitioner.resolver())?;
    let messages = flatten(&partitioner.partition(&args.window(config))?);
    debug!(count = messages.len(), "fetched commits");

    let next = VersionAnalyzer::new().next_version(&current, &messages)?;
    Ok((next.to_string(), warning.into_iter().collect()))
}

/// Changes in the window rendered by section; an empty window is not an error
///
/// Warns when the window is empty or when none of its commits has a
/// conventional type.
pub fn list_changes<R: Repository>(
    repo: &R,
    args: &WorkflowArgs,
    config: &Config,
) -> Result<(String, Vec<BoundaryWarning>)> {
    let partitioner = HistoryPartitioner::new(repo, args.order_by);
    let buckets = partitioner.partition(&args.window(config))?;
    EmptyWindowPolicy::Allow.check(&buckets, "no changes")?;

    let mut warnings = Vec::new();
    if buckets.is_empty() {
        let tag = match &args.after_tag {
            Some(tag) if !tag.is_empty() => tag.clone(),
            _ => partitioner.resolver().resolve_endpoint_tag(Endpoint::Latest)?,
        };
        warnings.push(BoundaryWarning::NoNewCommits {
            tag,
            head_sha: repo.head_sha()?,
        });
    }

    let messages = flatten(&buckets);
    if !messages.is_empty() && conventional::determine_types(&messages).is_empty() {
        warnings.push(BoundaryWarning::NoConventionalCommits {
            commit_count: messages.len(),
        });
    }

    let renderer = Renderer::grouped(config.changelog.section_map());
    Ok((renderer.render_commits(&messages), warnings))
}

/// Cut a release: update the changelog, commit it and tag the commit
///
/// Steps, stopping at the first failure:
/// 1. Check the required branch
/// 2. Render the updated changelog
/// 3. Run `before` hooks
/// 4. Write the changelog and commit it as `build: release <tag>.`
/// 5. Tag the new commit
/// 6. Run `after` hooks with the release commit as SHA
pub fn release<R: Repository>(
    repo: &R,
    args: &WorkflowArgs,
    config: &Config,
    changelog_file: &Path,
    now: DateTime<Utc>,
) -> Result<ReleaseMetadata> {
    BranchContext::new(repo.current_branch()?).require(config.require_branch.as_deref())?;

    let existing = changelog::read_lines(changelog_file)?;
    let UpdatedChangelog {
        mut metadata,
        changelog: updated,
        ..
    } = updated_changelog(repo, args, config, &existing, now)?;

    HookExecutor::execute_all(config, HookType::Before, &metadata)?;

    changelog::write_changelog(changelog_file, &updated)?;
    let tag_name = metadata.tag_name();
    let commit = repo.commit_file(changelog_file, &format!("build: release {}.", tag_name))?;
    repo.create_tag(&tag_name, commit)?;
    metadata.sha = commit.to_string();
    info!(tag = %tag_name, commit = %commit, "tagged release");

    HookExecutor::execute_all(config, HookType::After, &metadata)?;
    Ok(metadata)
}
