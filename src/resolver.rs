//! Tag resolution: endpoint selection under an ordering and tag peeling
//!
//! A [TagResolver] is owned by the caller and lives for one engine run. It
//! remembers the earliest and latest tag names the first time they are asked
//! for, since the repository does not change while a run is in progress.

use std::cell::OnceCell;
use std::collections::HashMap;

use git2::Oid;
use tracing::{debug, trace};

use crate::domain::{Endpoint, ResolvedTag, TagMeta, TagOrdering};
use crate::error::{Result, SinceError};
use crate::git::{Repository, TagRef};

/// Resolves tag names and endpoints against one repository
pub struct TagResolver<'r, R: Repository> {
    repo: &'r R,
    ordering: TagOrdering,
    earliest: OnceCell<String>,
    latest: OnceCell<String>,
}

impl<'r, R: Repository> TagResolver<'r, R> {
    pub fn new(repo: &'r R, ordering: TagOrdering) -> Self {
        TagResolver {
            repo,
            ordering,
            earliest: OnceCell::new(),
            latest: OnceCell::new(),
        }
    }

    pub fn ordering(&self) -> TagOrdering {
        self.ordering
    }

    pub fn repository(&self) -> &'r R {
        self.repo
    }

    /// Every tag peeled to its commit.
    ///
    /// Tags whose target is not a readable commit (e.g. tags on trees) are skipped.
    pub fn resolved_tags(&self) -> Result<Vec<ResolvedTag>> {
        let mut resolved = Vec::new();
        for tag in self.repo.tags()? {
            let commit = peel(&tag);
            match self.repo.commit(commit) {
                Ok(record) => resolved.push(ResolvedTag {
                    name: tag.name,
                    commit,
                    date: record.committed_at,
                }),
                Err(e) => trace!(tag = %tag.name, error = %e, "skipping tag without commit"),
            }
        }
        Ok(resolved)
    }

    /// Name of the earliest or latest tag under the resolver's ordering
    ///
    /// # Errors
    /// `NotFound` when the repository has no tags.
    pub fn resolve_endpoint_tag(&self, endpoint: Endpoint) -> Result<String> {
        let cell = match endpoint {
            Endpoint::Earliest => &self.earliest,
            Endpoint::Latest => &self.latest,
        };
        if let Some(name) = cell.get() {
            return Ok(name.clone());
        }

        let tags = self.resolved_tags()?;
        let mut candidates = tags.iter();
        let mut pick = candidates
            .next()
            .ok_or_else(|| SinceError::not_found("no tags found"))?;
        for candidate in candidates {
            if endpoint.prefers(self.ordering.compare(candidate, pick)) {
                pick = candidate;
            }
        }

        debug!(%endpoint, ordering = %self.ordering, tag = %pick.name, "resolved endpoint tag");
        let _ = cell.set(pick.name.clone());
        Ok(pick.name.clone())
    }

    /// Commit a tag name identifies, peeling annotated tags
    ///
    /// # Errors
    /// `NotFound` when no tag has this name or the tag does not point at a commit.
    pub fn resolve_commit_for_tag(&self, name: &str) -> Result<Oid> {
        let tag = self
            .repo
            .find_tag(name)?
            .ok_or_else(|| SinceError::not_found(format!("tag '{}'", name)))?;

        let commit = peel(&tag);
        self.repo.commit(commit).map_err(|e| {
            trace!(tag = name, error = %e, "tag target is not a commit");
            SinceError::not_found(format!("commit for tag '{}'", name))
        })?;
        Ok(commit)
    }

    /// Map each tagged commit to the tag that names it.
    ///
    /// When several tags point at one commit the latest under the ordering wins.
    pub fn tag_index(&self) -> Result<HashMap<Oid, TagMeta>> {
        let mut best: HashMap<Oid, ResolvedTag> = HashMap::new();
        for tag in self.resolved_tags()? {
            let replace = match best.get(&tag.commit) {
                Some(current) => Endpoint::Latest.prefers(self.ordering.compare(&tag, current)),
                None => true,
            };
            if replace {
                best.insert(tag.commit, tag);
            }
        }

        Ok(best
            .into_iter()
            .map(|(commit, tag)| (commit, tag.meta()))
            .collect())
    }
}

/// The commit a tag reference identifies
pub fn peel(tag: &TagRef) -> Oid {
    tag.annotation_target.unwrap_or(tag.reference)
}
