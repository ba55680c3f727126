//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the repository
//! primitives the release engine consumes, allowing for multiple
//! implementations including real Git repositories and mock implementations
//! for testing.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait. The concrete
//! implementations include:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory linear history for testing
//!
//! # Usage
//!
//! The tag resolver, history partitioner and workflows are generic over
//! [Repository], so they never touch `git2` directly.
//!
//! ```rust
//! # use since::git::Repository;
//! # use std::ops::ControlFlow;
//! # fn example<R: Repository>(repo: &R) -> since::Result<()> {
//! let mut subjects = Vec::new();
//! repo.walk_from_head(&mut |commit| {
//!     subjects.push(commit.short_message());
//!     ControlFlow::Continue(())
//! })?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use std::ops::ControlFlow;
use std::path::Path;

use crate::domain::CommitRecord;
use crate::error::Result;
use git2::Oid;

/// A tag reference as stored in the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRef {
    /// Short tag name (without `refs/tags/`)
    pub name: String,
    /// The object the reference points at: a commit for lightweight tags,
    /// the tag object for annotated ones
    pub reference: Oid,
    /// Commit an annotated tag object points at; `None` for lightweight tags
    pub annotation_target: Option<Oid>,
}

impl TagRef {
    /// Create a lightweight tag reference
    pub fn lightweight(name: impl Into<String>, commit: Oid) -> Self {
        TagRef {
            name: name.into(),
            reference: commit,
            annotation_target: None,
        }
    }

    /// Create an annotated tag reference
    pub fn annotated(name: impl Into<String>, tag_object: Oid, commit: Oid) -> Self {
        TagRef {
            name: name.into(),
            reference: tag_object,
            annotation_target: Some(commit),
        }
    }

    pub fn is_annotated(&self) -> bool {
        self.annotation_target.is_some()
    }
}

/// Repository primitives used by the release engine
///
/// All engine operations only read through this trait; the two write
/// operations exist for the release workflow that commits the changelog and
/// tags the result.
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map
/// underlying errors (like `git2::Error`) to the appropriate
/// [crate::error::SinceError] variants.
pub trait Repository {
    /// List every tag in the repository
    ///
    /// # Returns
    /// * `Ok(Vec<TagRef>)` - All tags, in the order the repository lists them
    /// * `Err` - If tags cannot be enumerated
    fn tags(&self) -> Result<Vec<TagRef>>;

    /// Find a tag by name
    ///
    /// # Returns
    /// * `Ok(Some(TagRef))` - The tag if it exists
    /// * `Ok(None)` - If no tag has this name
    /// * `Err` - If there's a Git error
    fn find_tag(&self, name: &str) -> Result<Option<TagRef>>;

    /// Read a commit by hash
    fn commit(&self, oid: Oid) -> Result<CommitRecord>;

    /// Walk history from HEAD, newest first
    ///
    /// The visitor returns [ControlFlow::Break] to stop the walk early.
    fn walk_from_head(
        &self,
        visit: &mut dyn FnMut(&CommitRecord) -> ControlFlow<()>,
    ) -> Result<()>;

    /// Full SHA of the HEAD commit
    fn head_sha(&self) -> Result<String>;

    /// Short name of the checked-out branch
    fn current_branch(&self) -> Result<String>;

    /// Stage a single file and commit it on top of HEAD
    ///
    /// # Arguments
    /// * `path` - File to commit, relative to the repository root
    /// * `message` - Commit message
    ///
    /// # Returns
    /// * `Ok(Oid)` - The new commit
    fn commit_file(&self, path: &Path, message: &str) -> Result<Oid>;

    /// Create a lightweight tag at the given commit
    fn create_tag(&self, name: &str, oid: Oid) -> Result<()>;
}
