use crate::domain::CommitRecord;
use crate::error::{Result, SinceError};
use crate::git::TagRef;
use chrono::{TimeZone, Utc};
use git2::{ObjectType, Oid, Repository as Git2Repo, Signature, Sort};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Git2Repo::discover(path).map_err(|source| SinceError::RepositoryUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "opened repository");

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    /// Map a path (absolute, or relative to the current directory) onto one
    /// relative to the working tree
    fn relative_to_workdir(&self, path: &Path) -> Result<PathBuf> {
        let workdir = self
            .repo
            .workdir()
            .ok_or_else(|| git2::Error::from_str("repository has no working tree"))?;
        let workdir = workdir.canonicalize()?;
        let file = if path.is_absolute() {
            path.canonicalize()?
        } else {
            std::env::current_dir()?.join(path).canonicalize()?
        };

        file.strip_prefix(&workdir)
            .map(Path::to_path_buf)
            .map_err(|_| {
                SinceError::config(format!(
                    "{} is outside the repository at {}",
                    path.display(),
                    workdir.display()
                ))
            })
    }
}

impl super::Repository for Git2Repository {
    fn tags(&self) -> Result<Vec<TagRef>> {
        let names = self.repo.tag_names(None)?;

        let mut tags = Vec::new();
        for name in names.iter().flatten() {
            if let Some(tag) = self.find_tag(name)? {
                tags.push(tag);
            }
        }

        trace!(count = tags.len(), "listed tags");
        Ok(tags)
    }

    fn find_tag(&self, name: &str) -> Result<Option<TagRef>> {
        let reference = match self.repo.find_reference(&format!("refs/tags/{}", name)) {
            Ok(reference) => reference.resolve()?,
            Err(e) if e.code() == git2::ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let Some(oid) = reference.target() else {
            return Ok(None);
        };

        let object = self.repo.find_object(oid, None)?;
        if object.kind() != Some(ObjectType::Tag) {
            return Ok(Some(TagRef::lightweight(name, oid)));
        }

        // A tag object may point at a tree or blob; keep its direct target so
        // the resolver can skip it instead of failing the whole listing.
        let target = match object.peel_to_commit() {
            Ok(commit) => commit.id(),
            Err(e) => {
                trace!(tag = name, error = %e, "annotated tag does not point at a commit");
                object.as_tag().map_or(oid, |tag| tag.target_id())
            }
        };

        Ok(Some(TagRef::annotated(name, oid, target)))
    }

    fn commit(&self, oid: Oid) -> Result<CommitRecord> {
        let commit = self.repo.find_commit(oid)?;
        let message = String::from_utf8_lossy(commit.message_bytes()).into_owned();
        let committed_at = Utc
            .timestamp_opt(commit.committer().when().seconds(), 0)
            .single()
            .unwrap_or_else(Utc::now);

        Ok(CommitRecord::new(oid, message, committed_at))
    }

    fn walk_from_head(
        &self,
        visit: &mut dyn FnMut(&CommitRecord) -> ControlFlow<()>,
    ) -> Result<()> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push_head()?;

        for oid in revwalk {
            let commit = self.commit(oid?)?;
            if visit(&commit).is_break() {
                break;
            }
        }

        Ok(())
    }

    fn head_sha(&self) -> Result<String> {
        let head = self.repo.head()?.peel_to_commit()?;
        Ok(head.id().to_string())
    }

    fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;
        Ok(head.shorthand().unwrap_or("HEAD").to_string())
    }

    fn commit_file(&self, path: &Path, message: &str) -> Result<Oid> {
        let relative = self.relative_to_workdir(path)?;

        let mut index = self.repo.index()?;
        index.add_path(&relative)?;
        index.write()?;

        let tree = self.repo.find_tree(index.write_tree()?)?;
        let signature = self
            .repo
            .signature()
            .or_else(|_| Signature::now("since", "since@localhost"))?;
        let parent = self.repo.head()?.peel_to_commit()?;

        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &[&parent])?;

        debug!(file = %relative.display(), commit = %oid, "committed file");
        Ok(oid)
    }

    fn create_tag(&self, name: &str, oid: Oid) -> Result<()> {
        let object = self.repo.find_object(oid, None)?;
        self.repo.tag_lightweight(name, &object, false)?;

        debug!(tag = name, commit = %oid, "created tag");
        Ok(())
    }
}
