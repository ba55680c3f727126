use crate::domain::CommitRecord;
use crate::error::{Result, SinceError};
use crate::git::{Repository, TagRef};
use chrono::{DateTime, Utc};
use git2::Oid;
use std::cell::{Cell, RefCell};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

/// Mock repository holding a linear history in memory
///
/// Commits are kept oldest first; walking starts at the last one added.
pub struct MockRepository {
    commits: RefCell<Vec<CommitRecord>>,
    tags: RefCell<Vec<TagRef>>,
    branch: String,
    next_id: Cell<u32>,
    committed_files: RefCell<Vec<PathBuf>>,
}

impl MockRepository {
    /// Create a new empty mock repository on branch `main`
    pub fn new() -> Self {
        MockRepository {
            commits: RefCell::new(Vec::new()),
            tags: RefCell::new(Vec::new()),
            branch: "main".to_string(),
            next_id: Cell::new(1),
            committed_files: RefCell::new(Vec::new()),
        }
    }

    fn next_oid(&self) -> Oid {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let mut bytes = [0u8; 20];
        bytes[..4].copy_from_slice(&id.to_be_bytes());
        Oid::from_bytes(&bytes).unwrap_or_else(|_| Oid::zero())
    }

    /// Add a commit on top of the history and return its hash
    pub fn add_commit(&mut self, message: impl Into<String>, committed_at: DateTime<Utc>) -> Oid {
        let oid = self.next_oid();
        self.commits
            .get_mut()
            .push(CommitRecord::new(oid, message, committed_at));
        oid
    }

    /// Add a lightweight tag pointing to a commit
    pub fn add_tag(&mut self, name: impl Into<String>, commit: Oid) {
        self.tags.get_mut().push(TagRef::lightweight(name, commit));
    }

    /// Add an annotated tag whose tag object points to a commit
    pub fn add_annotated_tag(&mut self, name: impl Into<String>, commit: Oid) -> Oid {
        let tag_object = self.next_oid();
        self.tags
            .get_mut()
            .push(TagRef::annotated(name, tag_object, commit));
        tag_object
    }

    /// Set the checked-out branch
    pub fn set_branch(&mut self, branch: impl Into<String>) {
        self.branch = branch.into();
    }

    /// Files committed through [Repository::commit_file]
    pub fn committed_files(&self) -> Vec<PathBuf> {
        self.committed_files.borrow().clone()
    }

    /// Message of the newest commit
    pub fn head_message(&self) -> Option<String> {
        self.commits.borrow().last().map(|c| c.message.clone())
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn tags(&self) -> Result<Vec<TagRef>> {
        Ok(self.tags.borrow().clone())
    }

    fn find_tag(&self, name: &str) -> Result<Option<TagRef>> {
        Ok(self.tags.borrow().iter().find(|t| t.name == name).cloned())
    }

    fn commit(&self, oid: Oid) -> Result<CommitRecord> {
        self.commits
            .borrow()
            .iter()
            .find(|c| c.hash == oid)
            .cloned()
            .ok_or_else(|| SinceError::not_found(format!("commit {}", oid)))
    }

    fn walk_from_head(
        &self,
        visit: &mut dyn FnMut(&CommitRecord) -> ControlFlow<()>,
    ) -> Result<()> {
        for commit in self.commits.borrow().iter().rev() {
            if visit(commit).is_break() {
                break;
            }
        }
        Ok(())
    }

    fn head_sha(&self) -> Result<String> {
        self.commits
            .borrow()
            .last()
            .map(|c| c.hash.to_string())
            .ok_or_else(|| SinceError::not_found("HEAD has no commits"))
    }

    fn current_branch(&self) -> Result<String> {
        Ok(self.branch.clone())
    }

    fn commit_file(&self, path: &Path, message: &str) -> Result<Oid> {
        let oid = self.next_oid();
        self.commits
            .borrow_mut()
            .push(CommitRecord::new(oid, message, Utc::now()));
        self.committed_files.borrow_mut().push(path.to_path_buf());
        Ok(oid)
    }

    fn create_tag(&self, name: &str, oid: Oid) -> Result<()> {
        if self.tags.borrow().iter().any(|t| t.name == name) {
            return Err(git2::Error::from_str(&format!("tag '{}' already exists", name)).into());
        }
        self.tags.borrow_mut().push(TagRef::lightweight(name, oid));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_mock_repository_walks_newest_first() {
        let mut repo = MockRepository::new();
        repo.add_commit("first", at(1));
        repo.add_commit("second", at(2));

        let mut seen = Vec::new();
        repo.walk_from_head(&mut |c| {
            seen.push(c.message.clone());
            ControlFlow::Continue(())
        })
        .unwrap();

        assert_eq!(seen, vec!["second", "first"]);
    }

    #[test]
    fn test_mock_repository_walk_stops_early() {
        let mut repo = MockRepository::new();
        repo.add_commit("first", at(1));
        repo.add_commit("second", at(2));

        let mut seen = 0;
        repo.walk_from_head(&mut |_| {
            seen += 1;
            ControlFlow::Break(())
        })
        .unwrap();

        assert_eq!(seen, 1);
    }

    #[test]
    fn test_mock_repository_tags() {
        let mut repo = MockRepository::new();
        let oid = repo.add_commit("feat: one", at(1));
        repo.add_tag("v1.0.0", oid);
        let object = repo.add_annotated_tag("v1.1.0", oid);

        let light = repo.find_tag("v1.0.0").unwrap().unwrap();
        assert!(!light.is_annotated());
        assert_eq!(light.reference, oid);

        let annotated = repo.find_tag("v1.1.0").unwrap().unwrap();
        assert_eq!(annotated.reference, object);
        assert_eq!(annotated.annotation_target, Some(oid));

        assert_eq!(repo.find_tag("v2.0.0").unwrap(), None);
    }

    #[test]
    fn test_mock_repository_head_sha() {
        let mut repo = MockRepository::new();
        assert!(repo.head_sha().is_err());
        let oid = repo.add_commit("init", at(1));
        assert_eq!(repo.head_sha().unwrap(), oid.to_string());
    }

    #[test]
    fn test_mock_repository_commit_file_and_tag() {
        let mut repo = MockRepository::new();
        repo.add_commit("init", at(1));

        let oid = repo
            .commit_file(Path::new("CHANGELOG.md"), "build: release 0.1.0.")
            .unwrap();
        repo.create_tag("0.1.0", oid).unwrap();

        assert_eq!(repo.head_message().as_deref(), Some("build: release 0.1.0."));
        assert_eq!(repo.committed_files(), vec![PathBuf::from("CHANGELOG.md")]);
        assert!(repo.create_tag("0.1.0", oid).is_err());
    }

    #[test]
    fn test_mock_repository_default() {
        let repo = MockRepository::default();
        assert!(repo.tags().unwrap().is_empty());
        assert_eq!(repo.current_branch().unwrap(), "main");
    }
}
