use std::path::PathBuf;

/// What a release decision hands on to tagging and hooks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseMetadata {
    /// Current version, without any `v` prefix
    pub old_version: String,
    /// Next version, without any `v` prefix
    pub new_version: String,
    pub repo_path: PathBuf,
    pub sha: String,
    /// Whether the current tag began with `v`
    pub v_prefix: bool,
}

impl ReleaseMetadata {
    /// Tag name for the new version, carrying the prefix of the previous tag
    pub fn tag_name(&self) -> String {
        if self.v_prefix {
            format!("v{}", self.new_version)
        } else {
            self.new_version.clone()
        }
    }
}
