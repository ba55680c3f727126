//! Command workflows behind the `since` binary

pub mod orchestration;

pub use orchestration::{
    init_changelog, list_changes, project_version, release, updated_changelog, UpdatedChangelog,
    WorkflowArgs,
};
