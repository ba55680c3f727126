//! Domain types - plain values shared by the engine, independent of git access

pub mod branch;
pub mod bucket;
pub mod commit;
pub mod release;
pub mod tag;
pub mod version;

pub use branch::BranchContext;
pub use bucket::{ReleaseBucket, UNRELEASED_VERSION_NAME};
pub use commit::CommitRecord;
pub use release::ReleaseMetadata;
pub use tag::{Endpoint, ResolvedTag, TagMeta, TagOrdering};
pub use version::{ChangeComponent, Version};
