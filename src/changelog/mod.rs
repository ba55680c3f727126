//! Changelog documents: splitting, rendering, extraction and file access
//!
//! A changelog is a list of lines. Release sections start with `## `,
//! category blocks with `### ` and entries with `- `. Updating one means
//! keeping the boilerplate above the first release, putting freshly rendered
//! sections below it and the previous releases after those.

pub mod extract;
pub mod file;
pub mod render;
pub mod sections;

pub use extract::read_changes;
pub use file::{read_lines, resolve_changelog_file, write_changelog};
pub use render::Renderer;
pub use sections::{merge, split_into_sections, ChangelogSections, SplitMode};
