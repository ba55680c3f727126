//! Release history engine: resolves tags, partitions commit history into
//! release buckets, derives the next semantic version and splices rendered
//! releases into a Keep a Changelog file.

pub mod analyzer;
pub mod boundary;
pub mod changelog;
pub mod cli;
pub mod config;
pub mod conventional;
pub mod domain;
pub mod error;
pub mod git;
pub mod history;
pub mod hooks;
pub mod resolver;
pub mod ui;

pub use error::{Result, SinceError};
