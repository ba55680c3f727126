//! Release hooks
//!
//! Commands from the configuration that run around a release:
//! - before: after the changelog is rendered, before it is written and committed
//! - after: once the release commit is tagged

pub mod executor;
pub mod lifecycle;

pub use executor::HookExecutor;
pub use lifecycle::{HookContext, HookType};
